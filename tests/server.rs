//! End-to-end tests for the HTTP surface.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use reactango::http::{HttpServer, ServerError};

mod common;

#[tokio::test]
async fn test_api_index_lists_features() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let res = client.get(server.url("/api/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "features": ["users", "welcome"] }));
}

#[tokio::test]
async fn test_user_endpoints() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let list: Value = client
        .get(server.url("/api/users/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        list,
        json!([{ "id": 1, "name": "Alice" }, { "id": 2, "name": "Bob" }])
    );

    let res = client.get(server.url("/api/users/1/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let alice: Value = res.json().await.unwrap();
    assert_eq!(
        alice,
        json!({ "id": 1, "name": "Alice", "email": "alice@example.com" })
    );

    let res = client.get(server.url("/api/users/2/")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_welcome_endpoints() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let welcome: Value = client
        .get(server.url("/api/welcome/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(welcome, json!({ "message": "Welcome to our Awesome API!" }));

    let info: Value = client
        .get(server.url("/api/welcome/info/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["api_name"], "My Welcome API");
    assert_eq!(info["version"], "1.0.0");
    assert_eq!(
        info["endpoints"],
        json!({
            "/api/welcome/": "General welcome message.",
            "/api/welcome/info/": "This information.",
        })
    );
}

#[tokio::test]
async fn test_trailing_slash_is_optional() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    for path in ["/api/users", "/api/users/", "/api/welcome/info", "/api"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200, "GET {}", path);
    }
}

#[tokio::test]
async fn test_response_headers() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let res = client.get(server.url("/api/welcome/")).send().await.unwrap();
    let headers = res.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["referrer-policy"], "same-origin");

    let res = client
        .get(server.url("/api/welcome/"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_root_page_links_api() {
    let server = common::spawn_server(common::test_config()).await;
    let res = common::client().get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let html = res.text().await.unwrap();
    assert!(html.contains("API Backend is Running"));
    assert!(html.contains("href='/api/'"));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let app = HttpServer::new(common::test_config()).unwrap().app();
    let res = app
        .oneshot(common::get("/api/widgets/", "localhost"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disallowed_host_rejected() {
    let server = HttpServer::new(common::test_config()).unwrap();

    let res = server
        .app()
        .oneshot(common::get("/api/", "evil.example.com"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .app()
        .oneshot(common::get("/api/", "localhost:8000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wildcard_hosts() {
    let mut config = common::test_config();
    config.allowed_hosts = vec![".example.com".to_string()];
    let app = HttpServer::new(config).unwrap().app();

    let res = app
        .clone()
        .oneshot(common::get("/api/", "api.example.com"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(common::get("/api/", "example.org"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_prefix() {
    let mut config = common::test_config();
    config.api.prefix = "v1".to_string();
    let server = HttpServer::new(config).unwrap();

    assert_eq!(server.routes().reverse("user-list", &[]).as_deref(), Some("/v1/users/"));
    let res = server
        .app()
        .oneshot(common::get("/v1/users/1", "localhost"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = HttpServer::new(common::test_config()).unwrap();
    let shutdown = reactango::Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown.trigger();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_static_files_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();

    let mut config = common::test_config();
    config.static_files.enabled = true;
    config.static_files.dir = dir.path().to_path_buf();
    let app = HttpServer::new(config).unwrap().app();

    let res = app
        .clone()
        .oneshot(common::get("/static/app.js", "localhost"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(common::get("/api/users/1/", "localhost"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn test_static_url_colliding_with_routes_is_an_error() {
    let mut config = common::test_config();
    config.static_files.enabled = true;
    config.static_files.url = "/api".to_string();
    assert!(matches!(
        HttpServer::new(config),
        Err(ServerError::StaticConflict { .. })
    ));

    // With an empty prefix the features own the top-level segments.
    let mut config = common::test_config();
    config.api.prefix = String::new();
    config.static_files.enabled = true;
    config.static_files.url = "/users".to_string();
    assert!(matches!(
        HttpServer::new(config),
        Err(ServerError::StaticConflict { .. })
    ));

    let mut config = common::test_config();
    config.static_files.enabled = true;
    config.static_files.url = "/static/{file}".to_string();
    assert!(HttpServer::new(config).is_err());
}
