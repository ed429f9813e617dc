//! Route auto-registration against real directory layouts.

use std::fs;
use std::path::Path;

use reactango::routing::{
    CandidateSource, FeatureRegistry, Registrar, RouteEntry, RouteError, RoutePattern, RouteTable,
    ScanRules,
};

async fn noop() -> &'static str {
    "ok"
}

fn root() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![RouteEntry::get("", noop)?.name("api-index")])
}

fn users() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![
        RouteEntry::get("", noop)?.name("user-list"),
        RouteEntry::get("<int:user_id>/", noop)?.name("user-detail"),
    ])
}

fn welcome() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![RouteEntry::get("", noop)?.name("welcome-general")])
}

fn broken() -> Result<Vec<RouteEntry>, RouteError> {
    Err(RouteError::Unavailable("missing dependency".to_string()))
}

fn bad_pattern() -> Result<Vec<RouteEntry>, RouteError> {
    Ok(vec![RouteEntry::get("<float:x>/", noop)?])
}

fn panicky() -> Result<Vec<RouteEntry>, RouteError> {
    panic!("feature blew up during import")
}

fn registry() -> FeatureRegistry {
    FeatureRegistry::new("api")
        .root(root)
        .feature("users", users)
        .feature("welcome", welcome)
        .feature("broken", broken)
        .feature("badpattern", bad_pattern)
        .feature("panicky", panicky)
        .feature("migrations", users)
}

fn make_dirs(root: &Path, names: &[&str]) {
    for name in names {
        fs::create_dir(root.join(name)).unwrap();
    }
}

fn mounts(table: &RouteTable) -> Vec<String> {
    table.index(&RoutePattern::root()).mounts().to_vec()
}

#[test]
fn test_directory_scan_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(
        dir.path(),
        &[
            "users",
            "widgets",
            "broken",
            "badpattern",
            "panicky",
            "migrations",
            "__pycache__",
        ],
    );
    fs::write(dir.path().join("notes.txt"), "not a feature").unwrap();

    let registry = registry();
    let registrar = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    );

    let mut table = RouteTable::from_entries(root().unwrap());
    let summary = registrar.register_all(&mut table);

    assert_eq!(summary.registered, vec!["users"]);
    assert_eq!(summary.absent, vec!["widgets"]);
    assert_eq!(summary.failed, vec!["badpattern", "broken", "panicky"]);
    assert_eq!(summary.excluded, vec!["__pycache__", "migrations"]);
    assert!(summary.duplicates.is_empty());

    // Root entry plus the users include.
    assert_eq!(table.len(), 2);
    assert_eq!(mounts(&table), vec!["users"]);
}

#[test]
fn test_registered_routes_are_reversible() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["users", "welcome"]);

    let registry = registry();
    let table = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    )
    .build_table();

    let index = table.index(&RoutePattern::parse("api/").unwrap());
    assert_eq!(index.reverse("api-index", &[]).as_deref(), Some("/api/"));
    assert_eq!(
        index.reverse("user-detail", &[("user_id", "7")]).as_deref(),
        Some("/api/users/7/")
    );
    assert_eq!(index.reverse("user-detail", &[("user_id", "x")]), None);
    assert_eq!(
        index.reverse("welcome-general", &[]).as_deref(),
        Some("/api/welcome/")
    );
}

#[test]
fn test_second_run_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["users", "welcome"]);

    let registry = registry();
    let registrar = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    );

    let mut table = RouteTable::from_entries(root().unwrap());
    let first = registrar.register_all(&mut table);
    let len = table.len();
    let second = registrar.register_all(&mut table);

    assert_eq!(first.registered, vec!["users", "welcome"]);
    assert!(second.registered.is_empty());
    assert_eq!(second.duplicates, vec!["users", "welcome"]);
    assert_eq!(table.len(), len);
}

#[test]
fn test_empty_directory_leaves_root_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry();
    let table = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    )
    .build_table();

    assert_eq!(table.len(), 1);
    assert!(mounts(&table).is_empty());
}

#[test]
fn test_single_feature_directory() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["welcome"]);

    let registry = registry();
    let table = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    )
    .build_table();

    assert_eq!(mounts(&table), vec!["welcome"]);
}

#[cfg(unix)]
#[test]
fn test_symlinked_feature_directory_is_scanned() {
    let outside = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    make_dirs(outside.path(), &["users"]);
    std::os::unix::fs::symlink(outside.path().join("users"), dir.path().join("users")).unwrap();
    fs::write(outside.path().join("welcome.txt"), "file").unwrap();
    std::os::unix::fs::symlink(outside.path().join("welcome.txt"), dir.path().join("welcome"))
        .unwrap();

    let registry = registry();
    let registrar = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    );

    assert_eq!(registrar.discover(), vec!["users"]);
    assert_eq!(mounts(&registrar.build_table()), vec!["users"]);
}

#[test]
fn test_unreadable_directory_registers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let registry = registry();
    let registrar = Registrar::new("api", &registry, CandidateSource::Directory(missing));

    assert!(registrar.discover().is_empty());
    let table = registrar.build_table();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_missing_root_aborts_registration() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["users"]);

    let registry = FeatureRegistry::new("api").feature("users", users);
    let table = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    )
    .build_table();

    assert!(table.is_empty());
}

#[test]
fn test_panicking_root_aborts_registration() {
    let registry = FeatureRegistry::new("api")
        .root(panicky)
        .feature("users", users);
    let table = Registrar::new(
        "api",
        &registry,
        CandidateSource::Names(vec!["users".to_string()]),
    )
    .build_table();

    assert!(table.is_empty());
}

#[test]
fn test_custom_scan_rules() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path(), &["users", "welcome", "migrations", "_internal"]);

    let registry = registry();
    let registrar = Registrar::new(
        "api",
        &registry,
        CandidateSource::Directory(dir.path().to_path_buf()),
    )
    .with_rules(ScanRules::new(vec!["welcome".to_string()], "_"));

    assert_eq!(registrar.discover(), vec!["migrations", "users"]);
}
