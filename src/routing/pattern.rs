//! Route path templates.
//!
//! # Responsibilities
//! - Parse Django-style (`<int:user_id>/`) and axum-style (`{user_id}`) templates
//! - Normalize formatting (leading, trailing and repeated slashes)
//! - Derive a typed key used for duplicate detection
//! - Render templates in the syntax axum's matcher expects
//!
//! # Design Decisions
//! - Slashes are formatting only: `users`, `/users/` and `users//` are one template
//! - Parameter names and converters are not part of the key, because the
//!   matcher cannot tell `{id}` and `{user_id}` apart
//! - A catch-all (`path` converter) may only appear as the last segment

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing or joining a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unknown path converter '{converter}' in '{pattern}'")]
    UnknownConverter { pattern: String, converter: String },

    #[error("invalid parameter name '{name}' in '{pattern}'")]
    InvalidParamName { pattern: String, name: String },

    #[error("duplicate parameter name '{name}' in '{pattern}'")]
    DuplicateParam { pattern: String, name: String },

    #[error("segment '{segment}' in '{pattern}' mixes literal text with a parameter")]
    MixedSegment { pattern: String, segment: String },

    #[error("catch-all parameter must be the last segment of '{pattern}'")]
    CatchAllNotLast { pattern: String },

    #[error("invalid character {ch:?} in '{pattern}'")]
    InvalidCharacter { pattern: String, ch: char },
}

/// Value converter attached to a path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Converter {
    Str,
    Int,
    Slug,
    Uuid,
    /// Matches the rest of the path, slashes included.
    Path,
}

impl Converter {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "slug" => Some(Self::Slug),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Slug => "slug",
            Self::Uuid => "uuid",
            Self::Path => "path",
        }
    }

    /// Returns true if `value` is a valid rendering of this converter.
    pub fn accepts(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match self {
            Self::Str => !value.contains('/'),
            Self::Int => value.bytes().all(|b| b.is_ascii_digit()),
            Self::Slug => value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
            // Lowercase, hyphenated form only.
            Self::Uuid => uuid::Uuid::try_parse(value)
                .map(|id| id.hyphenated().to_string() == value)
                .unwrap_or(false),
            Self::Path => true,
        }
    }
}

/// One normalized segment of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param { name: String, converter: Converter },
}

impl Segment {
    fn is_catch_all(&self) -> bool {
        matches!(
            self,
            Segment::Param {
                converter: Converter::Path,
                ..
            }
        )
    }
}

/// Shape of a segment with names and converters erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySegment {
    Literal(String),
    Param,
    CatchAll,
}

/// Identity of a template for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(Vec<KeySegment>);

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            match segment {
                KeySegment::Literal(text) => write!(f, "/{}", text)?,
                KeySegment::Param => write!(f, "/{{}}")?,
                KeySegment::CatchAll => write!(f, "/{{*}}")?,
            }
        }
        Ok(())
    }
}

/// A normalized route template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// The empty template, matching the mount point itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a template string.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let segments = pattern
            .split('/')
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_segment(pattern, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_segments(pattern, segments)
    }

    fn from_segments(source: &str, segments: Vec<Segment>) -> Result<Self, PatternError> {
        let mut names: Vec<&str> = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_catch_all() && i + 1 != segments.len() {
                return Err(PatternError::CatchAllNotLast {
                    pattern: source.to_string(),
                });
            }
            if let Segment::Param { name, .. } = segment {
                if names.contains(&name.as_str()) {
                    return Err(PatternError::DuplicateParam {
                        pattern: source.to_string(),
                        name: name.clone(),
                    });
                }
                names.push(name);
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The leading segment when it is a literal.
    pub fn first_literal(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Literal(text)) => Some(text),
            _ => None,
        }
    }

    pub fn has_params(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param { .. }))
    }

    /// Append `other` below this template.
    pub fn join(&self, other: &RoutePattern) -> Result<Self, PatternError> {
        let joined: Vec<Segment> = self
            .segments
            .iter()
            .chain(other.segments.iter())
            .cloned()
            .collect();
        Self::from_segments(&format!("{}{}", self, other), joined)
    }

    pub fn key(&self) -> RouteKey {
        RouteKey(
            self.segments
                .iter()
                .map(|segment| match segment {
                    Segment::Literal(text) => KeySegment::Literal(text.clone()),
                    Segment::Param {
                        converter: Converter::Path,
                        ..
                    } => KeySegment::CatchAll,
                    Segment::Param { .. } => KeySegment::Param,
                })
                .collect(),
        )
    }

    /// Render as an axum path (`/users/{user_id}`).
    pub fn to_axum_path(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param {
                    name,
                    converter: Converter::Path,
                } => {
                    path.push_str("{*");
                    path.push_str(name);
                    path.push('}');
                }
                Segment::Param { name, .. } => {
                    path.push('{');
                    path.push_str(name);
                    path.push('}');
                }
            }
        }
        path
    }

    /// Build a concrete URL from parameter values.
    ///
    /// Returns `None` if a parameter is missing or its value is rejected by
    /// the parameter's converter. URLs end with a slash unless they end in a
    /// catch-all value.
    pub fn reverse(&self, params: &[(&str, &str)]) -> Option<String> {
        let mut url = String::from("/");
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Param { name, converter } => {
                    let (_, value) = params.iter().find(|(key, _)| key == name)?;
                    if !converter.accepts(value) {
                        return None;
                    }
                    url.push_str(value);
                }
            }
            if !segment.is_catch_all() {
                url.push('/');
            }
        }
        Some(url)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}/", text)?,
                Segment::Param { name, converter } => {
                    write!(f, "<{}:{}>/", converter.as_str(), name)?
                }
            }
        }
        Ok(())
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, PatternError> {
    if let Some(inner) = raw.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        if inner.contains(['<', '>']) {
            return Err(mixed(pattern, raw));
        }
        let (converter, name) = match inner.split_once(':') {
            Some((conv, name)) => {
                let converter =
                    Converter::from_name(conv).ok_or_else(|| PatternError::UnknownConverter {
                        pattern: pattern.to_string(),
                        converter: conv.to_string(),
                    })?;
                (converter, name)
            }
            None => (Converter::Str, inner),
        };
        return param(pattern, name, converter);
    }

    if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        if inner.contains(['{', '}']) {
            return Err(mixed(pattern, raw));
        }
        return match inner.strip_prefix('*') {
            Some(name) => param(pattern, name, Converter::Path),
            None => param(pattern, inner, Converter::Str),
        };
    }

    if raw.contains(['<', '>', '{', '}']) {
        return Err(mixed(pattern, raw));
    }
    if let Some(ch) = raw
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '?' | '#'))
    {
        return Err(PatternError::InvalidCharacter {
            pattern: pattern.to_string(),
            ch,
        });
    }
    // axum rejects segments that look like its older capture syntax.
    if let Some(ch) = raw.chars().next().filter(|c| matches!(c, ':' | '*')) {
        return Err(PatternError::InvalidCharacter {
            pattern: pattern.to_string(),
            ch,
        });
    }
    Ok(Segment::Literal(raw.to_string()))
}

fn param(pattern: &str, name: &str, converter: Converter) -> Result<Segment, PatternError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(PatternError::InvalidParamName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }
    Ok(Segment::Param {
        name: name.to_string(),
        converter,
    })
}

fn mixed(pattern: &str, segment: &str) -> PatternError {
    PatternError::MixedSegment {
        pattern: pattern.to_string(),
        segment: segment.to_string(),
    }
}
