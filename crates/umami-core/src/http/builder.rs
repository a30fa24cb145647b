//! Request descriptors and URL composition
//!
//! Relative request paths may carry a literal `?query` suffix. The path part is
//! joined onto the base path with slash-path cleaning, the query is reattached
//! exactly as given.

use reqwest::{Method, Url};
use serde::Serialize;
use crate::{Error, Result};

/// A single API call, built per command and consumed by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, optionally with a literal query
    pub path: String,
    /// Serialized JSON body
    pub body: Option<Vec<u8>>,
    pub requires_auth: bool,
}

impl ApiRequest {
    /// Create a request; authentication is required by default
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Mark the request as not needing a bearer token
    pub fn without_auth(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Attach a JSON body
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            Error::invalid_request(format!("failed to encode request body: {}", e), Some(Box::new(e)))
        })?;
        self.body = Some(bytes);
        Ok(self)
    }
}

/// Path suffix every endpoint is normalized to end with
pub const API_PATH_SUFFIX: &str = "/api";

/// Trim trailing slashes and append [`API_PATH_SUFFIX`] if absent
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with(API_PATH_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_PATH_SUFFIX)
    }
}

/// Resolve a relative request path against the base URL
pub fn build_url(base: &Url, path: &str) -> Result<Url> {
    let (path_part, query) = match path.split_once('?') {
        Some((p, q)) => (p, q),
        None => (path, ""),
    };

    let mut url = base.clone();
    if !path_part.is_empty() {
        let joined = join_path(base.path(), path_part);
        url.set_path(&joined);
    }
    if !query.is_empty() {
        url.set_query(Some(query));
    }

    if url.cannot_be_a_base() {
        return Err(Error::invalid_request(
            format!("cannot build request url from {} and {}", base, path),
            None,
        ));
    }
    Ok(url)
}

fn join_path(base: &str, relative: &str) -> String {
    match (base.is_empty(), relative.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean_path(relative),
        (false, true) => clean_path(base),
        (false, false) => clean_path(&format!("{}/{}", base, relative)),
    }
}

/// Lexically clean a slash-separated path
///
/// Collapses repeated separators, drops `.` segments and resolves `..`
/// against the preceding segment. A rooted path never climbs above `/`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://analytics.example.com/api").unwrap()
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("https://a.example"), "https://a.example/api");
        assert_eq!(normalize_endpoint("https://a.example/"), "https://a.example/api");
        assert_eq!(normalize_endpoint("https://a.example/api//"), "https://a.example/api");
        assert_eq!(normalize_endpoint("https://a.example/umami"), "https://a.example/umami/api");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/api//websites/"), "/api/websites");
        assert_eq!(clean_path("/api/./teams/../websites"), "/api/websites");
        assert_eq!(clean_path("/../.."), "/");
        assert_eq!(clean_path("a/../../b"), "../b");
        assert_eq!(clean_path(""), ".");
    }

    #[test]
    fn test_build_url_joins_path() {
        let url = build_url(&base(), "/websites").unwrap();
        assert_eq!(url.as_str(), "https://analytics.example.com/api/websites");

        let url = build_url(&base(), "teams/t1/websites").unwrap();
        assert_eq!(url.as_str(), "https://analytics.example.com/api/teams/t1/websites");
    }

    #[test]
    fn test_build_url_keeps_literal_query() {
        let url = build_url(&base(), "/websites/abc/stats?foo=bar&startAt=1").unwrap();
        assert_eq!(url.path(), "/api/websites/abc/stats");
        assert_eq!(url.query(), Some("foo=bar&startAt=1"));
    }

    #[test]
    fn test_build_url_empty_path_keeps_base() {
        let url = build_url(&base(), "").unwrap();
        assert_eq!(url.as_str(), "https://analytics.example.com/api");

        let url = build_url(&base(), "?x=1").unwrap();
        assert_eq!(url.path(), "/api");
        assert_eq!(url.query(), Some("x=1"));
    }

    #[test]
    fn test_build_url_resolves_dot_segments() {
        let url = build_url(&base(), "/websites/../teams").unwrap();
        assert_eq!(url.path(), "/api/teams");
    }

    #[test]
    fn test_request_defaults() {
        let request = ApiRequest::get("/teams");
        assert_eq!(request.method, Method::GET);
        assert!(request.requires_auth);
        assert!(request.body.is_none());

        let request = ApiRequest::post("/auth/login")
            .without_auth()
            .with_json(&serde_json::json!({"username": "bob"}))
            .unwrap();
        assert!(!request.requires_auth);
        assert_eq!(request.body.as_deref(), Some(br#"{"username":"bob"}"#.as_slice()));
    }
}
