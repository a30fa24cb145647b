//! Transport for the Umami API
//!
//! Owns the normalized base URL, an optional bearer token, the diagnostics
//! writer and a pooled `reqwest` client with a fixed request timeout.

use std::fmt;
use std::time::Duration;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use crate::http::builder::{build_url, ApiRequest};
use crate::http::diagnostics::Diagnostics;
use crate::http::error;
use crate::{Error, Result};

/// Request-level timeout applied to every call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of body bytes embedded in a status error by [`Transport::execute`]
pub const ERROR_BODY_LIMIT: usize = 8192;

const APPLICATION_JSON: &str = "application/json";

/// Decoded response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Undecoded response with the complete body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP transport bound to one API endpoint
#[derive(Clone)]
pub struct Transport {
    base_url: Url,
    token: Option<String>,
    client: ReqwestClient,
    diagnostics: Diagnostics,
}

impl Transport {
    /// Create a transport for `endpoint`
    ///
    /// The endpoint must be non-empty, carry a `scheme://` prefix and parse as
    /// a URL. Trailing slashes are stripped from its path. An empty token is
    /// treated as no token.
    pub fn new(endpoint: &str, token: Option<&str>, diagnostics: Diagnostics) -> Result<Self> {
        if endpoint.is_empty() {
            return Err(Error::configuration("endpoint required"));
        }
        if !endpoint.contains("://") {
            return Err(Error::configuration(format!(
                "endpoint must include scheme: {}",
                endpoint
            )));
        }

        let mut base_url = Url::parse(endpoint).map_err(|e| Error::Configuration {
            message: format!("invalid endpoint: {}", e),
            source: Some(e),
        })?;
        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);

        let client = ReqwestClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
            client,
            diagnostics,
        })
    }

    /// Copy of this transport holding a different token
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: if token.is_empty() { None } else { Some(token) },
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Absolute URL a request path resolves to
    pub fn url_for(&self, path: &str) -> Result<Url> {
        build_url(&self.base_url, path)
    }

    /// Execute a request and decode the JSON response into `T`
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<ApiResponse<T>> {
        let response = self.send(request, true).await?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(error::from_response(response, ERROR_BODY_LIMIT).await);
        }

        let bytes = response.bytes().await?;
        let data = serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            message: format!("failed to decode response: {}", e),
            status: Some(status),
            source: Some(e),
        })?;
        Ok(ApiResponse { status, data })
    }

    /// Execute a request without decoding the response body
    pub async fn execute_status(&self, request: &ApiRequest) -> Result<u16> {
        let response = self.send(request, false).await?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(error::from_response(response, ERROR_BODY_LIMIT).await);
        }
        Ok(status)
    }

    /// Execute a request and return the complete, undecoded body
    ///
    /// On an error status the returned error carries the full body.
    pub async fn execute_raw(&self, request: &ApiRequest) -> Result<RawResponse> {
        let response = self.send(request, true).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        if status >= 400 {
            return Err(error::status_error(status, &body));
        }
        Ok(RawResponse { status, body })
    }

    async fn send(&self, request: &ApiRequest, accept_json: bool) -> Result<Response> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.client.request(request.method.clone(), url.clone());

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .body(body.clone());
        }
        if request.requires_auth {
            let token = self
                .token
                .as_deref()
                .ok_or_else(Error::authentication_required)?;
            builder = builder.bearer_auth(token);
        }
        if accept_json {
            builder = builder.header(ACCEPT, APPLICATION_JSON);
        }

        let token_len = self.token.as_deref().map(str::len).unwrap_or(0);
        debug!(
            method = %request.method,
            url = %url,
            auth = request.requires_auth,
            token_len,
            "Sending request"
        );
        self.diagnostics.request(
            request.method.as_str(),
            url.as_str(),
            request.requires_auth,
            self.token.as_deref(),
        );

        let response = builder.send().await?;
        let status = response.status().as_u16();

        debug!(status, url = %url, "Received response");
        self.diagnostics.response(status, url.as_str());

        Ok(response)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("token_set", &self.token.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn transport(endpoint: &str) -> Result<Transport> {
        Transport::new(endpoint, None, Diagnostics::disabled())
    }

    #[test]
    fn test_rejects_missing_scheme() {
        let err = transport("example.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "endpoint must include scheme: example.com");
    }

    #[test]
    fn test_rejects_empty_endpoint() {
        let err = transport("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "endpoint required");
    }

    #[test]
    fn test_rejects_unparsable_endpoint() {
        let err = transport("http://exa mple.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().starts_with("invalid endpoint:"));
    }

    #[test]
    fn test_strips_trailing_slashes() {
        let t = transport("https://analytics.example.com/api///").unwrap();
        assert_eq!(t.base_url().path(), "/api");
        assert_eq!(
            t.url_for("/websites").unwrap().as_str(),
            "https://analytics.example.com/api/websites"
        );
    }

    #[test]
    fn test_with_token_leaves_original() {
        let original = transport("https://analytics.example.com/api").unwrap();
        let authed = original.with_token("abc");
        assert!(!original.has_token());
        assert!(authed.has_token());
        assert_eq!(authed.base_url(), original.base_url());

        let cleared = authed.with_token("");
        assert!(!cleared.has_token());
        assert!(authed.has_token());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let t = Transport::new("https://x.example/api", Some(""), Diagnostics::disabled()).unwrap();
        assert!(!t.has_token());
    }

    #[test]
    fn test_debug_hides_token() {
        let t = transport("https://x.example/api").unwrap().with_token("very-secret");
        let rendered = format!("{:?}", t);
        assert!(rendered.contains("token_set: true"));
        assert!(!rendered.contains("very-secret"));
    }
}
