//! HTTP transport for the Umami REST API
//!
//! This module provides:
//! - Request descriptors and URL composition against a normalized base endpoint
//! - Bearer-token authentication with fail-fast on a missing token
//! - Uniform translation of transport failures and error statuses
//! - Opt-in request diagnostics that never reveal the token

pub mod builder;
pub mod client;
pub mod diagnostics;
pub mod error;

pub use builder::{build_url, clean_path, normalize_endpoint, ApiRequest, API_PATH_SUFFIX};
pub use client::{ApiResponse, RawResponse, Transport, ERROR_BODY_LIMIT, REQUEST_TIMEOUT};
pub use diagnostics::{Diagnostics, DiagnosticsConfig, SharedBuffer};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
