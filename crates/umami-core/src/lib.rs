//! Umami Core - HTTP transport and query construction for the Umami analytics API
//!
//! This crate provides the pieces every Umami command is built from: a
//! transport bound to one API endpoint and a builder that turns time ranges,
//! filters and options into query strings.
//!
//! # Main Components
//!
//! - **Error Handling**: One error enum with a machine-readable [`ErrorKind`]
//! - **Transport**: Bearer-token requests with uniform status handling
//! - **Query Builder**: Deterministic query strings for analytics resources
//! - **Wire Types**: Login, team and website payloads
//!
//! # Example
//!
//! ```no_run
//! use umami_core::{
//!     api::AnalyticsResource, build_query, with_query, ApiRequest, Diagnostics, FilterSet,
//!     QueryOptions, Result, TimeRange, Transport,
//! };
//!
//! async fn stats(website_id: &str) -> Result<serde_json::Value> {
//!     let transport = Transport::new("https://analytics.example.com/api", Some("token"), Diagnostics::disabled())?;
//!     let range = TimeRange::default().normalize();
//!     let query = build_query(&range, &QueryOptions::default(), &FilterSet::default());
//!     let path = with_query(&AnalyticsResource::Stats.path(website_id)?, &query);
//!     Ok(transport.execute(&ApiRequest::get(path)).await?.data)
//! }
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export main types for convenience
pub use error::{Error, ErrorKind, Result, MISSING_TOKEN_MESSAGE};
pub use http::{
    normalize_endpoint, ApiRequest, ApiResponse, Diagnostics, DiagnosticsConfig, RawResponse,
    Transport,
};
pub use query::{build_query, with_query, FilterSet, QueryOptions, QueryString, TimeRange};

/// Version of the umami-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
