//! Error types for the Umami core library
//!
//! Every failure the transport or query layer can produce is a variant of
//! [`Error`]. Callers that need to branch on the failure class use
//! [`Error::kind`] instead of matching on message text.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Remediation text shown when an authenticated call has no token
pub const MISSING_TOKEN_MESSAGE: &str =
    "missing token: run `umami auth login` or set UMAMI_TOKEN";

/// Main error type for Umami operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing endpoint
    #[error("{message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// Authenticated request attempted without a token
    #[error("{message}")]
    AuthenticationRequired { message: String },

    /// Network, DNS, TLS or timeout failure
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote answered with status >= 400
    #[error("request failed ({status}): {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("{message}")]
    Decode {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Required caller-supplied parameter missing
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Request could not be built (URL or body serialization)
    #[error("{message}")]
    InvalidRequest {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Configuration,
    AuthenticationRequired,
    Transport,
    HttpStatus,
    Decode,
    Validation,
    InvalidRequest,
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create the missing-token error
    pub fn authentication_required() -> Self {
        Self::AuthenticationRequired {
            message: MISSING_TOKEN_MESSAGE.to_string(),
        }
    }

    /// Create a validation error for a required field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for "<field> is required"
    pub fn required(field: &str) -> Self {
        Self::validation(field, format!("{} is required", field))
    }

    /// Create a decode error with a custom message
    pub fn decode(message: impl Into<String>, source: Option<serde_json::Error>) -> Self {
        Self::Decode {
            message: message.into(),
            status: None,
            source,
        }
    }

    /// Create a request-building error
    pub fn invalid_request(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::AuthenticationRequired { .. } => ErrorKind::AuthenticationRequired,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    /// HTTP status attached to the error, if the request reached the server
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Decode { status, .. } => *status,
            _ => None,
        }
    }

    /// Response body of an HTTP status error
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::AuthenticationRequired => "authentication_required",
            ErrorKind::Transport => "transport",
            ErrorKind::HttpStatus => "http_status",
            ErrorKind::Decode => "decode",
            ErrorKind::Validation => "validation",
            ErrorKind::InvalidRequest => "invalid_request",
        };
        write!(f, "{}", name)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport {
            message: err.to_string(),
            source: err,
        }
    }
}
