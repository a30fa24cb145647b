//! Translation of error responses
//!
//! Status errors embed the response body, either capped at a byte limit or
//! complete, with surrounding whitespace trimmed.

use reqwest::Response;
use crate::Error;

/// Read at most `limit` bytes of the body; read failures end the body early
pub(crate) async fn read_limited(mut response: Response, limit: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = (limit - buf.len()).min(chunk.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) | Err(_) => break,
        }
    }
    buf
}

/// Build the status error for a response body
pub(crate) fn status_error(status: u16, body: &[u8]) -> Error {
    Error::HttpStatus {
        status,
        body: String::from_utf8_lossy(body).trim().to_string(),
    }
}

/// Consume a failed response, keeping at most `limit` bytes of its body
pub(crate) async fn from_response(response: Response, limit: usize) -> Error {
    let status = response.status().as_u16();
    let body = read_limited(response, limit).await;
    status_error(status, &body)
}
