/// Error types shared by the provider clients.
///
/// These represent failures talking to an upstream filing API: the request never
/// completed, the upstream answered with a non-success status, or the body was not
/// the JSON the caller asked for. Application-specific errors should be defined in
/// each server crate and wrap `CommonError` via `#[from]`.
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },
}

impl CommonError {
    /// True when the request gave up waiting on the upstream.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommonError::Request(e) if e.is_timeout())
    }
}
