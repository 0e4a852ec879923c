//! A typed error result for the data-fetching seam.
//!
//! Callers of the wallet backend get an [ErrorInfo] with the HTTP status and
//! a user-facing message instead of inspecting raw error payloads.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// The message used when a failed response does not carry one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Operation failed";

/// A failed request: the HTTP status code and a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ErrorInfo {
    /// The HTTP status code of the failed response.
    pub code: u16,
    /// A message that can be shown to the user.
    pub message: String,
}

/// The result of a request to the wallet backend.
pub type ApiResult<T> = Result<T, ErrorInfo>;

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

impl ErrorInfo {
    /// Create an error with `status` and `message`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    /// Build an error from a failed response.
    ///
    /// The message is read from the `message` field of a JSON `body`. A body
    /// that is not JSON, or has no non-empty `message`, gives
    /// [DEFAULT_ERROR_MESSAGE].
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<MessageBody>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned());

        Self::new(status, message)
    }

    /// The status code as a [StatusCode], or 500 if the code is not valid.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
