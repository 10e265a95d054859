//! Response envelope for Web API.

use serde::Serialize;

use crate::datetime;
use crate::error::ErrorCode;

/// Envelope wrapping every API response, including failures.
///
/// `code` is `"00000"` on success and `<source><number>` on failure. The
/// OpenAPI document describes the `data` payload of each endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Result code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Payload, null on failure.
    pub data: Option<T>,
    /// Server time in epoch milliseconds.
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Ok,
            message: ErrorCode::Ok.message().to_string(),
            data: Some(data),
            timestamp: datetime::epoch_millis(),
        }
    }

    /// Create a failure response with no payload.
    pub fn fail(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            timestamp: datetime::epoch_millis(),
        }
    }
}
