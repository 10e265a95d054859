//! API error handling for the Stack Breeze Web API.
//!
//! Every failure is rendered as the standard envelope. Domain failures use
//! HTTP 200 and carry their meaning in `code`/`message`; only a missing
//! principal (401) and rate limiting (429) change the transport status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorCode;
use crate::web::dto::ApiResponse;
use crate::BreezeError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error with the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    /// Create a new API error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            code,
            message: message.into(),
        }
    }

    /// Create a client error (bad input).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ClientError, message)
    }

    /// Create an unauthorized error (HTTP 401).
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            ..Self::new(ErrorCode::Unauthorized)
        }
    }

    /// Create a rate limit error (HTTP 429).
    pub fn too_many_requests() -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            ..Self::new(ErrorCode::TooManyRequests)
        }
    }

    /// Create a client error from validator::ValidationErrors.
    ///
    /// Only the first message (by field name) is reported.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let message = fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .unwrap_or_else(|| ErrorCode::ClientError.message().to_string());

        Self::bad_request(message)
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Envelope code of the response.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Envelope message of the response.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse::fail(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<BreezeError> for ApiError {
    fn from(err: BreezeError) -> Self {
        if err.is_client_error() {
            tracing::warn!(code = %err.code(), "Request failed: {}", err);
        } else {
            tracing::error!(code = %err.code(), "Internal error: {}", err);
        }
        ApiError::with_message(err.code(), err.client_message())
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self {
        ApiError::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_api_error_constructors() {
        let err = ApiError::bad_request("bad");
        assert_eq!(err.code(), ErrorCode::ClientError);
        assert_eq!(err.status(), StatusCode::OK);
        assert_eq!(err.message(), "bad");

        let err = ApiError::unauthorized();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = ApiError::too_many_requests();
        assert_eq!(err.code(), ErrorCode::TooManyRequests);
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);

        let err = ApiError::new(ErrorCode::ServiceError);
        assert_eq!(err.code(), ErrorCode::ServiceError);
        assert_eq!(err.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_domain_error_is_http_200() {
        let err: ApiError = BreezeError::Client(ErrorCode::UsernameAlreadyExists).into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], "A0015");
        assert_eq!(json["message"], "Username already exists");
        assert!(json["data"].is_null());
        assert!(json["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let err: ApiError = BreezeError::Database("disk I/O error at /var/db".to_string()).into();
        let (status, json) = body_json(err).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], "B0001");
        assert_eq!(json["message"], "Internal service error");
    }

    #[tokio::test]
    async fn test_unauthorized_is_http_401() {
        let (status, json) = body_json(ApiError::unauthorized()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "A0019");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 0, message = "sort must not be negative"))]
        sort: i32,
    }

    #[test]
    fn test_from_validation_errors_reports_first_field() {
        let sample = Sample {
            name: String::new(),
            sort: -1,
        };
        let err = ApiError::from_validation_errors(sample.validate().unwrap_err());
        assert_eq!(err.code(), ErrorCode::ClientError);
        assert_eq!(err.message(), "name is required");
    }
}
