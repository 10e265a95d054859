//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Malformed JSON and validation failures are both reported as a client
/// error (`A0001`) in the envelope.
///
/// # Example
///
/// ```ignore
/// use stack_breeze::web::dto::ValidatedJson;
///
/// async fn save(
///     ValidatedJson(payload): ValidatedJson<CategoryRequest>,
/// ) -> Result<Json<ApiResponse<bool>>, ApiError> {
///     // payload is already validated
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}

/// Validate that a string is an absolute http(s) URL with a usable host.
pub fn http_url(value: &str) -> Result<(), validator::ValidationError> {
    let invalid = || {
        validator::ValidationError::new("http_url")
            .with_message("Must be an http or https URL".into())
    };

    // The parser silently strips surrounding and embedded whitespace.
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let parsed = url::Url::parse(value).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    match parsed.host() {
        Some(url::Host::Domain(domain)) => {
            // A single trailing dot is a fully qualified name.
            let domain = domain.strip_suffix('.').unwrap_or(domain);
            if domain.is_empty() || domain.split('.').any(str::is_empty) {
                return Err(invalid());
            }
            Ok(())
        }
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => Ok(()),
        None => Err(invalid()),
    }
}
