//! Request DTOs for Web API.
//!
//! Field names are camelCase on the wire.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::navigation::{CategoryUpdate, NewCategory, NewWebsite, WebsiteUpdate};
use crate::web::error::ApiError;

/// User registration request.
///
/// Field rules are enforced by the user service.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Username (3-20 letters, digits or underscores).
    #[schema(example = "alice")]
    pub username: String,
    /// Email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (6-50 chars, upper, lower and digit).
    #[schema(example = "Passw0rd")]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    #[schema(example = "alice")]
    pub username_or_email: String,
    /// Password.
    pub password: String,
}

/// `?id=` query parameter.
#[derive(Debug, Deserialize, IntoParams)]
pub struct IdQuery {
    /// Target ID.
    pub id: i64,
}

/// Navigation category save/update request.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    /// Category ID (required for update).
    pub id: Option<i64>,
    /// Display name.
    #[validate(length(min = 1, max = 50, message = "categoryName must be 1-50 characters"))]
    pub category_name: Option<String>,
    /// Sort key.
    pub category_sort: Option<i32>,
    /// Remark.
    #[validate(length(max = 500, message = "remark must be at most 500 characters"))]
    pub remark: Option<String>,
}

impl CategoryRequest {
    /// Convert into a new category. The name is required.
    pub fn into_new(self) -> Result<NewCategory, ApiError> {
        let category_name = required(self.category_name, "categoryName")?;
        Ok(NewCategory {
            category_name,
            category_sort: self.category_sort.unwrap_or(0),
            remark: self.remark,
            create_by: None,
        })
    }

    /// Split into the target ID and a partial update. The ID is required.
    pub fn into_update(self) -> Result<(i64, CategoryUpdate), ApiError> {
        let id = self.id.ok_or_else(|| ApiError::bad_request("id is required"))?;
        if let Some(ref name) = self.category_name {
            not_blank(name, "categoryName")?;
        }
        Ok((
            id,
            CategoryUpdate {
                category_name: self.category_name,
                category_sort: self.category_sort,
                remark: self.remark.map(Some),
                update_by: None,
            },
        ))
    }
}

/// Navigation website save/update request.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRequest {
    /// Website ID (required for update).
    pub id: Option<i64>,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "siteName must be 1-100 characters"))]
    pub site_name: Option<String>,
    /// Target URL.
    #[validate(length(min = 1, max = 500, message = "siteUrl must be 1-500 characters"))]
    pub site_url: Option<String>,
    /// Icon URL.
    #[validate(length(max = 500, message = "siteIcon must be at most 500 characters"))]
    pub site_icon: Option<String>,
    /// Short description.
    #[validate(length(max = 500, message = "siteOverview must be at most 500 characters"))]
    pub site_overview: Option<String>,
    /// Sort key.
    pub site_sort: Option<i32>,
    /// Owning category.
    pub category_id: Option<i64>,
    /// Remark.
    #[validate(length(max = 500, message = "remark must be at most 500 characters"))]
    pub remark: Option<String>,
}

impl WebsiteRequest {
    /// Convert into a new website. Name, URL and category are required.
    pub fn into_new(self) -> Result<NewWebsite, ApiError> {
        let site_name = required(self.site_name, "siteName")?;
        let site_url = required(self.site_url, "siteUrl")?;
        check_url(&site_url)?;
        let category_id = self
            .category_id
            .ok_or_else(|| ApiError::bad_request("categoryId is required"))?;

        Ok(NewWebsite {
            site_name,
            site_url,
            site_icon: self.site_icon,
            site_overview: self.site_overview,
            site_sort: self.site_sort.unwrap_or(0),
            category_id,
            remark: self.remark,
            create_by: None,
        })
    }

    /// Split into the target ID and a partial update. The ID is required.
    pub fn into_update(self) -> Result<(i64, WebsiteUpdate), ApiError> {
        let id = self.id.ok_or_else(|| ApiError::bad_request("id is required"))?;
        if let Some(ref name) = self.site_name {
            not_blank(name, "siteName")?;
        }
        if let Some(ref url) = self.site_url {
            check_url(url)?;
        }

        Ok((
            id,
            WebsiteUpdate {
                site_name: self.site_name,
                site_url: self.site_url,
                site_icon: self.site_icon.map(Some),
                site_overview: self.site_overview.map(Some),
                site_sort: self.site_sort,
                category_id: self.category_id,
                remark: self.remark.map(Some),
                update_by: None,
            },
        ))
    }
}

/// Daily life record save/update request.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    /// Record ID (required for update).
    pub id: Option<i64>,
    /// Record text.
    #[validate(length(min = 1, max = 5000, message = "content must be 1-5000 characters"))]
    pub content: Option<String>,
    /// Remark.
    #[validate(length(max = 500, message = "remark must be at most 500 characters"))]
    pub remark: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) => {
            not_blank(&v, field)?;
            Ok(v)
        }
        None => Err(ApiError::bad_request(format!("{} is required", field))),
    }
}

fn not_blank(value: &str, field: &str) -> Result<(), ApiError> {
    super::validation::not_empty_trimmed(value)
        .map_err(|_| ApiError::bad_request(format!("{} must not be blank", field)))
}

fn check_url(value: &str) -> Result<(), ApiError> {
    super::validation::http_url(value)
        .map_err(|_| ApiError::bad_request("siteUrl must be an http or https URL"))
}

/// Require a record's content on save.
pub(crate) fn required_content(value: Option<String>) -> Result<String, ApiError> {
    required(value, "content")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_login_request_camel_case() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"usernameOrEmail":"alice","password":"Passw0rd"}"#).unwrap();
        assert_eq!(req.username_or_email, "alice");
    }

    #[test]
    fn test_category_into_new() {
        let req: CategoryRequest =
            serde_json::from_str(r#"{"categoryName":"Tools","categorySort":3}"#).unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.category_name, "Tools");
        assert_eq!(new.category_sort, 3);

        let err = CategoryRequest::default().into_new().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ClientError);
        assert_eq!(err.message(), "categoryName is required");
    }

    #[test]
    fn test_category_into_update_requires_id() {
        let req = CategoryRequest {
            category_name: Some("Tools".to_string()),
            ..Default::default()
        };
        assert_eq!(req.into_update().unwrap_err().message(), "id is required");

        let req = CategoryRequest {
            id: Some(7),
            category_sort: Some(1),
            ..Default::default()
        };
        let (id, update) = req.into_update().unwrap();
        assert_eq!(id, 7);
        assert_eq!(update.category_sort, Some(1));
        assert!(update.category_name.is_none());
        assert!(update.remark.is_none());
    }

    #[test]
    fn test_website_into_new() {
        let req: WebsiteRequest = serde_json::from_str(
            r#"{"siteName":"Rust","siteUrl":"https://www.rust-lang.org","categoryId":1}"#,
        )
        .unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.site_name, "Rust");
        assert_eq!(new.category_id, 1);
        assert_eq!(new.site_sort, 0);
    }

    #[test]
    fn test_website_into_new_rejects_bad_url() {
        let req = WebsiteRequest {
            site_name: Some("Bad".to_string()),
            site_url: Some("javascript:alert(1)".to_string()),
            category_id: Some(1),
            ..Default::default()
        };
        let err = req.into_new().unwrap_err();
        assert_eq!(err.message(), "siteUrl must be an http or https URL");
    }

    #[test]
    fn test_website_into_new_requires_category() {
        let req = WebsiteRequest {
            site_name: Some("Rust".to_string()),
            site_url: Some("https://www.rust-lang.org".to_string()),
            ..Default::default()
        };
        assert_eq!(
            req.into_new().unwrap_err().message(),
            "categoryId is required"
        );
    }

    #[test]
    fn test_validate_lengths() {
        let req = WebsiteRequest {
            site_name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = CategoryRequest {
            category_name: Some("Tools".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }
}
