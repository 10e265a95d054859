//! OpenAPI document.
//!
//! Every response is wrapped in the `{code, message, data, timestamp}`
//! envelope; path docs describe the `data` payload.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{CategoryRequest, LoginRequest, RecordRequest, RegisterRequest, WebsiteRequest};
use super::handlers;
use crate::auth::{LoginResult, UserProfile};
use crate::navigation::{CategoryWithWebsites, NavigationCategory, NavigationWebsite};
use crate::records::DailyLifeRecord;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::profile,
        handlers::navigation::save_category,
        handlers::navigation::delete_category,
        handlers::navigation::update_category,
        handlers::navigation::list_categories,
        handlers::navigation::save_website,
        handlers::navigation::delete_website,
        handlers::navigation::update_website,
        handlers::navigation::batch_update_websites,
        handlers::navigation::list_websites,
        handlers::navigation::list_websites_by_category,
        handlers::records::list_records,
        handlers::records::save_record,
        handlers::records::remove_record,
        handlers::records::update_record,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UserProfile,
            LoginResult,
            CategoryRequest,
            WebsiteRequest,
            RecordRequest,
            NavigationCategory,
            NavigationWebsite,
            CategoryWithWebsites,
            DailyLifeRecord,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and profile"),
        (name = "navigation", description = "Navigation categories and websites"),
        (name = "records", description = "Daily life records")
    ),
    info(
        title = "Stack Breeze API",
        version = "0.1.0",
        description = "Personal navigation and daily life record backend"
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
