//! Stack Breeze - personal navigation and daily life record backend.
//!
//! Stateless JWT authentication, navigation bookmarks grouped by category,
//! and per-user daily life records behind a uniform JSON response envelope.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod records;
pub mod web;

pub use auth::{Principal, TokenService, UserProfile, UserService};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository, UserUpdate};
pub use error::{BreezeError, ErrorCode, Result};
pub use web::WebServer;
