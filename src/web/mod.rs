//! Web API module for Stack Breeze.
//!
//! REST endpoints for authentication, navigation and daily life records,
//! all answering with the uniform response envelope.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
