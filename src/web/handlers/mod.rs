//! API handlers.

pub mod auth;
pub mod navigation;
pub mod records;

pub use auth::*;
pub use navigation::*;
pub use records::*;

use std::sync::Arc;

use crate::auth::{Argon2Hasher, TokenService, UserService};
use crate::config::Config;
use crate::db::UserRepository;
use crate::{Database, Result};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Register/login/profile façade.
    pub users: UserService,
}

impl AppState {
    /// Create application state from an opened database and a user service.
    pub fn new(db: Database, users: UserService) -> Self {
        Self { db, users }
    }

    /// Wire the Argon2 hasher, token service and user repository from configuration.
    pub fn from_config(db: Database, config: &Config) -> Result<Self> {
        let hasher = Argon2Hasher::new(&config.password)?;
        let tokens = TokenService::from_config(&config.jwt);
        let store = UserRepository::new(db.pool().clone());
        let users = UserService::new(Arc::new(store), Arc::new(hasher), Arc::new(tokens));
        Ok(Self::new(db, users))
    }
}
