//! Authentication module for Stack Breeze.
//!
//! This module provides password hashing, bearer token handling,
//! input validation and the user service.

mod password;
mod service;
mod token;
pub mod validation;

pub use password::{Argon2Hasher, CredentialHasher, PasswordError};
pub use service::{
    LoginCommand, LoginResult, Principal, RegisterCommand, UserProfile, UserService, TOKEN_TYPE,
};
pub use token::{Claims, TokenError, TokenService};
pub use validation::ValidationError;
