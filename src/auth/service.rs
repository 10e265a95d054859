//! User service: registration, login and profile lookup.
//!
//! The service is wired explicitly with its collaborators and never reads
//! ambient request state. The caller passes the authenticated principal.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::password::CredentialHasher;
use super::token::TokenService;
use super::validation::{validate_login, validate_registration};
use crate::datetime;
use crate::db::{NewUser, User, UserStore};
use crate::error::ErrorCode;
use crate::{BreezeError, Result};

/// Token type reported alongside issued tokens.
pub const TOKEN_TYPE: &str = "Bearer";

/// The authenticated identity for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Username carried in the token subject.
    pub username: String,
}

impl Principal {
    /// Create a principal for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    /// Username or email.
    pub username_or_email: String,
    /// Plaintext password.
    pub password: String,
}

/// Public view of a user. Never contains the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Creation time (RFC 3339).
    pub create_time: String,
    /// Last update time (RFC 3339).
    pub update_time: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            create_time: datetime::to_rfc3339(&user.create_time),
            update_time: datetime::to_rfc3339_opt(user.update_time.as_deref()),
        }
    }
}

/// Successful login result.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Bearer token.
    pub access_token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// Profile of the logged-in user.
    pub user_info: UserProfile,
}

/// Façade over the credential store, password hasher and token service.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
}

impl UserService {
    /// Create a new user service.
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Token service used for issuing tokens.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Register a new user.
    ///
    /// 1. Validates all input fields
    /// 2. Checks that the username and email are free
    /// 3. Hashes the password
    /// 4. Inserts the user
    ///
    /// The store re-checks uniqueness inside its insert transaction and maps a
    /// concurrent unique violation to the same error as the pre-check.
    pub async fn register(&self, cmd: RegisterCommand) -> Result<UserProfile> {
        validate_registration(&cmd.username, &cmd.email, &cmd.password)?;

        if self.store.exists_by_username(&cmd.username).await? {
            warn!(username = %cmd.username, "Registration rejected: username taken");
            return Err(ErrorCode::UsernameAlreadyExists.into());
        }
        if self.store.exists_by_email(&cmd.email).await? {
            warn!(username = %cmd.username, "Registration rejected: email taken");
            return Err(ErrorCode::EmailAlreadyExists.into());
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let new_user = NewUser::new(&cmd.username, &cmd.email, password_hash);

        let user = self.store.insert(&new_user).await.map_err(|e| {
            warn!(username = %cmd.username, "Registration insert failed: {}", e);
            BreezeError::from(e)
        })?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user.into())
    }

    /// Authenticate by username or email and issue a token.
    ///
    /// A missing user and a wrong password produce the same error.
    pub async fn login(&self, cmd: LoginCommand) -> Result<LoginResult> {
        validate_login(&cmd.username_or_email, &cmd.password)?;

        let user = match self
            .store
            .find_by_username_or_email(&cmd.username_or_email)
            .await?
        {
            Some(user) => user,
            None => {
                warn!(identifier = %cmd.username_or_email, "Login failed: unknown user");
                return Err(ErrorCode::UsernamePasswordIncorrect.into());
            }
        };

        let matches = match self.hasher.verify(&cmd.password, &user.password) {
            Ok(matches) => matches,
            Err(e) => {
                error!(user_id = user.id, "Stored password hash is unreadable: {}", e);
                false
            }
        };
        if !matches {
            warn!(username = %user.username, "Login failed: wrong password");
            return Err(ErrorCode::UsernamePasswordIncorrect.into());
        }

        let access_token = self.tokens.issue(&user.username)?;
        info!(username = %user.username, "User logged in");

        Ok(LoginResult {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.tokens.expiration_secs(),
            user_info: user.into(),
        })
    }

    /// Profile of the authenticated principal.
    pub async fn current_profile(&self, principal: Option<&Principal>) -> Result<UserProfile> {
        let principal = principal.ok_or(BreezeError::Client(ErrorCode::Unauthorized))?;

        match self.store.find_by_username(&principal.username).await? {
            Some(user) => Ok(user.into()),
            None => {
                warn!(username = %principal.username, "Principal no longer resolves to a user");
                Err(ErrorCode::UserNotFound.into())
            }
        }
    }
}
