//! User repository for Stack Breeze.
//!
//! [`UserStore`] is the credential store seen by the user service. The sqlx
//! implementation is [`UserRepository`]; tests can substitute their own.

use axum::async_trait;
use sqlx::QueryBuilder;
use thiserror::Error;

use super::user::{NewUser, User, UserUpdate, DEL_FLAG_ACTIVE};
use super::{DbBackend, DbPool};
use crate::datetime;
use crate::error::ErrorCode;
use crate::{BreezeError, Result};

const USER_COLUMNS: &str = "id, username, email, password, del_flag, create_by, create_time,
                            update_by, update_time, remark";

/// Errors raised when inserting a user.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A live user already has this username.
    #[error("username already taken")]
    UsernameTaken,
    /// A live user already has this email.
    #[error("email already taken")]
    EmailTaken,
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                // PostgreSQL reports the index name; SQLite only puts the
                // column in the message ("UNIQUE constraint failed: users.email").
                let target = db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string());
                return if target.contains("email") {
                    StoreError::EmailTaken
                } else {
                    StoreError::UsernameTaken
                };
            }
        }
        StoreError::Database(e.to_string())
    }
}

impl From<StoreError> for BreezeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UsernameTaken => BreezeError::Client(ErrorCode::UsernameAlreadyExists),
            StoreError::EmailTaken => BreezeError::Client(ErrorCode::EmailAlreadyExists),
            StoreError::Database(msg) => BreezeError::Database(msg),
        }
    }
}

/// Credential store operations used by the user service.
///
/// All lookups only see live (not soft-deleted) users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find a user whose username or email equals the given identifier.
    ///
    /// A username match wins over an email match.
    async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;

    /// Check if a username is taken.
    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    /// Check if an email is taken.
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Insert a new user.
    ///
    /// Uniqueness is enforced by the store itself. A duplicate live username
    /// or email, including one inserted concurrently, is reported as
    /// [`StoreError::UsernameTaken`] or [`StoreError::EmailTaken`].
    async fn insert(&self, new_user: &NewUser) -> std::result::Result<User, StoreError>;

    /// Update a user by ID. Returns the updated user, or None if not found.
    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>>;
}

/// sqlx-backed user repository.
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a live user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND del_flag = $2");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND del_flag = $2");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND del_flag = $2");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE (username = $1 OR email = $1) AND del_flag = $2
             ORDER BY CASE WHEN username = $1 THEN 0 ELSE 1 END
             LIMIT 1"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .bind(DEL_FLAG_ACTIVE)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1 AND del_flag = $2")
                .bind(username)
                .bind(DEL_FLAG_ACTIVE)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1 AND del_flag = $2")
                .bind(email)
                .bind(DEL_FLAG_ACTIVE)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn insert(&self, new_user: &NewUser) -> std::result::Result<User, StoreError> {
        // Single autocommit statement; the partial unique indexes settle
        // concurrent registrations.
        let query = format!(
            "INSERT INTO users (username, email, password, del_flag, create_by, create_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .bind(DEL_FLAG_ACTIVE)
            .bind(&new_user.username)
            .bind(datetime::now_db())
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<DbBackend> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password.clone());
        }
        if let Some(ref remark) = update.remark {
            separated.push("remark = ");
            separated.push_bind_unseparated(remark.clone());
        }
        separated.push("update_by = ");
        separated.push_bind_unseparated(update.update_by.clone());
        separated.push("update_time = ");
        separated.push_bind_unseparated(datetime::now_db());

        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" AND del_flag = ");
        query.push_bind(DEL_FLAG_ACTIVE);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| BreezeError::from(StoreError::from(e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}
