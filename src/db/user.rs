//! User model for Stack Breeze.

/// `del_flag` value for live rows.
pub const DEL_FLAG_ACTIVE: &str = "0";

/// `del_flag` value for soft-deleted rows.
pub const DEL_FLAG_DELETED: &str = "1";

/// A registered user as stored in the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, assigned once at creation.
    pub id: i64,
    /// Login username (unique among live users).
    pub username: String,
    /// Email address (unique among live users).
    pub email: String,
    /// Password hash (Argon2id PHC string). Never exposed outward.
    pub password: String,
    /// Soft-delete flag.
    pub del_flag: String,
    /// Creator.
    pub create_by: Option<String>,
    /// Creation timestamp.
    pub create_time: String,
    /// Last updater.
    pub update_by: Option<String>,
    /// Last update timestamp.
    pub update_time: Option<String>,
    /// Free-form remark.
    pub remark: Option<String>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password hash (must already be hashed).
    pub password: String,
}

impl NewUser {
    /// Create a new user record from a username, email and password hash.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password_hash.into(),
        }
    }
}

/// Data for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New email address.
    pub email: Option<String>,
    /// New password hash.
    pub password: Option<String>,
    /// New remark.
    pub remark: Option<Option<String>>,
    /// Who made the change.
    pub update_by: Option<String>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the password hash.
    pub fn password(mut self, password_hash: impl Into<String>) -> Self {
        self.password = Some(password_hash.into());
        self
    }

    /// Set the remark.
    pub fn remark(mut self, remark: Option<String>) -> Self {
        self.remark = Some(remark);
        self
    }

    /// Record who made the change.
    pub fn update_by(mut self, username: impl Into<String>) -> Self {
        self.update_by = Some(username.into());
        self
    }

    /// Check if the update changes any column.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.remark.is_none()
    }
}
