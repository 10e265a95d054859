//! Input validation for registration and login.
//!
//! Validators are plain functions run before the user service touches the
//! store. Each returns the first problem it finds.

use thiserror::Error;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 50;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Special characters allowed in passwords.
const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&";

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is missing.
    #[error("username cannot be empty")]
    UsernameEmpty,

    /// Username length is out of range.
    #[error("username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters")]
    UsernameLength,

    /// Username contains invalid characters.
    #[error("username can only contain letters, digits and underscores")]
    UsernameInvalidChars,

    /// Email is missing.
    #[error("email cannot be empty")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Password is missing.
    #[error("password cannot be empty")]
    PasswordEmpty,

    /// Password length is out of range.
    #[error("password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters")]
    PasswordLength,

    /// Password is missing a required character class or has a forbidden character.
    #[error("password must contain an uppercase letter, a lowercase letter and a digit, and only letters, digits or @$!%*?&")]
    PasswordComplexity,

    /// Login identifier is missing.
    #[error("username or email cannot be empty")]
    IdentifierEmpty,
}

impl From<ValidationError> for crate::BreezeError {
    fn from(e: ValidationError) -> Self {
        crate::BreezeError::Validation(e.to_string())
    }
}

/// Validate a username.
///
/// Requirements:
/// - Length: 3-20 characters
/// - Characters: ASCII letters, digits and underscore
///
/// # Examples
///
/// ```
/// use stack_breeze::auth::validation::validate_username;
///
/// assert!(validate_username("alice_01").is_ok());
/// assert!(validate_username("ab").is_err()); // too short
/// assert!(validate_username("al-ice").is_err()); // invalid char
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }

    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::UsernameLength);
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }

    Ok(())
}

/// Validate an email address.
///
/// Performs a basic `local@domain.tld` check; the address is not resolved.
///
/// # Examples
///
/// ```
/// use stack_breeze::auth::validation::validate_email;
///
/// assert!(validate_email("alice@example.com").is_ok());
/// assert!(validate_email("").is_err());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return Err(ValidationError::EmailInvalidFormat),
    };

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }

    // Domain must have at least one dot with text on both sides of each.
    if !domain.contains('.') || domain.split('.').any(|p| p.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

/// Validate a registration password.
///
/// Requirements:
/// - Length: 6-50 characters
/// - Characters: ASCII letters, digits and `@$!%*?&`
/// - At least one lowercase letter, one uppercase letter and one digit
///
/// # Examples
///
/// ```
/// use stack_breeze::auth::validation::validate_password;
///
/// assert!(validate_password("Passw0rd").is_ok());
/// assert!(validate_password("password").is_err()); // no uppercase or digit
/// ```
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }

    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::PasswordLength);
    }

    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARS.contains(c));
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(allowed && has_lower && has_upper && has_digit) {
        return Err(ValidationError::PasswordComplexity);
    }

    Ok(())
}

/// Validate all registration fields at once.
///
/// Returns the first validation error encountered, or Ok if all fields are valid.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password)?;
    Ok(())
}

/// Validate login fields. Both must be non-blank.
pub fn validate_login(username_or_email: &str, password: &str) -> Result<(), ValidationError> {
    if username_or_email.trim().is_empty() {
        return Err(ValidationError::IdentifierEmpty);
    }
    if password.trim().is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }
    Ok(())
}
