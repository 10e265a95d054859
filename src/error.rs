//! Error types for Stack Breeze.
//!
//! Every failure that can reach a client carries an [`ErrorCode`]. Codes are
//! five characters: a source letter followed by a four digit number.
//!
//! - `A` client side (bad input, duplicate user, bad credentials, missing token)
//! - `B` this service (unexpected failure, missing data)
//! - `C` a third-party dependency

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Where an error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    /// The caller sent something we cannot accept.
    Client,
    /// Failure inside this service.
    Service,
    /// Failure in an upstream dependency.
    Remote,
}

/// Stable error codes exposed in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Success sentinel.
    Ok,

    /// Generic client error (also used for input validation failures).
    ClientError,
    /// User does not exist.
    UserNotFound,
    /// User already exists.
    UserAlreadyExists,
    /// Username or password is incorrect.
    UsernamePasswordIncorrect,
    /// Verification code has expired.
    VerificationCodeExpired,
    /// Credentials are no longer valid.
    BadCredentialsExpired,
    /// Username is taken.
    UsernameAlreadyExists,
    /// Email is taken.
    EmailAlreadyExists,
    /// Token is malformed or has a bad signature.
    InvalidToken,
    /// Token has expired.
    TokenExpired,
    /// No authenticated principal.
    Unauthorized,
    /// Rate limit exceeded.
    TooManyRequests,

    /// Generic internal failure.
    ServiceError,
    /// Internal operation timed out.
    ServiceTimeoutError,
    /// Requested data does not exist.
    ServiceDataNotFound,

    /// Third-party dependency failure.
    RemoteError,
}

impl ErrorCode {
    /// Wire representation of this code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Ok => "00000",
            ErrorCode::ClientError => "A0001",
            ErrorCode::UserNotFound => "A0010",
            ErrorCode::UserAlreadyExists => "A0011",
            ErrorCode::UsernamePasswordIncorrect => "A0012",
            ErrorCode::VerificationCodeExpired => "A0013",
            ErrorCode::BadCredentialsExpired => "A0014",
            ErrorCode::UsernameAlreadyExists => "A0015",
            ErrorCode::EmailAlreadyExists => "A0016",
            ErrorCode::InvalidToken => "A0017",
            ErrorCode::TokenExpired => "A0018",
            ErrorCode::Unauthorized => "A0019",
            ErrorCode::TooManyRequests => "A0020",
            ErrorCode::ServiceError => "B0001",
            ErrorCode::ServiceTimeoutError => "B0010",
            ErrorCode::ServiceDataNotFound => "B0011",
            ErrorCode::RemoteError => "C0001",
        }
    }

    /// Default human-readable message.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::ClientError => "Client error",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserAlreadyExists => "User already exists",
            ErrorCode::UsernamePasswordIncorrect => "Username or password incorrect",
            ErrorCode::VerificationCodeExpired => "Verification code expired",
            ErrorCode::BadCredentialsExpired => "Credentials expired",
            ErrorCode::UsernameAlreadyExists => "Username already exists",
            ErrorCode::EmailAlreadyExists => "Email already exists",
            ErrorCode::InvalidToken => "Invalid token",
            ErrorCode::TokenExpired => "Token expired",
            ErrorCode::Unauthorized => "Unauthorized",
            ErrorCode::TooManyRequests => "Too many requests",
            ErrorCode::ServiceError => "Internal service error",
            ErrorCode::ServiceTimeoutError => "Service timed out",
            ErrorCode::ServiceDataNotFound => "Data not found",
            ErrorCode::RemoteError => "Remote service error",
        }
    }

    /// Source of this error, derived from the code prefix.
    ///
    /// Returns `None` for the success sentinel.
    pub fn source(&self) -> Option<ErrorSource> {
        match self.code().as_bytes()[0] {
            b'A' => Some(ErrorSource::Client),
            b'B' => Some(ErrorSource::Service),
            b'C' => Some(ErrorSource::Remote),
            _ => None,
        }
    }

    /// Check if this is the success sentinel.
    pub fn is_ok(&self) -> bool {
        matches!(self, ErrorCode::Ok)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Common error type for Stack Breeze.
#[derive(Error, Debug)]
pub enum BreezeError {
    /// A domain failure with a specific client-facing code.
    #[error("{}", .0.message())]
    Client(ErrorCode),

    /// Input validation failed.
    #[error("{0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Token signing failed.
    #[error("token error: {0}")]
    Token(String),

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream dependency failure.
    #[error("remote error: {0}")]
    Remote(String),
}

impl BreezeError {
    /// Error code reported to the client.
    pub fn code(&self) -> ErrorCode {
        match self {
            BreezeError::Client(code) => *code,
            BreezeError::Validation(_) => ErrorCode::ClientError,
            BreezeError::NotFound(_) => ErrorCode::ServiceDataNotFound,
            BreezeError::Remote(_) => ErrorCode::RemoteError,
            _ => ErrorCode::ServiceError,
        }
    }

    /// Message safe to show to the client.
    ///
    /// Internal failures never expose their details.
    pub fn client_message(&self) -> String {
        match self {
            BreezeError::Client(code) => code.message().to_string(),
            BreezeError::Validation(msg) => msg.clone(),
            BreezeError::NotFound(_) => ErrorCode::ServiceDataNotFound.message().to_string(),
            BreezeError::Remote(_) => ErrorCode::RemoteError.message().to_string(),
            _ => ErrorCode::ServiceError.message().to_string(),
        }
    }

    /// Check if this error is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        self.code().source() == Some(ErrorSource::Client)
    }
}

impl From<ErrorCode> for BreezeError {
    fn from(code: ErrorCode) -> Self {
        BreezeError::Client(code)
    }
}

impl From<sqlx::Error> for BreezeError {
    fn from(e: sqlx::Error) -> Self {
        BreezeError::Database(e.to_string())
    }
}

/// Result type alias for Stack Breeze operations.
pub type Result<T> = std::result::Result<T, BreezeError>;
