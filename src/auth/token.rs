//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying only the subject (username), issued-at and
//! expiry. Nothing is persisted server-side, so a token stays valid until it
//! expires.

use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;
use crate::error::ErrorCode;
use crate::BreezeError;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

/// Token verification errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed structure or unsupported algorithm.
    #[error("invalid token")]
    InvalidToken,

    /// The token's expiry has passed.
    #[error("token expired")]
    ExpiredToken,
}

impl From<TokenError> for BreezeError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidToken => BreezeError::Client(ErrorCode::InvalidToken),
            TokenError::ExpiredToken => BreezeError::Client(ErrorCode::TokenExpired),
        }
    }
}

/// Issues and verifies bearer tokens with a single static key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_secs: u64,
}

impl TokenService {
    /// Create a token service from a secret and lifetime.
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiration_secs,
        }
    }

    /// Create a token service from the `[jwt]` configuration section.
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, config.expiration_secs)
    }

    /// Token lifetime in seconds.
    pub fn expiration_secs(&self) -> u64 {
        self.expiration_secs
    }

    /// Issue a token for the given subject.
    pub fn issue(&self, subject: &str) -> Result<String, BreezeError> {
        let now = chrono::Utc::now().timestamp() as u64;
        self.issue_at(subject, now)
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, subject: &str, issued_at: u64) -> Result<String, BreezeError> {
        let exp = issued_at
            .checked_add(self.expiration_secs)
            .ok_or_else(|| BreezeError::Token("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            BreezeError::Token(e.to_string())
        })
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::InvalidToken,
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes!";

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET, 3600);
        let token = service.issue("alice").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(service.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_claims_are_minimal() {
        let service = TokenService::new(SECRET, 3600);
        let token = service.issue("alice").unwrap();

        let payload = token.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(json["sub"], "alice");
        assert_eq!(
            json["exp"].as_u64().unwrap() - json["iat"].as_u64().unwrap(),
            3600
        );
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::new(SECRET, 60);
        // Issued two hours ago with a one minute lifetime.
        let token = service.issue_at("alice", now() - 7200).unwrap();
        assert_eq!(service.verify(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let service = TokenService::new(SECRET, u64::MAX);
        assert!(matches!(
            service.issue_at("alice", 10),
            Err(BreezeError::Token(_))
        ));
        assert!(matches!(service.issue("alice"), Err(BreezeError::Token(_))));
    }

    #[test]
    fn test_tampered_signature() {
        let service = TokenService::new(SECRET, 3600);
        let token = service.issue("alice").unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut sig = URL_SAFE_NO_PAD.decode(signature).unwrap();
        for i in 0..sig.len() {
            sig[i] ^= 0x01;
            let tampered = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(&sig));
            assert_eq!(service.verify(&tampered), Err(TokenError::InvalidToken));
            sig[i] ^= 0x01;
        }
    }

    #[test]
    fn test_tampered_payload() {
        let service = TokenService::new(SECRET, 3600);
        let token = service.issue("alice").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"sub":"mallory","iat":{},"exp":{}}}"#,
            now(),
            now() + 3600
        ));
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert_eq!(service.verify(&forged), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenService::new(SECRET, 3600);
        let verifier = TokenService::new("another-secret-that-is-32-bytes-long", 3600);
        let token = issuer.issue("alice").unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_malformed_token() {
        let service = TokenService::new(SECRET, 3600);
        assert_eq!(service.verify(""), Err(TokenError::InvalidToken));
        assert_eq!(service.verify("not.a.jwt"), Err(TokenError::InvalidToken));
        assert_eq!(service.verify("garbage"), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_token_error_codes() {
        assert_eq!(
            BreezeError::from(TokenError::InvalidToken).code(),
            ErrorCode::InvalidToken
        );
        assert_eq!(
            BreezeError::from(TokenError::ExpiredToken).code(),
            ErrorCode::TokenExpired
        );
    }

    #[test]
    fn test_from_config() {
        let config = JwtConfig {
            secret: SECRET.to_string(),
            expiration_secs: 120,
        };
        let service = TokenService::from_config(&config);
        assert_eq!(service.expiration_secs(), 120);
        let token = service.issue("bob").unwrap();
        assert_eq!(service.verify(&token).unwrap(), "bob");
    }
}
