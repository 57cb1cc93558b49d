//! Authentication module
//!
//! Turns a bearer credential into the owner key every finance operation is
//! scoped by.
//! - `Authorization: Bearer <token>` header parsing
//! - `AuthVerifier` seam with a JWT implementation

mod jwt;

use async_trait::async_trait;
use uuid::Uuid;

pub use jwt::{Claims, JwtVerifier};

/// Authentication failures. All of them surface as 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredential,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedCredential,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token subject is not a valid user id")]
    InvalidSubject,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InvalidSubject => "invalid_subject",
        }
    }
}

/// Validates a bearer token and yields the user it belongs to.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; the token must be non-empty.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}
