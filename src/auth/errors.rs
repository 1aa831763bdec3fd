//! # Auth Errors
//!
//! Error taxonomy for authentication, authorization, and the stores they
//! depend on. Every variant maps to exactly one HTTP status; all token
//! failures share one public message so the wire never reveals which part
//! of a credential was wrong.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Validation
    // ==================
    /// Malformed or missing input at the boundary
    #[error("{0}")]
    Validation(String),

    // ==================
    // Authentication
    // ==================
    /// Wrong password or unknown email (generic - don't leak which)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authorization header absent where required, or wrong scheme
    #[error("Invalid or expired session")]
    MalformedCredential,

    /// Session exists but its expiry has passed
    #[error("Invalid or expired session")]
    SessionExpired,

    /// Token does not resolve to any session
    #[error("Invalid or expired session")]
    UnknownToken,

    // ==================
    // Authorization
    // ==================
    /// Valid identity, insufficient privilege or not the record owner
    #[error("Access denied")]
    Forbidden,

    /// Admin attempted to delete their own account
    #[error("Cannot delete your own account")]
    SelfDeletion,

    // ==================
    // Conflicts
    // ==================
    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Token hash already present in the session store (retried internally,
    /// never surfaced to a client)
    #[error("Session token collision")]
    DuplicateToken,

    // ==================
    // Lookups
    // ==================
    /// Target record does not exist
    #[error("Not found")]
    NotFound,

    // ==================
    // Internal
    // ==================
    /// Password hashing failed
    #[error("Internal error")]
    HashingFailed,

    /// Underlying persistence unreachable or timed out. Never conflated
    /// with invalid credentials.
    #[error("Service temporarily unavailable")]
    StoreUnavailable(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::Validation(_) => 400,
            AuthError::SelfDeletion => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::MalformedCredential => 401,
            AuthError::SessionExpired => 401,
            AuthError::UnknownToken => 401,

            // 403 Forbidden
            AuthError::Forbidden => 403,

            // 404 Not Found
            AuthError::NotFound => 404,

            // 409 Conflict
            AuthError::EmailTaken => 409,

            // 500 Internal Server Error
            AuthError::DuplicateToken => 500,
            AuthError::HashingFailed => 500,

            // 503 Service Unavailable
            AuthError::StoreUnavailable(_) => 503,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
