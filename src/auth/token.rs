//! # Token Issuer
//!
//! Mints opaque session tokens and persists their sessions.
//!
//! The token is 256 bits of OS randomness and embeds nothing: no user id,
//! no role, no digest. Verification is a store lookup. A hash collision on
//! insert is astronomically unlikely but still handled by regenerating.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::crypto::{generate_token, hash_token};
use super::errors::{AuthError, AuthResult};
use super::session::{Session, SessionStore};

/// How many fresh tokens to try before giving up on a colliding store
const MAX_ISSUE_ATTEMPTS: usize = 4;

/// Issues opaque session tokens with a fixed time-to-live.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Default 24-hour sessions
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::hours(24))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `user_id` and persist its session.
    ///
    /// Returns the raw token (for the client) and the stored session.
    /// Regenerates on [`AuthError::DuplicateToken`]; a colliding token is
    /// never reused.
    pub fn issue<S: SessionStore + ?Sized>(
        &self,
        store: &S,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AuthResult<(String, Session)> {
        for _ in 0..MAX_ISSUE_ATTEMPTS {
            let raw_token = generate_token();
            let session = Session {
                id: Uuid::new_v4(),
                user_id,
                token_hash: hash_token(&raw_token),
                created_at: now,
                expires_at: now + self.ttl,
            };

            match store.create(&session) {
                Ok(()) => return Ok((raw_token, session)),
                Err(AuthError::DuplicateToken) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AuthError::DuplicateToken)
    }
}
