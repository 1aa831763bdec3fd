//! # Sessions
//!
//! Server-side session records behind opaque bearer tokens.
//!
//! A session is valid iff its token hash exists in the store and
//! `now < expires_at`. Expiry is lazy: a timestamp comparison at read time,
//! no reaper required. `purge_expired` exists only to bound growth.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};

/// Proof of authentication for one login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,

    /// User this session belongs to
    pub user_id: Uuid,

    /// SHA-256 hash of the bearer token (the raw token is never stored)
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session stops authenticating
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session authenticates at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Storage abstraction for active sessions.
///
/// Every operation is a single lookup or write keyed by token hash; nothing
/// on the authentication hot path scans.
pub trait SessionStore: Send + Sync {
    /// Insert a new session. Fails with [`AuthError::DuplicateToken`] if the
    /// token hash is already present; callers regenerate and retry, never
    /// reuse.
    fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find a session by token hash, active or not.
    ///
    /// The authenticator does the expiry comparison so it can log expired
    /// and unknown tokens differently; on the wire both are the same 401.
    fn find_by_token_hash(&self, token_hash: &str) -> AuthResult<Option<Session>>;

    /// Find a session that authenticates at `now`. An expired session is
    /// indistinguishable from a missing one.
    fn find_active_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>> {
        Ok(self
            .find_by_token_hash(token_hash)?
            .filter(|s| s.is_active(now)))
    }

    /// Remove a session by token hash. Idempotent: revoking an unknown
    /// token is not an error.
    fn revoke(&self, token_hash: &str) -> AuthResult<()>;

    /// Drop every session past its expiry; returns how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> AuthResult<usize>;
}

/// In-memory session store keyed by token hash.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> AuthError {
    AuthError::StoreUnavailable("session store lock poisoned".to_string())
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        if sessions.contains_key(&session.token_hash) {
            return Err(AuthError::DuplicateToken);
        }

        sessions.insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    fn find_by_token_hash(&self, token_hash: &str) -> AuthResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(token_hash).cloned())
    }

    fn revoke(&self, token_hash: &str) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.remove(token_hash);
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, s| s.is_active(now));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_at(expires_at: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: format!("hash-{}", Uuid::new_v4()),
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_create_and_find() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        let session = session_expiring_at(now + Duration::hours(24));

        store.create(&session).unwrap();

        let found = store
            .find_active_by_token_hash(&session.token_hash, now)
            .unwrap();
        assert_eq!(found.unwrap().id, session.id);
    }

    #[test]
    fn test_duplicate_token_hash_rejected() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        let session = session_expiring_at(now + Duration::hours(1));

        store.create(&session).unwrap();

        let mut dup = session_expiring_at(now + Duration::hours(1));
        dup.token_hash = session.token_hash.clone();
        assert!(matches!(
            store.create(&dup),
            Err(AuthError::DuplicateToken)
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let store = InMemorySessionStore::new();
        let expires_at = Utc::now() + Duration::hours(1);
        let session = session_expiring_at(expires_at);
        store.create(&session).unwrap();

        // One second before expiry: active
        let just_before = expires_at - Duration::seconds(1);
        assert!(store
            .find_active_by_token_hash(&session.token_hash, just_before)
            .unwrap()
            .is_some());

        // One second after: treated identically to a missing session
        let just_after = expires_at + Duration::seconds(1);
        assert!(store
            .find_active_by_token_hash(&session.token_hash, just_after)
            .unwrap()
            .is_none());

        // Exactly at expiry: no longer active
        assert!(store
            .find_active_by_token_hash(&session.token_hash, expires_at)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        let session = session_expiring_at(now + Duration::hours(1));
        store.create(&session).unwrap();

        store.revoke(&session.token_hash).unwrap();
        assert!(store
            .find_by_token_hash(&session.token_hash)
            .unwrap()
            .is_none());

        // Second revoke of the same token is still Ok
        store.revoke(&session.token_hash).unwrap();
        // As is revoking something that never existed
        store.revoke("never-issued").unwrap();
    }

    #[test]
    fn test_purge_expired_keeps_active_sessions() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();

        let live = session_expiring_at(now + Duration::hours(1));
        let dead = session_expiring_at(now - Duration::hours(1));
        store.create(&live).unwrap();
        store.create(&dead).unwrap();

        assert_eq!(store.purge_expired(now).unwrap(), 1);
        assert!(store.find_by_token_hash(&live.token_hash).unwrap().is_some());
        assert!(store.find_by_token_hash(&dead.token_hash).unwrap().is_none());
    }

    #[test]
    fn test_concurrent_sessions_for_one_user() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        let user_id = Uuid::new_v4();

        let mut a = session_expiring_at(now + Duration::hours(1));
        let mut b = session_expiring_at(now + Duration::hours(1));
        a.user_id = user_id;
        b.user_id = user_id;

        // Two logins, two independent sessions; no per-user constraint
        store.create(&a).unwrap();
        store.create(&b).unwrap();

        store.revoke(&a.token_hash).unwrap();
        assert!(store.find_by_token_hash(&b.token_hash).unwrap().is_some());
    }
}
