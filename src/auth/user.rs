//! # User Accounts
//!
//! User model, role enumeration, and the storage trait behind them.
//!
//! Emails are unique case-insensitively; the store normalizes at write
//! time. Roles are immutable after creation except through explicit admin
//! action. The password digest never leaves the process.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crypto::{hash_password, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Email address, stored lowercased (unique case-insensitively)
    pub email: String,

    /// Argon2id password digest (never plaintext, never serialized)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, validating email shape and password policy.
    pub fn new(
        email: &str,
        password: &str,
        role: Role,
        name: Option<String>,
        policy: &PasswordPolicy,
    ) -> AuthResult<Self> {
        let email = normalize_email(email)?;
        policy.validate(password)?;

        let password_hash = hash_password(password)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Verify a password against this user's stored digest
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }

    /// Replace the password digest after policy validation
    pub fn set_password(&mut self, new_password: &str, policy: &PasswordPolicy) -> AuthResult<()> {
        policy.validate(new_password)?;
        self.password_hash = hash_password(new_password)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Lowercase and sanity-check an email address.
///
/// Full format validation is the form layer's problem; this only rejects
/// input that cannot possibly be an address.
pub fn normalize_email(email: &str) -> AuthResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    Ok(email)
}

/// Storage abstraction for user accounts.
///
/// Implementations must be safe for concurrent access; every operation is a
/// single keyed lookup or write.
pub trait UserStore: Send + Sync {
    /// Find a user by their ID
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Find a user by email (case-insensitive)
    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Check whether an email is already registered
    fn email_exists(&self, email: &str) -> AuthResult<bool>;

    /// Create a new user; rejects duplicate emails
    fn create(&self, user: &User) -> AuthResult<()>;

    /// Update an existing user
    fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete a user (their sessions die on next lookup)
    fn delete(&self, id: Uuid) -> AuthResult<()>;

    /// List all users (admin surface only, not on the auth hot path)
    fn list_all(&self) -> AuthResult<Vec<User>>;
}

#[derive(Default)]
struct UserMaps {
    by_id: HashMap<Uuid, User>,
    id_by_email: HashMap<String, Uuid>,
}

/// In-memory user store: the default backend for tests and single-process
/// deployments. Production engines implement [`UserStore`] over their own
/// client.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<UserMaps>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> AuthError {
    AuthError::StoreUnavailable("user store lock poisoned".to_string())
}

impl UserStore for InMemoryUserStore {
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let maps = self.inner.read().map_err(poisoned)?;
        Ok(maps.by_id.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let maps = self.inner.read().map_err(poisoned)?;
        let key = email.trim().to_lowercase();
        Ok(maps
            .id_by_email
            .get(&key)
            .and_then(|id| maps.by_id.get(id))
            .cloned())
    }

    fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let maps = self.inner.read().map_err(poisoned)?;
        Ok(maps.id_by_email.contains_key(&email.trim().to_lowercase()))
    }

    fn create(&self, user: &User) -> AuthResult<()> {
        let mut maps = self.inner.write().map_err(poisoned)?;

        if maps.id_by_email.contains_key(&user.email) {
            return Err(AuthError::EmailTaken);
        }

        maps.id_by_email.insert(user.email.clone(), user.id);
        maps.by_id.insert(user.id, user.clone());
        Ok(())
    }

    fn update(&self, user: &User) -> AuthResult<()> {
        let mut maps = self.inner.write().map_err(poisoned)?;

        let old_email = match maps.by_id.get(&user.id) {
            Some(existing) => existing.email.clone(),
            None => return Err(AuthError::NotFound),
        };

        // Keep the email index in step when the address changes
        if old_email != user.email {
            if maps.id_by_email.contains_key(&user.email) {
                return Err(AuthError::EmailTaken);
            }
            maps.id_by_email.remove(&old_email);
            maps.id_by_email.insert(user.email.clone(), user.id);
        }

        maps.by_id.insert(user.id, user.clone());
        Ok(())
    }

    fn delete(&self, id: Uuid) -> AuthResult<()> {
        let mut maps = self.inner.write().map_err(poisoned)?;

        match maps.by_id.remove(&id) {
            Some(user) => {
                maps.id_by_email.remove(&user.email);
                Ok(())
            }
            None => Err(AuthError::NotFound),
        }
    }

    fn list_all(&self) -> AuthResult<Vec<User>> {
        let maps = self.inner.read().map_err(poisoned)?;
        let mut users: Vec<User> = maps.by_id.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}
