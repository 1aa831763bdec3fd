//! # Auth Service
//!
//! Orchestrates the hasher, token issuer, and stores behind one API that
//! the HTTP layer calls. Every error a client can see is resolved here;
//! handlers past authentication assume a valid identity.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::authenticator::{self, AuthContext, AuthOutcome};
use super::crypto::{hash_token, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use super::guard;
use super::session::{Session, SessionStore};
use super::token::TokenIssuer;
use super::user::{normalize_email, Role, User, UserStore};

/// Self-service signup request
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin-created account request (role selectable)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

/// Auth service generic over its storage backends
pub struct AuthService<U: UserStore, S: SessionStore> {
    users: U,
    sessions: S,
    issuer: TokenIssuer,
    policy: PasswordPolicy,
}

impl<U: UserStore, S: SessionStore> AuthService<U, S> {
    pub fn new(users: U, sessions: S, issuer: TokenIssuer, policy: PasswordPolicy) -> Self {
        Self {
            users,
            sessions,
            issuer,
            policy,
        }
    }

    /// Register a new client account and log it in.
    ///
    /// Returns the created user, the raw bearer token, and its session.
    pub fn signup(&self, request: SignupRequest) -> AuthResult<(User, String, Session)> {
        let email = normalize_email(&request.email)?;
        self.policy.validate(&request.password)?;

        if self.users.email_exists(&email)? {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(
            &email,
            &request.password,
            Role::Client,
            request.name,
            &self.policy,
        )?;
        self.users.create(&user)?;

        let (token, session) = self.issuer.issue(&self.sessions, user.id, Utc::now())?;
        Ok((user, token, session))
    }

    /// Authenticate credentials and mint a session.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller: both are [`AuthError::InvalidCredentials`].
    pub fn login(&self, request: LoginRequest) -> AuthResult<(User, String, Session)> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_email(&request.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password) {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, session) = self.issuer.issue(&self.sessions, user.id, Utc::now())?;
        Ok((user, token, session))
    }

    /// Revoke the session behind a raw token. Idempotent: a token that is
    /// already revoked, expired, or was never issued still logs out cleanly.
    pub fn logout(&self, raw_token: &str) -> AuthResult<()> {
        self.sessions.revoke(&hash_token(raw_token))
    }

    /// Resolve an `Authorization` header to a request outcome.
    pub fn resolve_bearer(&self, header: Option<&str>) -> AuthResult<AuthOutcome> {
        authenticator::resolve(&self.sessions, &self.users, header, Utc::now())
    }

    /// Load a user by id
    pub fn get_user(&self, user_id: Uuid) -> AuthResult<User> {
        self.users.find_by_id(user_id)?.ok_or(AuthError::NotFound)
    }

    /// List all accounts (admin only)
    pub fn list_users(&self, actor: &AuthContext) -> AuthResult<Vec<User>> {
        guard::require_admin(actor)?;
        self.users.list_all()
    }

    /// Create an account with an explicit role (admin only)
    pub fn create_user(&self, actor: &AuthContext, request: CreateUserRequest) -> AuthResult<User> {
        guard::require_admin(actor)?;

        let email = normalize_email(&request.email)?;
        if self.users.email_exists(&email)? {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(
            &email,
            &request.password,
            request.role,
            request.name,
            &self.policy,
        )?;
        self.users.create(&user)?;
        Ok(user)
    }

    /// Delete an account (admin only, never your own)
    pub fn delete_user(&self, actor: &AuthContext, target_id: Uuid) -> AuthResult<()> {
        guard::require_admin(actor)?;
        guard::forbid_self_delete(actor, target_id)?;
        self.users.delete(target_id)
    }

    /// Change the acting user's password after re-checking the current one
    pub fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let mut user = self
            .users
            .find_by_id(user_id)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(current_password) {
            return Err(AuthError::InvalidCredentials);
        }

        user.set_password(new_password, &self.policy)?;
        self.users.update(&user)
    }

    /// Drop expired sessions; called by the periodic cleanup task
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        self.sessions.purge_expired(now)
    }

    /// Ensure a bootstrap admin account exists. Used at server start when
    /// the configuration names one; never a hard-coded bypass.
    pub fn seed_admin(&self, email: &str, password: &str) -> AuthResult<Option<User>> {
        let email = normalize_email(email)?;
        if self.users.email_exists(&email)? {
            return Ok(None);
        }

        let user = User::new(&email, password, Role::Admin, None, &self.policy)?;
        self.users.create(&user)?;
        Ok(Some(user))
    }
}
