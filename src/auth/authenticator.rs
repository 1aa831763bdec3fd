//! # Authenticator
//!
//! Per-request credential resolution. One synchronous pass, terminal in
//! one of three states: anonymous, authenticated, or rejected.
//!
//! The rejection reason (malformed vs expired vs unknown) is kept for the
//! server log; every rejection is the same 401 on the wire.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::crypto::{constant_time_str_eq, hash_token};
use super::errors::{AuthError, AuthResult};
use super::session::SessionStore;
use super::user::{Role, UserStore};

/// Resolved identity attached to a request after successful
/// authentication. Ephemeral; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Why a presented credential was rejected. Logged, not revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Header present but not `Bearer <token>`, or the token is empty
    Malformed,
    /// Session found but past its expiry
    Expired,
    /// Token resolves to no session (revoked, never issued, or its user
    /// was deleted)
    Unknown,
}

impl RejectReason {
    /// Stable label for structured logs
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Malformed => "malformed",
            RejectReason::Expired => "expired",
            RejectReason::Unknown => "unknown",
        }
    }
}

impl From<RejectReason> for AuthError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Malformed => AuthError::MalformedCredential,
            RejectReason::Expired => AuthError::SessionExpired,
            RejectReason::Unknown => AuthError::UnknownToken,
        }
    }
}

/// Terminal state of the per-request authentication pass
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// No credential presented. Acceptable only on routes marked public.
    Anonymous,
    /// Credential resolved to an active session
    Authenticated(AuthContext),
    /// Credential present but invalid
    Rejected(RejectReason),
}

/// Pull the bearer value out of an `Authorization` header.
///
/// `Ok(None)` means no header at all (anonymous); a header without the
/// `Bearer ` scheme prefix is malformed.
pub fn parse_bearer(header: Option<&str>) -> Result<Option<&str>, RejectReason> {
    let Some(value) = header else {
        return Ok(None);
    };

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        _ => Err(RejectReason::Malformed),
    }
}

/// Resolve an `Authorization` header against the session and user stores.
///
/// Store failures surface as [`AuthError::StoreUnavailable`], never as a
/// rejection: the caller must not be told their credential was bad when
/// the infrastructure was.
pub fn resolve<S, U>(
    sessions: &S,
    users: &U,
    header: Option<&str>,
    now: DateTime<Utc>,
) -> AuthResult<AuthOutcome>
where
    S: SessionStore + ?Sized,
    U: UserStore + ?Sized,
{
    let raw_token = match parse_bearer(header) {
        Ok(None) => return Ok(AuthOutcome::Anonymous),
        Ok(Some(token)) => token,
        Err(reason) => return Ok(AuthOutcome::Rejected(reason)),
    };

    let token_hash = hash_token(raw_token);
    let session = match sessions.find_by_token_hash(&token_hash)? {
        Some(session) => session,
        None => return Ok(AuthOutcome::Rejected(RejectReason::Unknown)),
    };

    // Store implementations are not trusted to match hashes exactly
    if !constant_time_str_eq(&session.token_hash, &token_hash) {
        return Ok(AuthOutcome::Rejected(RejectReason::Unknown));
    }

    if !session.is_active(now) {
        return Ok(AuthOutcome::Rejected(RejectReason::Expired));
    }

    // A session whose user has been deleted authenticates nothing
    let user = match users.find_by_id(session.user_id)? {
        Some(user) => user,
        None => return Ok(AuthOutcome::Rejected(RejectReason::Unknown)),
    };

    Ok(AuthOutcome::Authenticated(AuthContext::new(
        user.id, user.role,
    )))
}
