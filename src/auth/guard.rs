//! # Authorization Guard
//!
//! Role and ownership checks layered after authentication. Every handler
//! consults these instead of inlining its own role comparison.

use uuid::Uuid;

use super::authenticator::AuthContext;
use super::errors::{AuthError, AuthResult};

/// Require the admin role.
pub fn require_admin(ctx: &AuthContext) -> AuthResult<()> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Require that the actor owns the record or is an admin.
///
/// `owner_id` comes from a read of the target record; ownership is not
/// inferable from the token alone.
pub fn require_owner_or_admin(ctx: &AuthContext, owner_id: Uuid) -> AuthResult<()> {
    if ctx.is_admin() || ctx.user_id == owner_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Reject an actor deleting their own account through the user-deletion
/// endpoint. Applies regardless of how many other admins exist.
pub fn forbid_self_delete(ctx: &AuthContext, target_id: Uuid) -> AuthResult<()> {
    if ctx.user_id == target_id {
        Err(AuthError::SelfDeletion)
    } else {
        Ok(())
    }
}
