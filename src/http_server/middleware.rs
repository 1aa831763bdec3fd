//! Authentication middleware.
//!
//! Resolves the bearer credential once per request and attaches the
//! resulting [`AuthContext`] as a request extension. Anything that is not
//! an active session terminates here with a 401; the internal reason is
//! logged, never sent.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::server::AppState;
use crate::auth::authenticator::AuthOutcome;
use crate::auth::errors::AuthError;
use crate::observability::Logger;

/// Layer applied to every protected route.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let path = req.uri().path().to_string();

    match state.auth.resolve_bearer(header.as_deref())? {
        AuthOutcome::Authenticated(ctx) => {
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        AuthOutcome::Anonymous => {
            // No credential on a protected route
            Logger::warn("AUTH_REJECTED", &[("path", &path), ("reason", "missing")]);
            Err(AuthError::MalformedCredential)
        }
        AuthOutcome::Rejected(reason) => {
            Logger::warn(
                "AUTH_REJECTED",
                &[("path", &path), ("reason", reason.as_str())],
            );
            Err(reason.into())
        }
    }
}
