//! Auth HTTP routes: signup, login, logout, verify.

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::server::AppState;
use super::Json;
use crate::auth::authenticator::{parse_bearer, AuthContext};
use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::service::{LoginRequest, SignupRequest};
use crate::auth::user::{Role, User};
use crate::observability::Logger;

/// Routes reachable without a credential
pub fn public_auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
}

/// Routes behind the auth middleware
pub fn protected_auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/verify", get(verify_handler))
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ==================
// Handlers
// ==================

async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> AuthResult<(StatusCode, Json<SignupResponse>)> {
    let (user, token, _) = state.auth.signup(request)?;

    Logger::info("SIGNUP", &[("user_id", &user.id.to_string())]);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            token,
            user_id: user.id,
            email: user.email,
        }),
    ))
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>> {
    match state.auth.login(request) {
        Ok((user, token, _)) => {
            Logger::info("LOGIN_OK", &[("user_id", &user.id.to_string())]);
            Ok(Json(LoginResponse {
                token,
                user: UserSummary::from(&user),
            }))
        }
        Err(e) => {
            // Logged without the email to keep credentials out of the log
            if matches!(e, AuthError::InvalidCredentials) {
                Logger::warn("LOGIN_FAILED", &[]);
            }
            Err(e)
        }
    }
}

/// Logout revokes whatever token is presented. Revocation is idempotent,
/// so a token that is already invalid still logs out with a 200.
async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AuthResult<Json<SuccessResponse>> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    match parse_bearer(header) {
        Ok(Some(token)) => {
            state.auth.logout(token)?;
            Logger::info("LOGOUT", &[]);
            Ok(Json(SuccessResponse::ok()))
        }
        Ok(None) | Err(_) => Err(AuthError::MalformedCredential),
    }
}

async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> AuthResult<Json<UserSummary>> {
    let user = state.auth.get_user(ctx.user_id)?;
    Ok(Json(UserSummary::from(&user)))
}
