//! User management routes (admin surface) plus self-service password
//! change. All behind the auth middleware; role checks go through the
//! authorization guard, never inline.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth_routes::{SuccessResponse, UserSummary};
use super::server::AppState;
use super::Json;
use crate::auth::authenticator::AuthContext;
use crate::auth::errors::AuthResult;
use crate::auth::service::CreateUserRequest;
use crate::observability::Logger;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route("/:id", delete(delete_user_handler))
        .route("/change-password", post(change_password_handler))
}

#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserSummary>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> AuthResult<Json<UsersListResponse>> {
    let users = state.auth.list_users(&ctx)?;
    let users: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();

    Ok(Json(UsersListResponse {
        total: users.len(),
        users,
    }))
}

async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateUserRequest>,
) -> AuthResult<(StatusCode, Json<UserSummary>)> {
    let user = state.auth.create_user(&ctx, request)?;

    Logger::info(
        "USER_CREATED",
        &[
            ("actor", &ctx.user_id.to_string()),
            ("user_id", &user.id.to_string()),
            ("role", user.role.as_str()),
        ],
    );

    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> AuthResult<Json<SuccessResponse>> {
    state.auth.delete_user(&ctx, id)?;

    Logger::info(
        "USER_DELETED",
        &[
            ("actor", &ctx.user_id.to_string()),
            ("user_id", &id.to_string()),
        ],
    );

    Ok(Json(SuccessResponse::ok()))
}

async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> AuthResult<Json<SuccessResponse>> {
    state
        .auth
        .change_password(ctx.user_id, &request.current_password, &request.new_password)?;

    Logger::info("PASSWORD_CHANGED", &[("user_id", &ctx.user_id.to_string())]);

    Ok(Json(SuccessResponse::ok()))
}
