//! Transaction routes. Listing is scoped to the resolved identity;
//! mutation of a specific record reads its owner first and goes through
//! the ownership guard.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth_routes::SuccessResponse;
use super::server::AppState;
use super::Json;
use crate::auth::authenticator::AuthContext;
use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::guard;
use crate::ledger::store::TransactionStore;
use crate::ledger::transaction::{Transaction, TransactionDraft};

pub fn ledger_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route("/:id", axum::routing::put(update_handler).delete(delete_handler))
}

#[derive(Debug, Serialize)]
pub struct TransactionsListResponse {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(flatten)]
    pub draft: TransactionDraft,

    /// Admins may book a transaction on behalf of a named user
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

async fn list_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> AuthResult<Json<TransactionsListResponse>> {
    let transactions = if ctx.is_admin() {
        state.transactions.list_all()?
    } else {
        state.transactions.list_for_user(ctx.user_id)?
    };

    Ok(Json(TransactionsListResponse {
        total: transactions.len(),
        transactions,
    }))
}

async fn create_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateTransactionRequest>,
) -> AuthResult<(StatusCode, Json<TransactionResponse>)> {
    request.draft.validate()?;

    // Clients always own what they book; only an admin may assign another
    // owner, and that owner must exist
    let owner_id = match request.user_id {
        Some(target) if target != ctx.user_id => {
            guard::require_admin(&ctx)?;
            state.auth.get_user(target)?;
            target
        }
        _ => ctx.user_id,
    };

    let transaction = request.draft.into_transaction(owner_id);
    state.transactions.create(&transaction)?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { transaction })))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(draft): Json<TransactionDraft>,
) -> AuthResult<Json<TransactionResponse>> {
    draft.validate()?;

    let existing = state
        .transactions
        .find_by_id(id)?
        .ok_or(AuthError::NotFound)?;
    guard::require_owner_or_admin(&ctx, existing.user_id)?;

    let transaction = Transaction {
        id: existing.id,
        customer_id: draft.customer_id,
        origin: draft.origin,
        destination: draft.destination,
        date: draft.date,
        time: draft.time,
        price: draft.price,
        user_id: existing.user_id,
        created_at: existing.created_at,
    };
    state.transactions.update(&transaction)?;

    Ok(Json(TransactionResponse { transaction }))
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> AuthResult<Json<SuccessResponse>> {
    let existing = state
        .transactions
        .find_by_id(id)?
        .ok_or(AuthError::NotFound)?;
    guard::require_owner_or_admin(&ctx, existing.user_id)?;

    state.transactions.delete(id)?;
    Ok(Json(SuccessResponse::ok()))
}
