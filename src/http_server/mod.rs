//! # HTTP Server
//!
//! Axum surface over the auth core: public auth endpoints, the
//! authentication middleware, and the protected user/transaction routes.
//!
//! Every protected route is reached only through the middleware; a 401
//! short-circuits before any business logic runs.

pub mod auth_routes;
pub mod config;
pub mod ledger_routes;
pub mod middleware;
pub mod server;
pub mod user_routes;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::auth::errors::AuthError;

pub use config::{ConfigError, HttpConfig};
pub use server::{AppState, HttpServer};

/// JSON body extractor for this API.
///
/// A body that fails to deserialize (missing field, wrong type, bad JSON)
/// is boundary validation like any other and answers 400, not axum's
/// default 422.
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AuthError::Validation(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Uniform error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
