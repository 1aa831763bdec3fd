//! Server assembly: shared state, router construction, the serve loop,
//! and the periodic session cleanup task.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Json, routing::get, Router};
use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::auth_routes::{protected_auth_routes, public_auth_routes};
use super::config::HttpConfig;
use super::ledger_routes::ledger_routes;
use super::middleware::require_auth;
use super::user_routes::user_routes;
use crate::auth::crypto::PasswordPolicy;
use crate::auth::errors::AuthResult;
use crate::auth::service::AuthService;
use crate::auth::session::InMemorySessionStore;
use crate::auth::token::TokenIssuer;
use crate::auth::user::InMemoryUserStore;
use crate::ledger::store::InMemoryTransactionStore;
use crate::observability::Logger;

/// How often the best-effort session sweep runs. Correctness never
/// depends on it; expiry is checked at read time.
const CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Concrete auth service wired to the in-memory backends
pub type Auth = AuthService<InMemoryUserStore, InMemorySessionStore>;

/// Shared per-process state
pub struct AppState {
    pub auth: Auth,
    pub transactions: InMemoryTransactionStore,
}

impl AppState {
    /// Build state from configuration, seeding the bootstrap admin if one
    /// is configured and absent.
    pub fn new(config: &HttpConfig) -> AuthResult<Self> {
        let auth = AuthService::new(
            InMemoryUserStore::new(),
            InMemorySessionStore::new(),
            TokenIssuer::new(Duration::hours(config.session_ttl_hours)),
            PasswordPolicy {
                min_length: config.password_min_length,
            },
        );

        if let Some(admin) = &config.bootstrap_admin {
            if let Some(user) = auth.seed_admin(&admin.email, &admin.password)? {
                Logger::info("ADMIN_SEEDED", &[("user_id", &user.id.to_string())]);
            }
        }

        Ok(Self {
            auth,
            transactions: InMemoryTransactionStore::new(),
        })
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Build the full application router.
///
/// Public: health, signup, login, logout. Everything else sits behind
/// [`require_auth`], which rejects before any handler runs.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let protected = Router::new()
        .merge(protected_auth_routes())
        .nest("/users", user_routes())
        .nest("/transactions", ledger_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(public_auth_routes())
        .merge(protected)
        .layer(cors)
        .with_state(state)
}

/// HTTP server for the data-entry backend
pub struct HttpServer {
    config: HttpConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn with_config(config: HttpConfig) -> AuthResult<Self> {
        let state = Arc::new(AppState::new(&config)?);
        Ok(Self { config, state })
    }

    /// The assembled router (used directly by integration tests)
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config.cors_origins)
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("bad address: {e}"))
        })?;

        let router = self.router();
        spawn_session_cleanup(self.state.clone());

        Logger::info("SERVER_START", &[("addr", &addr.to_string())]);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await
    }
}

/// Best-effort hourly sweep of expired sessions, bounding store growth.
fn spawn_session_cleanup(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(CLEANUP_INTERVAL_SECS));
        // The first tick fires immediately; skip it
        interval.tick().await;

        loop {
            interval.tick().await;
            match state.auth.purge_expired_sessions(Utc::now()) {
                Ok(0) => {}
                Ok(n) => Logger::info("SESSIONS_PURGED", &[("count", &n.to_string())]),
                Err(e) => Logger::error("SESSION_PURGE_FAILED", &[("error", &e.to_string())]),
            }
        }
    });
}
