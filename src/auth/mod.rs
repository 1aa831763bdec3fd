//! # Authentication Core
//!
//! Opaque bearer tokens, server-side sessions, Argon2id credentials, and
//! role/ownership authorization. Exactly one token design ships: random
//! 256-bit tokens resolved by store lookup, revocable on logout, expiring
//! lazily by timestamp comparison.

pub mod authenticator;
pub mod crypto;
pub mod errors;
pub mod guard;
pub mod service;
pub mod session;
pub mod token;
pub mod user;

pub use authenticator::{AuthContext, AuthOutcome, RejectReason};
pub use errors::{AuthError, AuthResult};
pub use service::AuthService;
pub use session::{Session, SessionStore};
pub use token::TokenIssuer;
pub use user::{Role, User, UserStore};
