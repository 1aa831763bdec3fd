//! ledgerdesk - authentication and session core for a transaction
//! data-entry backend.
//!
//! One token design: opaque 256-bit bearer tokens resolved against a
//! server-side session store, with role and ownership authorization
//! layered behind a single guard.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod ledger;
pub mod observability;
