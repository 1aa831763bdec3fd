//! # Ledger
//!
//! The transaction records that the data-entry application books. Kept
//! deliberately thin: the auth core is the product here, and these rows
//! exist so ownership checks have something real to protect.

pub mod store;
pub mod transaction;

pub use store::{InMemoryTransactionStore, TransactionStore};
pub use transaction::{Transaction, TransactionDraft};
