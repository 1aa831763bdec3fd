//! Transaction storage trait and in-memory backend.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::transaction::Transaction;
use crate::auth::errors::{AuthError, AuthResult};

/// Storage abstraction for transactions
pub trait TransactionStore: Send + Sync {
    fn create(&self, tx: &Transaction) -> AuthResult<()>;

    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Transaction>>;

    /// Replace the stored record. The owner is immutable; callers update
    /// fields, not ownership.
    fn update(&self, tx: &Transaction) -> AuthResult<()>;

    fn delete(&self, id: Uuid) -> AuthResult<()>;

    /// All rows owned by one user
    fn list_for_user(&self, user_id: Uuid) -> AuthResult<Vec<Transaction>>;

    /// All rows (admin visibility)
    fn list_all(&self) -> AuthResult<Vec<Transaction>>;
}

/// In-memory transaction store
#[derive(Default)]
pub struct InMemoryTransactionStore {
    rows: RwLock<HashMap<Uuid, Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> AuthError {
    AuthError::StoreUnavailable("transaction store lock poisoned".to_string())
}

impl TransactionStore for InMemoryTransactionStore {
    fn create(&self, tx: &Transaction) -> AuthResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.insert(tx.id, tx.clone());
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Transaction>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(&id).cloned())
    }

    fn update(&self, tx: &Transaction) -> AuthResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        match rows.get_mut(&tx.id) {
            Some(existing) => {
                *existing = tx.clone();
                Ok(())
            }
            None => Err(AuthError::NotFound),
        }
    }

    fn delete(&self, id: Uuid) -> AuthResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        match rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AuthError::NotFound),
        }
    }

    fn list_for_user(&self, user_id: Uuid) -> AuthResult<Vec<Transaction>> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut out: Vec<Transaction> = rows
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }

    fn list_all(&self) -> AuthResult<Vec<Transaction>> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut out: Vec<Transaction> = rows.values().cloned().collect();
        out.sort_by_key(|t| t.created_at);
        Ok(out)
    }
}
