//! Transaction records: the domain rows the ownership guard protects.
//!
//! Each transaction is owned by exactly one user via `user_id`; ownership
//! determines visibility and mutation rights unless the actor is an admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::errors::{AuthError, AuthResult};

/// A booked transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub customer_id: String,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: f64,

    /// Owning user (foreign key into the user store)
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Field values for creating or updating a transaction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub customer_id: String,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub price: f64,
}

impl TransactionDraft {
    /// Type/range checks only; anything richer belongs to the form layer.
    pub fn validate(&self) -> AuthResult<()> {
        let required = [
            ("customerId", &self.customer_id),
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("date", &self.date),
            ("time", &self.time),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AuthError::Validation(format!("{field} is required")));
            }
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AuthError::Validation(
                "price must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }

    /// Materialize a new record owned by `owner_id`
    pub fn into_transaction(self, owner_id: Uuid) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            origin: self.origin,
            destination: self.destination,
            date: self.date,
            time: self.time,
            price: self.price,
            user_id: owner_id,
            created_at: Utc::now(),
        }
    }
}
