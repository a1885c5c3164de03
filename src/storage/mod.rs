// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Storage
//!
//! The [`TransactionStore`] port is the only way handlers touch persisted
//! transactions. Every operation is scoped to the authenticated user:
//!
//! - listing returns only the caller's rows, newest date first
//! - inserts always stamp the caller as owner
//! - deletes match on both the row id and the owner, so a foreign id
//!   silently matches nothing
//!
//! The production implementation is [`crate::supabase::PostgrestTransactions`].

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    auth::AuthenticatedUser,
    models::{NewTransaction, Transaction},
};

#[cfg(test)]
pub mod memory;
pub mod ownership;

pub use ownership::{retain_owned, OwnedResource};

/// Storage operation failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store could not be reached or the request could not be sent.
    #[error("data store request failed: {0}")]
    Request(String),

    /// The store answered with an error status.
    #[error("data store rejected the request with status {status}")]
    Rejected { status: u16, body: Value },

    #[error("data store returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl StorageError {
    /// JSON forwarded to clients as `details` on failed writes.
    pub fn details(&self) -> Value {
        match self {
            StorageError::Rejected { body, .. } => body.clone(),
            StorageError::Request(message) | StorageError::InvalidResponse(message) => {
                json!({ "message": message })
            }
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// All of the user's transactions, ordered by date descending.
    async fn list_for_owner(&self, user: &AuthenticatedUser) -> StorageResult<Vec<Transaction>>;

    /// Insert one transaction owned by `user` and return the stored row.
    async fn insert(
        &self,
        user: &AuthenticatedUser,
        transaction: NewTransaction,
    ) -> StorageResult<Transaction>;

    /// Delete the transaction with `id` if `user` owns it. Returns the number
    /// of rows removed (0 or 1).
    async fn delete_owned(&self, user: &AuthenticatedUser, id: &str) -> StorageResult<u64>;
}
