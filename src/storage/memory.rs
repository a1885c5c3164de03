// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory transaction store used by tests.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use serde_json::json;

use super::{StorageError, StorageResult, TransactionStore};
use crate::{
    auth::AuthenticatedUser,
    models::{NewTransaction, RecordId, Transaction},
};

#[derive(Default)]
pub struct InMemoryTransactionStore {
    rows: Mutex<Vec<Transaction>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryTransactionStore {
    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every call fail as the database would on a constraint violation.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every stored row regardless of owner.
    pub fn all(&self) -> Vec<Transaction> {
        self.rows.lock().unwrap().clone()
    }

    fn enter(&self) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected {
                status: 400,
                body: json!({
                    "code": "23502",
                    "message": "null value in column violates not-null constraint"
                }),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn list_for_owner(&self, user: &AuthenticatedUser) -> StorageResult<Vec<Transaction>> {
        self.enter()?;
        let mut rows: Vec<Transaction> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| tx.user_id == user.user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn insert(
        &self,
        user: &AuthenticatedUser,
        transaction: NewTransaction,
    ) -> StorageResult<Transaction> {
        self.enter()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = Transaction {
            id: RecordId(id.to_string()),
            user_id: user.user_id.clone(),
            amount: transaction.amount,
            description: transaction.description,
            transaction_type: transaction.transaction_type,
            category_id: transaction.category_id,
            date: transaction.date,
            created_at: None,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn delete_owned(&self, user: &AuthenticatedUser, id: &str) -> StorageResult<u64> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|tx| !(tx.id.0 == id && tx.user_id == user.user_id));
        Ok((before - rows.len()) as u64)
    }
}
