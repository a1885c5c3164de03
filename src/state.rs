// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    auth::IdentityProvider,
    config::DateBasis,
    storage::TransactionStore,
    supabase::{GoTrueIdentity, PostgrestTransactions, SupabaseClient},
};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub transactions: Arc<dyn TransactionStore>,
    pub date_basis: DateBasis,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        transactions: Arc<dyn TransactionStore>,
    ) -> Self {
        Self {
            identity,
            transactions,
            date_basis: DateBasis::default(),
        }
    }

    /// Wire both ports to the same Supabase project.
    pub fn from_supabase(client: SupabaseClient, transactions_table: impl Into<String>) -> Self {
        Self::new(
            Arc::new(GoTrueIdentity::new(client.clone())),
            Arc::new(PostgrestTransactions::new(client, transactions_table)),
        )
    }

    pub fn with_date_basis(mut self, date_basis: DateBasis) -> Self {
        self.date_basis = date_basis;
        self
    }

    /// Date assigned to transactions created without one.
    pub fn today(&self) -> NaiveDate {
        self.date_basis.today()
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by in-memory fakes, with handles to inspect them.
    pub fn in_memory() -> (
        Self,
        Arc<crate::auth::memory::InMemoryIdentity>,
        Arc<crate::storage::memory::InMemoryTransactionStore>,
    ) {
        let identity = Arc::new(crate::auth::memory::InMemoryIdentity::default());
        let store = Arc::new(crate::storage::memory::InMemoryTransactionStore::default());
        let state = Self::new(identity.clone(), store.clone());
        (state, identity, store)
    }
}
