// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PostgREST adapter for the transaction store.
//!
//! Requests carry the caller's access token so row-level security policies
//! on the table see the real user, and every query also filters on
//! `user_id` explicitly.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::SupabaseClient;
use crate::{
    auth::AuthenticatedUser,
    models::{NewTransaction, Transaction},
    storage::{retain_owned, StorageError, StorageResult, TransactionStore},
};

const PREFER_REPRESENTATION: &str = "return=representation";

#[derive(Serialize)]
struct InsertRow<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    transaction: &'a NewTransaction,
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// Decode rows one at a time. A row that does not fit [`Transaction`] (for
/// example a NULL `date`) is logged and skipped instead of failing the list.
fn parse_rows(rows: Vec<Value>, user: &AuthenticatedUser) -> Vec<Transaction> {
    rows.into_iter()
        .filter_map(|row| match Transaction::deserialize(&row) {
            Ok(transaction) => Some(transaction),
            Err(e) => {
                tracing::warn!(
                    user_id = %user.user_id,
                    row_id = %row.get("id").unwrap_or(&serde_json::Value::Null),
                    error = %e,
                    "Skipping malformed transaction row"
                );
                None
            }
        })
        .collect()
}

/// Transaction store backed by a Supabase table.
#[derive(Debug, Clone)]
pub struct PostgrestTransactions {
    client: SupabaseClient,
    table: String,
}

impl PostgrestTransactions {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn table_url(&self) -> StorageResult<Url> {
        self.client
            .endpoint(&format!("rest/v1/{}", self.table))
            .map_err(|e| StorageError::Request(e.to_string()))
    }

    fn request(&self, method: Method, user: &AuthenticatedUser) -> StorageResult<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.table_url()?)
            .bearer_auth(&user.access_token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> StorageResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl TransactionStore for PostgrestTransactions {
    async fn list_for_owner(&self, user: &AuthenticatedUser) -> StorageResult<Vec<Transaction>> {
        let request = self.request(Method::GET, user)?.query(&[
            ("select", "*".to_string()),
            ("user_id", eq(&user.user_id)),
            ("order", "date.desc".to_string()),
        ]);

        let rows: Vec<Value> = self.send(request).await?;
        Ok(retain_owned(parse_rows(rows, user), user))
    }

    async fn insert(
        &self,
        user: &AuthenticatedUser,
        transaction: NewTransaction,
    ) -> StorageResult<Transaction> {
        let row = InsertRow {
            user_id: &user.user_id,
            transaction: &transaction,
        };
        let request = self
            .request(Method::POST, user)?
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&[row]);

        let rows: Vec<Transaction> = self.send(request).await?;
        rows.into_iter().next().ok_or_else(|| {
            StorageError::InvalidResponse("insert returned no rows".to_string())
        })
    }

    async fn delete_owned(&self, user: &AuthenticatedUser, id: &str) -> StorageResult<u64> {
        let request = self
            .request(Method::DELETE, user)?
            .query(&[("id", eq(id)), ("user_id", eq(&user.user_id))])
            .header("Prefer", PREFER_REPRESENTATION);

        let rows: Vec<Value> = self.send(request).await?;
        Ok(rows.len() as u64)
    }
}
