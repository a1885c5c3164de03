// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Domain types shared by the API handlers and the Supabase adapters.
//!
//! ## Model Categories
//!
//! - **Identity**: users and sessions as reported by Supabase Auth
//! - **Transactions**: income and expense records owned by a single user

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Record Identifiers
// =============================================================================

/// Identifier generated by the data store.
///
/// Depending on the table schema the store hands out UUIDs or integers.
/// Both are accepted on the way in and always rendered as a string.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(value) => RecordId(value),
            Raw::Signed(value) => RecordId(value.to_string()),
            Raw::Unsigned(value) => RecordId(value.to_string()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

// =============================================================================
// Identity Models
// =============================================================================

/// Public view of a user, as returned to API clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    /// Opaque user identifier issued by the identity provider.
    pub id: String,
    /// Email address, when the provider has one on record.
    pub email: Option<String>,
}

/// Session issued by the identity provider on signup or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Session {
    /// Bearer token to send as `Authorization: Bearer <access_token>`.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Always `bearer` for Supabase.
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    /// Absolute expiry (Unix seconds), if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Email and password that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Transaction Models
// =============================================================================

/// Direction of money flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// A stored financial transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Transaction {
    /// Store-generated identifier.
    pub id: RecordId,
    /// Owner of the transaction.
    pub user_id: String,
    /// Amount in the smallest currency unit (e.g. cents).
    pub amount: i64,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// `income` or `expense`.
    pub transaction_type: TransactionType,
    /// Optional category reference.
    #[serde(default)]
    pub category_id: Option<RecordId>,
    /// Calendar date of the transaction (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Row creation time, when the table tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A validated transaction ready to be inserted for the current user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: i64,
    pub description: Option<String>,
    pub transaction_type: TransactionType,
    pub category_id: Option<RecordId>,
    pub date: NaiveDate,
}
