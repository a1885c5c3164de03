// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request body validation.
//!
//! Handlers accept loosely typed JSON and turn it into typed commands here
//! before anything reaches Supabase. A body either becomes a command or a
//! [`ValidationErrors`] listing every offending field.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::{Credentials, NewTransaction, RecordId, TransactionType};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MISSING_TRANSACTION_FIELDS: &str =
    "Missing required fields: amount and transaction_type are required";
pub const INVALID_TRANSACTION_TYPE: &str =
    r#"transaction_type must be either "income" or "expense""#;
const INVALID_AMOUNT: &str = "amount must be a non-zero whole number of cents";
const INVALID_DESCRIPTION: &str = "description must be a string";
const INVALID_CATEGORY: &str = "category_id must be a string or an integer";
const INVALID_DATE: &str = "date must be a YYYY-MM-DD date or an RFC 3339 timestamp";

/// A single rejected field.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a failed validation: a headline message plus per-field detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    /// Headline is the first field's message.
    pub fn new(fields: Vec<FieldError>) -> Self {
        let message = fields
            .first()
            .map(|f| f.message.clone())
            .unwrap_or_else(|| "Invalid request".to_string());
        Self { message, fields }
    }

    pub fn with_message(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            fields,
        }
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Body of `POST /api/auth/signup` and `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields must be present and non-empty.
    pub fn into_credentials(self) -> Result<Credentials, ValidationErrors> {
        let email = self.email.filter(|e| !e.is_empty());
        let password = self.password.filter(|p| !p.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            (email, password) => {
                let mut fields = Vec::new();
                if email.is_none() {
                    fields.push(FieldError::new("email", "email is required"));
                }
                if password.is_none() {
                    fields.push(FieldError::new("password", "password is required"));
                }
                Err(ValidationErrors::with_message(CREDENTIALS_REQUIRED, fields))
            }
        }
    }

    /// Signup additionally enforces [`MIN_PASSWORD_LEN`].
    pub fn into_signup_credentials(self) -> Result<Credentials, ValidationErrors> {
        let credentials = self.into_credentials()?;
        // Length in UTF-16 code units, as browsers measure it.
        if credentials.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(ValidationErrors::new(vec![FieldError::new(
                "password",
                PASSWORD_TOO_SHORT,
            )]));
        }
        Ok(credentials)
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// Body of `POST /api/transactions`, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Amount in cents. Integers, decimals (truncated) and numeric strings are accepted.
    #[schema(value_type = Option<i64>, example = 500)]
    pub amount: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    /// `income` or `expense`.
    #[schema(value_type = Option<String>, example = "expense")]
    pub transaction_type: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub category_id: Option<Value>,
    /// `YYYY-MM-DD`; defaults to today.
    #[schema(value_type = Option<String>, example = "2024-03-01")]
    pub date: Option<Value>,
}

impl CreateTransactionRequest {
    /// Turn the raw body into a [`NewTransaction`], using `today` when no date is given.
    pub fn validate(self, today: NaiveDate) -> Result<NewTransaction, ValidationErrors> {
        let amount = self.amount.filter(|v| !is_falsy(v));
        let kind = self.transaction_type.filter(|v| !is_falsy(v));

        let (amount, kind) = match (amount, kind) {
            (Some(amount), Some(kind)) => (amount, kind),
            (amount, kind) => {
                let mut fields = Vec::new();
                if amount.is_none() {
                    fields.push(FieldError::new("amount", "amount is required"));
                }
                if kind.is_none() {
                    fields.push(FieldError::new(
                        "transaction_type",
                        "transaction_type is required",
                    ));
                }
                return Err(ValidationErrors::with_message(
                    MISSING_TRANSACTION_FIELDS,
                    fields,
                ));
            }
        };

        let mut fields = Vec::new();

        let transaction_type = match &kind {
            Value::String(s) => TransactionType::parse(s),
            _ => None,
        };
        if transaction_type.is_none() {
            fields.push(FieldError::new("transaction_type", INVALID_TRANSACTION_TYPE));
        }

        let amount = parse_amount(&amount);
        if amount.is_none() {
            fields.push(FieldError::new("amount", INVALID_AMOUNT));
        }

        let description = match self.description {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(()),
        };
        if description.is_err() {
            fields.push(FieldError::new("description", INVALID_DESCRIPTION));
        }

        let category_id = match self.category_id {
            None => Ok(None),
            Some(v) if is_falsy(&v) => Ok(None),
            Some(Value::String(s)) => Ok(Some(RecordId(s))),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Some(RecordId(n.to_string()))),
            Some(_) => Err(()),
        };
        if category_id.is_err() {
            fields.push(FieldError::new("category_id", INVALID_CATEGORY));
        }

        let date = match self.date {
            None => Ok(today),
            Some(v) if is_falsy(&v) => Ok(today),
            Some(Value::String(s)) => parse_date(&s).ok_or(()),
            Some(_) => Err(()),
        };
        if date.is_err() {
            fields.push(FieldError::new("date", INVALID_DATE));
        }

        match (transaction_type, amount, description, category_id, date) {
            (Some(transaction_type), Some(amount), Ok(description), Ok(category_id), Ok(date)) => {
                Ok(NewTransaction {
                    amount,
                    description,
                    transaction_type,
                    category_id,
                    date,
                })
            }
            _ => Err(ValidationErrors::new(fields)),
        }
    }
}

/// JavaScript-style falsiness, so `0`, `""`, `false` and `null` count as absent.
/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its calendar date.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Parse an amount in cents, truncating fractional input toward zero.
///
/// Returns `None` for non-numeric input, values outside `i64`, and anything
/// that truncates to zero.
fn parse_amount(value: &Value) -> Option<i64> {
    let cents = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None if n.is_u64() => None,
            None => n.as_f64().and_then(truncate),
        },
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }?;

    (cents != 0).then_some(cents)
}

fn truncate(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let whole = value.trunc();
    // i64::MAX is not representable as f64; the cast rounds it up to 2^63.
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    Some(whole as i64)
}
