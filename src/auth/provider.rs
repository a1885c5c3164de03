// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider port.
//!
//! Everything the server knows about users comes through this trait. The
//! production implementation talks to Supabase Auth
//! ([`crate::supabase::GoTrueIdentity`]); tests use an in-memory fake.

use async_trait::async_trait;

use crate::models::{Credentials, Session, UserSummary};

/// A user as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    pub email: Option<String>,
}

impl From<ProviderUser> for UserSummary {
    fn from(user: ProviderUser) -> Self {
        UserSummary {
            id: user.id,
            email: user.email,
        }
    }
}

/// Result of a signup. `session` is `None` while email confirmation is pending.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user: ProviderUser,
    pub session: Option<Session>,
}

/// Result of a password login.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: ProviderUser,
    pub session: Session,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider understood the request and said no (bad credentials,
    /// duplicate email, expired token, ...).
    #[error("identity provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("identity provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, ProviderError::Rejected { .. })
    }

    /// The provider's own wording for a rejection, or the full error otherwise.
    pub fn provider_message(&self) -> String {
        match self {
            ProviderError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp, ProviderError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    /// Resolve a bearer token to the user it was issued for.
    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError>;

    async fn check_health(&self) -> Result<(), ProviderError>;
}
