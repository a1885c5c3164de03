// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated user representation.

use std::fmt;

use super::provider::ProviderUser;

/// Identity attached to a request once its bearer token has been verified.
///
/// This is the primary type used throughout the application to represent
/// the user making a request. The access token is kept so that calls to the
/// data store run with the caller's own privileges.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identity provider user ID
    pub user_id: String,

    /// Email on record, empty when the provider has none
    pub email: String,

    /// Bearer token the request was authenticated with
    pub access_token: String,
}

impl AuthenticatedUser {
    pub fn new(user: ProviderUser, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user.id,
            email: user.email.unwrap_or_default(),
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
