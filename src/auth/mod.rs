// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication backed by Supabase Auth.
//!
//! ## Auth Flow
//!
//! 1. Client signs up or logs in through `/api/auth/*` and receives a session
//! 2. Client sends `Authorization: Bearer <access_token>`
//! 3. Server:
//!    - Rejects requests without a well-formed header (no provider call)
//!    - Asks the identity provider who the token belongs to
//!    - Stores the resulting [`AuthenticatedUser`] in the request extensions
//!
//! ## Security
//!
//! - All transaction endpoints require authentication
//! - The server keeps no session state; every request is verified anew
//! - Access tokens never appear in `Debug` output

pub mod error;
pub mod extractor;
#[cfg(test)]
pub mod memory;
pub mod middleware;
pub mod provider;
pub mod user;

pub use error::AuthError;
pub use extractor::{authenticate, bearer_token, Auth};
pub use middleware::require_auth;
pub use provider::{IdentityProvider, ProviderError, ProviderUser, SignIn, SignUp};
pub use user::AuthenticatedUser;
