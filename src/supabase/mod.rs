// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supabase integration.
//!
//! One [`SupabaseClient`] is built at startup and shared by the two adapters:
//!
//! - [`GoTrueIdentity`] implements the identity port against `/auth/v1`
//! - [`PostgrestTransactions`] implements the transaction store against `/rest/v1`

use std::{fmt, time::Duration};

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::config::Config;

pub mod gotrue;
pub mod postgrest;

pub use gotrue::GoTrueIdentity;
pub use postgrest::PostgrestTransactions;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid Supabase endpoint {path}: {reason}")]
    Endpoint { path: String, reason: String },
}

/// Shared handle to a Supabase project.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: Url,
    anon_key: String,
    http: Client,
}

impl SupabaseClient {
    pub fn new(
        base_url: Url,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SupabaseError::Client(e.to_string()))?;

        Ok(Self {
            base_url: with_trailing_slash(base_url),
            anon_key: anon_key.into(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SupabaseError> {
        Self::new(
            config.supabase_url.clone(),
            config.supabase_anon_key.clone(),
            config.supabase_timeout,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path such as `auth/v1/user` against the project URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SupabaseError::Endpoint {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Start a request carrying the project's `apikey` header.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
    }
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Pull a human-readable message out of a Supabase error body.
///
/// Auth answers with `msg` or `error_description`; PostgREST with `message`.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
