// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supabase Auth (GoTrue) adapter for the identity port.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{error_message, SupabaseClient};
use crate::{
    auth::{IdentityProvider, ProviderError, ProviderUser, SignIn, SignUp},
    models::{Credentials, Session},
};

const SIGNUP_PATH: &str = "auth/v1/signup";
const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";
const USER_PATH: &str = "auth/v1/user";
const HEALTH_PATH: &str = "auth/v1/health";

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueUser> for ProviderUser {
    fn from(user: GoTrueUser) -> Self {
        ProviderUser {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    refresh_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl GoTrueSession {
    fn split(self) -> (ProviderUser, Session) {
        let session = Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_in: self.expires_in,
            expires_at: self.expires_at,
        };
        (self.user.into(), session)
    }
}

/// Identity provider backed by a Supabase project's Auth service.
#[derive(Debug, Clone)]
pub struct GoTrueIdentity {
    client: SupabaseClient,
}

impl GoTrueIdentity {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ProviderError> {
        let url = self
            .client
            .endpoint(path)
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(self.client.request(method, url))
    }

    /// Send a request and decode the JSON body.
    ///
    /// 4xx answers are rejections carrying the provider's message; transport
    /// failures and 5xx answers mean the provider is unavailable. An empty
    /// success body decodes to `Value::Null`.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes)
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()));
        }

        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

        if status.is_client_error() {
            Err(ProviderError::Rejected {
                status: status.as_u16(),
                message,
            })
        } else {
            Err(ProviderError::Unavailable(format!("HTTP {status}: {message}")))
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl IdentityProvider for GoTrueIdentity {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp, ProviderError> {
        let request = self
            .request(Method::POST, SIGNUP_PATH)?
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }));
        let body = self.send(request).await?;

        // With auto-confirm the provider answers with a full session; while
        // email confirmation is pending it answers with the bare user.
        if body.get("access_token").is_some() {
            let (user, session) = decode::<GoTrueSession>(body)?.split();
            return Ok(SignUp {
                user,
                session: Some(session),
            });
        }

        let nested = if body.get("id").is_none() {
            body.get("user").cloned()
        } else {
            None
        };
        let user = decode::<GoTrueUser>(nested.unwrap_or(body))?;
        Ok(SignUp {
            user: user.into(),
            session: None,
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError> {
        let request = self
            .request(Method::POST, TOKEN_PATH)?
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }));
        let body = self.send(request).await?;

        let (user, session) = decode::<GoTrueSession>(body)?.split();
        Ok(SignIn { user, session })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let request = self
            .request(Method::POST, LOGOUT_PATH)?
            .bearer_auth(access_token);
        self.send(request).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let request = self
            .request(Method::GET, USER_PATH)?
            .bearer_auth(access_token);
        let body = self.send(request).await?;
        Ok(decode::<GoTrueUser>(body)?.into())
    }

    async fn check_health(&self) -> Result<(), ProviderError> {
        let request = self.request(Method::GET, HEALTH_PATH)?;
        self.send(request).await?;
        Ok(())
    }
}
