// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory identity provider used by tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use uuid::Uuid;

use super::provider::{IdentityProvider, ProviderError, ProviderUser, SignIn, SignUp};
use crate::models::{Credentials, Session};

struct Account {
    id: String,
    password: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    /// access token -> (user id, email)
    sessions: HashMap<String, (String, String)>,
}

/// Behaves like Supabase Auth with email confirmation disabled.
#[derive(Default)]
pub struct InMemoryIdentity {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryIdentity {
    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every call fail as if the provider were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Create an account and a live session without counting as a call.
    pub fn register(&self, email: &str, password: &str) -> (ProviderUser, String) {
        let mut inner = self.inner.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        inner.accounts.insert(
            email.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        let token = Uuid::new_v4().to_string();
        inner
            .sessions
            .insert(token.clone(), (id.clone(), email.to_string()));
        (
            ProviderUser {
                id,
                email: Some(email.to_string()),
            },
            token,
        )
    }

    /// Expire a session as the provider would.
    pub fn revoke(&self, token: &str) {
        self.inner.lock().unwrap().sessions.remove(token);
    }

    pub fn account_count(&self) -> usize {
        self.inner.lock().unwrap().accounts.len()
    }

    fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    fn open_session(inner: &mut Inner, id: &str, email: &str) -> Session {
        let token = Uuid::new_v4().to_string();
        inner
            .sessions
            .insert(token.clone(), (id.to_string(), email.to_string()));
        Session {
            access_token: token,
            refresh_token: Uuid::new_v4().to_string(),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at: None,
        }
    }
}

fn rejected(status: u16, message: &str) -> ProviderError {
    ProviderError::Rejected {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp, ProviderError> {
        self.enter()?;
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.contains_key(&credentials.email) {
            return Err(rejected(422, "User already registered"));
        }
        let id = Uuid::new_v4().to_string();
        inner.accounts.insert(
            credentials.email.clone(),
            Account {
                id: id.clone(),
                password: credentials.password.clone(),
            },
        );
        let session = Self::open_session(&mut inner, &id, &credentials.email);
        Ok(SignUp {
            user: ProviderUser {
                id,
                email: Some(credentials.email.clone()),
            },
            session: Some(session),
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError> {
        self.enter()?;
        let mut inner = self.inner.lock().unwrap();
        let id = match inner.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.id.clone(),
            _ => return Err(rejected(400, "Invalid login credentials")),
        };
        let session = Self::open_session(&mut inner, &id, &credentials.email);
        Ok(SignIn {
            user: ProviderUser {
                id,
                email: Some(credentials.email.clone()),
            },
            session,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.enter()?;
        match self.inner.lock().unwrap().sessions.remove(access_token) {
            Some(_) => Ok(()),
            None => Err(rejected(401, "invalid JWT")),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        self.enter()?;
        let inner = self.inner.lock().unwrap();
        match inner.sessions.get(access_token) {
            Some((id, email)) => Ok(ProviderUser {
                id: id.clone(),
                email: Some(email.clone()),
            }),
            None => Err(rejected(401, "invalid JWT")),
        }
    }

    async fn check_health(&self) -> Result<(), ProviderError> {
        self.enter()
    }
}
