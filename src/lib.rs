// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Finance Tracker Server - Personal Finance API on Supabase
//!
//! Users sign up and log in through Supabase Auth, then record income and
//! expense transactions stored in a Supabase table. The server keeps no
//! session or row state of its own.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token guard and the identity provider port
//! - `storage` - Transaction store port and ownership checks
//! - `supabase` - Supabase Auth and PostgREST adapters
//! - `validation` - Request body validation

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod supabase;
pub mod validation;
