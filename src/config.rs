// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup. A missing
//! Supabase URL or key is fatal: the server refuses to start without them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `SUPABASE_URL` | Supabase project URL | Required |
//! | `SUPABASE_ANON_KEY` | Supabase anon (public) API key | Required |
//! | `SUPABASE_TIMEOUT_SECS` | Timeout for calls to Supabase | `15` |
//! | `TRANSACTIONS_TABLE` | Table holding transactions | `transactions` |
//! | `DEFAULT_DATE_TZ` | `utc` or `local`, used for default transaction dates | `utc` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, time::Duration};

use chrono::{Local, NaiveDate, Utc};
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const SUPABASE_TIMEOUT_ENV: &str = "SUPABASE_TIMEOUT_SECS";
pub const TRANSACTIONS_TABLE_ENV: &str = "TRANSACTIONS_TABLE";
pub const DEFAULT_DATE_TZ_ENV: &str = "DEFAULT_DATE_TZ";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_TRANSACTIONS_TABLE: &str = "transactions";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing Supabase environment variables! Set {0}.")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which calendar is used when a transaction is created without a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBasis {
    #[default]
    Utc,
    Local,
}

impl DateBasis {
    /// Today's date according to this basis.
    pub fn today(self) -> NaiveDate {
        match self {
            DateBasis::Utc => Utc::now().date_naive(),
            DateBasis::Local => Local::now().date_naive(),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "utc" => Some(DateBasis::Utc),
            "local" => Some(DateBasis::Local),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT` from the environment. Anything but `json` is pretty.
    ///
    /// Read separately from [`Config`] because tracing is set up before the
    /// rest of the configuration is loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(LOG_FORMAT_ENV) {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Fully parsed server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub supabase_url: Url,
    pub supabase_anon_key: String,
    pub supabase_timeout: Duration,
    pub transactions_table: String,
    pub date_basis: DateBasis,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let supabase_url = get(SUPABASE_URL_ENV).ok_or(ConfigError::Missing(SUPABASE_URL_ENV))?;
        let supabase_anon_key =
            get(SUPABASE_ANON_KEY_ENV).ok_or(ConfigError::Missing(SUPABASE_ANON_KEY_ENV))?;

        let supabase_url = Url::parse(supabase_url.trim()).map_err(|e| ConfigError::Invalid {
            name: SUPABASE_URL_ENV,
            reason: e.to_string(),
        })?;

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get(SUPABASE_TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: SUPABASE_TIMEOUT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let date_basis = match get(DEFAULT_DATE_TZ_ENV) {
            Some(raw) => DateBasis::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                name: DEFAULT_DATE_TZ_ENV,
                reason: format!("expected `utc` or `local`, got `{raw}`"),
            })?,
            None => DateBasis::default(),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            supabase_url,
            supabase_anon_key: supabase_anon_key.trim().to_string(),
            supabase_timeout: Duration::from_secs(timeout_secs),
            transactions_table: get(TRANSACTIONS_TABLE_ENV)
                .unwrap_or_else(|| DEFAULT_TRANSACTIONS_TABLE.to_string()),
            date_basis,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                reason: e.to_string(),
            })
    }
}
