// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process, time::Duration};

use axum_server::Handle;
use finance_tracker_server::{
    api::router,
    config::{Config, LogFormat},
    state::AppState,
    supabase::SupabaseClient,
};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// Wait for Ctrl-C or SIGTERM, then let in-flight requests finish.
async fn shutdown_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }

    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environments set variables directly.
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            process::exit(1);
        }
    };

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "Invalid bind address");
            process::exit(1);
        }
    };

    let client = match SupabaseClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Supabase client");
            process::exit(1);
        }
    };

    tracing::info!(
        supabase_url = %client.base_url(),
        transactions_table = %config.transactions_table,
        "Supabase client configured"
    );

    let state = AppState::from_supabase(client, config.transactions_table.clone())
        .with_date_basis(config.date_basis);
    let app = router(state);

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    tracing::info!(%addr, "Finance tracker API listening (docs at /docs)");

    if let Err(e) = axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!(error = %e, "Server failed");
        process::exit(1);
    }

    tracing::info!("Server stopped");
}
