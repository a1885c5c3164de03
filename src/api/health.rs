// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" while the process is serving requests.
    pub status: String,
    /// Server time (RFC 3339).
    pub timestamp: String,
}

/// Readiness response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Individual checks and their results.
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Identity provider reachability ("ok" or "unavailable").
    pub identity: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies - use readiness for that.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Readiness probe handler.
///
/// Returns 200 only if the identity provider answers its health endpoint.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let identity_ok = match state.identity.check_health().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Identity provider health check failed");
            false
        }
    };

    let response = ReadyResponse {
        status: if identity_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            identity: if identity_ok { "ok" } else { "unavailable" }.to_string(),
        },
    };

    let status = if identity_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_timestamp() {
        let Json(response) = health().await;
        assert_eq!(response.status, "healthy");
        assert!(chrono::DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
    }

    #[tokio::test]
    async fn readiness_follows_identity_provider() {
        let (state, identity, _) = AppState::in_memory();

        let (status, Json(response)) = readiness(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "ok");
        assert_eq!(response.checks.identity, "ok");

        identity.set_unavailable(true);
        let (status, Json(response)) = readiness(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status, "degraded");
        assert_eq!(response.checks.identity, "unavailable");
    }
}
