// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints backed by the identity provider.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::JsonBody;
use crate::{
    auth::bearer_token,
    error::ApiError,
    models::{Session, UserSummary},
    state::AppState,
    validation::CredentialsRequest,
};

const NO_TOKEN: &str = "No authorization token provided";

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserSummary,
    /// Absent while the provider waits for email confirmation.
    pub session: Option<Session>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
    pub session: Session,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserSummary,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = CredentialsRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid input or rejected by the identity provider"),
        (status = 500, description = "Identity provider unavailable")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let credentials = request.into_signup_credentials()?;

    let signed_up = state.identity.sign_up(&credentials).await.map_err(|e| {
        if e.is_rejection() {
            tracing::info!(error = %e, "Signup rejected by identity provider");
            ApiError::bad_request(e.provider_message())
        } else {
            tracing::error!(error = %e, "Signup failed");
            ApiError::internal_server_error()
        }
    })?;

    tracing::info!(user_id = %signed_up.user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Account created successfully".to_string(),
            user: signed_up.user.into(),
            session: signed_up.session,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Identity provider unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = request.into_credentials()?;

    let signed_in = state.identity.sign_in(&credentials).await.map_err(|e| {
        if e.is_rejection() {
            // Provider detail stays in the logs.
            tracing::warn!(error = %e, "Login rejected by identity provider");
            ApiError::unauthorized("Invalid email or password")
        } else {
            tracing::error!(error = %e, "Login failed");
            ApiError::internal_server_error()
        }
    })?;

    tracing::debug!(user_id = %signed_in.user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Logged in successfully".to_string(),
        user: signed_in.user.into(),
        session: signed_in.session,
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "No authorization token provided"),
        (status = 500, description = "Failed to logout")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized(NO_TOKEN))?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

    match state.identity.sign_out(token).await {
        Ok(()) => {}
        Err(e) if e.is_rejection() => {
            tracing::debug!(error = %e, "Logout with a token the provider no longer accepts");
        }
        Err(e) => {
            tracing::error!(error = %e, "Logout failed");
            return Err(ApiError::internal("Failed to logout"));
        }
    }

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 500, description = "Identity provider unavailable")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let token = bearer_token(&headers).map_err(|_| ApiError::unauthorized(NO_TOKEN))?;

    let user = state.identity.get_user(token).await.map_err(|e| {
        if e.is_rejection() {
            tracing::debug!(error = %e, "Token rejected by identity provider");
            ApiError::unauthorized("Invalid or expired token")
        } else {
            tracing::error!(error = %e, "User lookup failed");
            ApiError::internal_server_error()
        }
    })?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}
