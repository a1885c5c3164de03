// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the transaction routes with
//! `axum::middleware::from_fn_with_state(state, require_auth)`. Requests
//! without a valid bearer token never reach the handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::authenticate;
use crate::state::AppState;

/// Authentication middleware function.
///
/// On success the [`super::AuthenticatedUser`] is stored in the request
/// extensions, where the [`super::Auth`] extractor picks it up.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // The body is not `Sync`, so only the parts are borrowed across the provider call.
    let (mut parts, body) = request.into_parts();

    match authenticate(state.identity.as_ref(), &parts.headers).await {
        Ok(user) => {
            parts.extensions.insert(user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Auth, AuthenticatedUser};
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn whoami(Auth(user): Auth) -> String {
        user.user_id
    }

    async fn raw_extension(request: Request) -> String {
        request
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|u| u.email.clone())
            .unwrap_or_default()
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/email", get(raw_extension))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    #[tokio::test]
    async fn missing_token_is_rejected_without_provider_call() {
        let (state, identity, _) = AppState::in_memory();

        let response = app(state)
            .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let (state, identity, _) = AppState::in_memory();
        let (user, token) = identity.register("grace@example.com", "secret1");

        let response = app(state.clone())
            .oneshot(
                Request::get("/whoami")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, user.id.as_bytes());

        let response = app(state)
            .oneshot(
                Request::get("/email")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "grace@example.com".as_bytes());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (state, identity, _) = AppState::in_memory();
        let (_, token) = identity.register("grace@example.com", "secret1");
        identity.revoke(&token);

        let response = app(state)
            .oneshot(
                Request::get("/whoami")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
