// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser, IdentityProvider};
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Verify the request's bearer token with the identity provider.
///
/// Header problems are rejected before the provider is contacted.
pub async fn authenticate(
    identity: &dyn IdentityProvider,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;

    match identity.get_user(token).await {
        Ok(user) => Ok(AuthenticatedUser::new(user, token)),
        Err(e) if e.is_rejection() => {
            tracing::debug!(error = %e, "Bearer token rejected by identity provider");
            Err(AuthError::InvalidToken)
        }
        Err(e) => {
            tracing::error!(error = %e, "Auth middleware error");
            Err(AuthError::InternalError(e.to_string()))
        }
    }
}

/// Extractor for authenticated users.
///
/// Routes behind [`super::require_auth`] find the user in the request
/// extensions. Anywhere else the token is verified on the spot.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_transactions(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<TransactionListResponse>, ApiError> {
///     // user.user_id contains the authenticated user's ID
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authenticate(state.identity.as_ref(), &parts.headers).await?;
        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ProviderUser;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_rejects_missing_and_malformed_headers() {
        let parts = parts_with_header(None);
        assert!(matches!(
            bearer_token(&parts.headers),
            Err(AuthError::MissingAuthHeader)
        ));

        for value in ["Basic abc", "Bearer", "Bearer    ", "bearer abc"] {
            let parts = parts_with_header(Some(value));
            assert!(
                matches!(bearer_token(&parts.headers), Err(AuthError::InvalidAuthHeader)),
                "{value} should be rejected"
            );
        }

        let parts = parts_with_header(Some("Bearer abc.def"));
        assert_eq!(bearer_token(&parts.headers).unwrap(), "abc.def");
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let (state, identity, _) = AppState::in_memory();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn auth_extractor_resolves_token_with_provider() {
        let (state, identity, _) = AppState::in_memory();
        let (user, token) = identity.register("ada@example.com", "secret1");
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let Auth(authenticated) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("token is valid");
        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.email, "ada@example.com");
        assert_eq!(authenticated.access_token, token);
    }

    #[tokio::test]
    async fn auth_extractor_rejects_unknown_token() {
        let (state, _, _) = AppState::in_memory();
        let mut parts = parts_with_header(Some("Bearer not-a-session"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn provider_outage_is_an_internal_error() {
        let (state, identity, _) = AppState::in_memory();
        let (_, token) = identity.register("ada@example.com", "secret1");
        identity.set_unavailable(true);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, identity, _) = AppState::in_memory();
        let mut parts = parts_with_header(None);
        parts.extensions.insert(AuthenticatedUser::new(
            ProviderUser {
                id: "user_from_middleware".into(),
                email: None,
            },
            "token",
        ));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, "user_from_middleware");
        assert_eq!(identity.calls(), 0);
    }
}
