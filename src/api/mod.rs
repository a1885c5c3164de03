// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::FromRequest,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    error::ApiError,
    models::{RecordId, Session, Transaction, TransactionType, UserSummary},
    state::AppState,
    validation::{CreateTransactionRequest, CredentialsRequest, FieldError},
};

pub mod auth;
pub mod health;
pub mod transactions;

/// JSON body extractor whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Endpoints {
    pub auth: String,
    pub transactions: String,
    pub docs: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Personal Finance Tracker API is running!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            auth: "/api/auth".to_string(),
            transactions: "/api/transactions".to_string(),
            docs: "/docs".to_string(),
        },
    })
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/user", get(auth::current_user));

    let protected_routes = Router::new()
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/api/transactions/{id}",
            delete(transactions::delete_transaction),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        health::health,
        health::readiness,
        auth::signup,
        auth::login,
        auth::logout,
        auth::current_user,
        transactions::list_transactions,
        transactions::create_transaction,
        transactions::delete_transaction
    ),
    components(
        schemas(
            RootResponse,
            Endpoints,
            UserSummary,
            Session,
            Transaction,
            TransactionType,
            RecordId,
            CredentialsRequest,
            CreateTransactionRequest,
            FieldError,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            auth::SignupResponse,
            auth::LoginResponse,
            auth::MessageResponse,
            auth::CurrentUserResponse,
            transactions::TransactionListResponse,
            transactions::CreateTransactionResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Auth", description = "Signup, login and session management"),
        (name = "Transactions", description = "Income and expense records of the current user")
    )
)]
struct ApiDoc;
