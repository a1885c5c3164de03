// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints. Every route sits behind `require_auth` and only
//! ever touches rows owned by the caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{auth::MessageResponse, JsonBody};
use crate::{
    auth::Auth,
    error::ApiError,
    models::Transaction,
    state::AppState,
    validation::CreateTransactionRequest,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    /// The caller's transactions, newest date first.
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTransactionResponse {
    pub message: String,
    pub transaction: Transaction,
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = TransactionListResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Failed to fetch transactions")
    )
)]
pub async fn list_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let transactions = state
        .transactions
        .list_for_owner(&user)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Failed to list transactions");
            ApiError::internal("Failed to fetch transactions")
        })?;

    Ok(Json(TransactionListResponse { transactions }))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = CreateTransactionResponse),
        (status = 400, description = "Invalid transaction"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Failed to create transaction")
    )
)]
pub async fn create_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), ApiError> {
    let new_transaction = request.validate(state.today())?;

    let transaction = state
        .transactions
        .insert(&user, new_transaction)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Failed to create transaction");
            ApiError::internal("Failed to create transaction").with_details(e.details())
        })?;

    tracing::info!(
        user_id = %user.user_id,
        transaction_id = %transaction.id,
        transaction_type = transaction.transaction_type.as_str(),
        "Transaction created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            message: "Transaction created successfully".to_string(),
            transaction,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(
        ("id" = String, Path, description = "Identifier of the transaction to delete")
    ),
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Failed to delete transaction")
    )
)]
pub async fn delete_transaction(
    Auth(user): Auth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state
        .transactions
        .delete_owned(&user, &id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.user_id, transaction_id = %id, error = %e, "Failed to delete transaction");
            ApiError::internal("Failed to delete transaction")
        })?;

    // A foreign or unknown id matches nothing and still reports success.
    tracing::debug!(user_id = %user.user_id, transaction_id = %id, removed, "Transaction delete");

    Ok(Json(MessageResponse::new("Transaction deleted successfully")))
}
