use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use service_core::error::AppError;

use super::receipts::receipt_response;
use crate::dtos::transactions::{
    CreateTransactionRequest, EnrichedTransactionResponse, TransactionListParams,
    TransactionResponse,
};
use crate::dtos::MessageResponse;
use crate::middleware::AuthActor;
use crate::services::ReceiptInput;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn create_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ValidatedJson(req): ValidatedJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    tracing::info!(
        actor_id = %actor.id,
        service_type = %req.service_type,
        "Creating transaction"
    );

    let transaction = state.transactions.create(req.into(), &actor).await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// All matching transactions, newest service date first.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Vec<EnrichedTransactionResponse>>, AppError> {
    let transactions = state.transactions.list_enriched(&params.into()).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EnrichedTransactionResponse>, AppError> {
    let transaction = state.transactions.get_enriched(&id).await?;
    Ok(Json(transaction.into()))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.transactions.delete(&id).await?;
    tracing::info!(transaction_id = %id, actor_id = %actor.id, "Transaction deleted by actor");

    Ok(Json(MessageResponse::new("Transaction deleted")))
}

/// Receipt for a stored transaction, dated by its service date.
pub async fn transaction_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let enriched = state.transactions.get_enriched(&id).await?;
    let email = enriched.customer.as_ref().and_then(|c| c.email.clone());
    let input = ReceiptInput::from_transaction(
        &enriched.transaction,
        email,
        enriched.transaction.service_date,
    );

    let receipt = state.receipts.render(&input).await?;
    Ok(receipt_response(receipt))
}
