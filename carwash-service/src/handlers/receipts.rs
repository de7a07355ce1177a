use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use service_core::error::AppError;

use crate::dtos::receipts::ReceiptRequest;
use crate::services::receipt::RECEIPT_CONTENT_TYPE;
use crate::services::{ReceiptInput, RenderedReceipt};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn render_receipt(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ReceiptRequest>,
) -> Result<Response, AppError> {
    let input = ReceiptInput::try_from(req)?;
    let receipt = state.receipts.render(&input).await?;
    Ok(receipt_response(receipt))
}

/// HTML download response for a rendered receipt.
pub fn receipt_response(receipt: RenderedReceipt) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, RECEIPT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", receipt.filename),
            ),
        ],
        receipt.html,
    )
        .into_response()
}
