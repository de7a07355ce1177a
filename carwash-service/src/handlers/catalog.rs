use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::catalog::{
    CreateServiceRequest, CreateSpecialRequest, ServiceResponse, SpecialResponse,
    SuccessResponse, UpdateServiceRequest, UpdateSpecialRequest,
};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let services = state.catalog.list_services().await?;
    Ok(Json(services.into_iter().map(Into::into).collect()))
}

pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    let service = state.catalog.create_service(&req.name, req.price).await?;
    Ok((StatusCode::CREATED, Json(service.into())))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service = state
        .catalog
        .update_service(&id, req.name.as_deref(), req.price)
        .await?;
    Ok(Json(service.into()))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.catalog.delete_service(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn list_specials(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpecialResponse>>, AppError> {
    let specials = state.catalog.list_specials().await?;
    Ok(Json(specials.into_iter().map(Into::into).collect()))
}

pub async fn create_special(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSpecialRequest>,
) -> Result<(StatusCode, Json<SpecialResponse>), AppError> {
    let special = state
        .catalog
        .create_special(&req.name, req.discount_percent)
        .await?;
    Ok((StatusCode::CREATED, Json(special.into())))
}

pub async fn update_special(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateSpecialRequest>,
) -> Result<Json<SpecialResponse>, AppError> {
    let special = state
        .catalog
        .update_special(&id, req.name.as_deref(), req.discount_percent)
        .await?;
    Ok(Json(special.into()))
}

pub async fn delete_special(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.catalog.delete_special(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
