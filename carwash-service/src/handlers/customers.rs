use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::customers::{
    CreateCustomerRequest, CustomerResponse, ResolveCustomerRequest, ResolveCustomerResponse,
    SearchParams, UpdateCustomerRequest,
};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.customers.list().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Autocomplete suggestions; not used for resolution.
pub async fn search_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let query = params.name.unwrap_or_default();
    let customers = state.customers.search_by_name(&query).await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

pub async fn resolve_customer(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResolveCustomerRequest>,
) -> Result<(StatusCode, Json<ResolveCustomerResponse>), AppError> {
    let resolved = state
        .customers
        .resolve(&req.name, &req.vehicle_details)
        .await?;

    let status = if resolved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(resolved.into())))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state
        .customers
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;

    Ok(Json(customer.into()))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let customer = state.customers.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state.customers.update(&id, req.into()).await?;
    Ok(Json(customer.into()))
}
