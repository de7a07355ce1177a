use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

use crate::dtos::auth::{ActorResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::dtos::MessageResponse;
use crate::middleware::AuthActor;
use crate::startup::AppState;
use crate::utils::{Password, ValidatedJson};

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state
        .auth
        .register(
            &req.name,
            &req.email,
            Password::new(req.password),
            req.role.unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let result = state
        .auth
        .login(&req.email, Password::new(req.password))
        .await?;

    Ok(Json(result.into()))
}

pub async fn me(AuthActor(actor): AuthActor) -> Json<ActorResponse> {
    Json(actor.into())
}
