use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::models::AuthenticatedActor;
use crate::startup::AppState;

/// Require a valid bearer token and attach the actor it names to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
        })?;

    let actor = state.jwt.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bearer token");
        AppError::InvalidToken(e)
    })?;

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

/// The authenticated actor, for handlers behind [`auth_middleware`].
pub struct AuthActor(pub AuthenticatedActor);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<AuthenticatedActor>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Authentication required")))?;

        Ok(AuthActor(actor))
    }
}
