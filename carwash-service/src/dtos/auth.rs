use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{ActorKind, AuthenticatedActor, Role};
use crate::services::LoginResult;
use crate::utils::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "type")]
    pub kind: ActorKind,
    pub token: String,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            id: result.actor.id,
            name: result.actor.name,
            email: result.email,
            role: result.actor.role,
            kind: result.actor.kind,
            token: result.token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(rename = "type")]
    pub kind: ActorKind,
}

impl From<AuthenticatedActor> for ActorResponse {
    fn from(actor: AuthenticatedActor) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            role: actor.role,
            kind: actor.kind,
        }
    }
}
