use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

/// Which collection an actor lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    User,
    Employee,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::User => write!(f, "User"),
            ActorKind::Employee => write!(f, "Employee"),
        }
    }
}

/// Reference to the actor who recorded something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: String,
    pub kind: ActorKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Shop staff provisioned out of band; they can log in like users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
}

/// The caller attached to a request by the bearer middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub kind: ActorKind,
}

impl AuthenticatedActor {
    pub fn actor_ref(&self) -> ActorRef {
        ActorRef {
            id: self.id.clone(),
            kind: self.kind,
        }
    }
}
