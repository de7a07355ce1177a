use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::{ActorKind, AuthenticatedActor, Role};

/// Issues and verifies HS256 bearer tokens for users and employees.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (actor ID)
    pub sub: String,
    pub name: String,
    pub role: Role,
    /// Collection the actor was found in at login
    pub kind: ActorKind,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub jti: String,
}

impl From<Claims> for AuthenticatedActor {
    fn from(claims: Claims) -> Self {
        AuthenticatedActor {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
            kind: claims.kind,
        }
    }
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_days: config.expiry_days,
        }
    }

    pub fn generate_token(&self, actor: &AuthenticatedActor) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = Duration::try_days(self.expiry_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow::anyhow!("Token expiry of {} days is out of range", self.expiry_days))?;

        let claims = Claims {
            sub: actor.id.clone(),
            name: actor.name.clone(),
            role: actor.role,
            kind: actor.kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Verify signature and expiry and return the actor the token was issued to.
    pub fn validate_token(
        &self,
        token: &str,
    ) -> Result<AuthenticatedActor, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn service(secret: &str) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: Secret::new(secret.to_string()),
            expiry_days: 7,
        })
    }

    fn actor() -> AuthenticatedActor {
        AuthenticatedActor {
            id: "emp-1".to_string(),
            name: "Sam".to_string(),
            role: Role::Staff,
            kind: ActorKind::Employee,
        }
    }

    #[test]
    fn issued_token_validates_to_the_same_actor() {
        let jwt = service("test-secret");
        let token = jwt.generate_token(&actor()).unwrap();

        assert_eq!(jwt.validate_token(&token).unwrap(), actor());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = service("one-secret").generate_token(&actor()).unwrap();
        assert!(service("other-secret").validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("test-secret");
        let now = Utc::now();
        let claims = Claims {
            sub: "u-1".into(),
            name: "Ada".into(),
            role: Role::Admin,
            kind: ActorKind::User,
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::days(8)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service("test-secret").validate_token("not-a-token").is_err());
    }

    #[test]
    fn out_of_range_expiry_is_an_error() {
        let jwt = JwtService::new(&JwtConfig {
            secret: Secret::new("test-secret".to_string()),
            expiry_days: i64::MAX,
        });
        assert!(jwt.generate_token(&actor()).is_err());
    }
}
