use super::actors::ActorDirectory;
use super::error::ServiceError;
use super::jwt::JwtService;
use crate::models::{ActorKind, AuthenticatedActor, Role, User};
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub actor: AuthenticatedActor,
    pub email: String,
    pub token: String,
}

/// Login for both users and employees, and user registration.
#[derive(Clone)]
pub struct AuthService {
    actors: ActorDirectory,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(actors: ActorDirectory, jwt: JwtService) -> Self {
        Self { actors, jwt }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: Password,
        role: Role,
    ) -> Result<User, ServiceError> {
        let email = normalize_email(email);
        if self.actors.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&password)?;
        let user = User::new(
            name.trim().to_string(),
            email,
            password_hash.into_string(),
            role,
        );
        self.actors.create_user(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Users are checked first; an employee with the same email is only
    /// reached when no user has it.
    pub async fn login(&self, email: &str, password: Password) -> Result<LoginResult, ServiceError> {
        let email = normalize_email(email);

        let found = if let Some(user) = self.actors.find_user_by_email(&email).await? {
            Some((user.id, user.name, user.role, user.password_hash, ActorKind::User))
        } else {
            self.actors
                .find_employee_by_email(&email)
                .await?
                .map(|e| (e.id, e.name, e.role, e.password_hash, ActorKind::Employee))
        };

        let Some((id, name, role, password_hash, kind)) = found else {
            tracing::warn!("Login rejected: unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if verify_password(&password, &PasswordHashString::new(password_hash)).is_err() {
            tracing::warn!(actor_id = %id, "Login rejected: wrong password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let actor = AuthenticatedActor { id, name, role, kind };
        let token = self.jwt.generate_token(&actor)?;
        tracing::info!(actor_id = %actor.id, kind = %actor.kind, "Login succeeded");

        Ok(LoginResult { actor, email, token })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_compare_case_insensitively() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
