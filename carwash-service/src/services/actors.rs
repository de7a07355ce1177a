use std::collections::HashMap;

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use super::database::CarwashDb;
use super::error::{conflict_on_duplicate, ServiceError};
use crate::models::{ActorKind, ActorRef, Employee, User};

/// Display fields for whoever recorded a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Read access to the two actor collections, plus user registration.
#[derive(Clone)]
pub struct ActorDirectory {
    users: Collection<User>,
    employees: Collection<Employee>,
}

impl ActorDirectory {
    pub fn new(db: &CarwashDb) -> Self {
        Self {
            users: db.users(),
            employees: db.employees(),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    pub async fn find_employee_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Employee>, ServiceError> {
        Ok(self.employees.find_one(doc! { "email": email }, None).await?)
    }

    pub async fn create_user(&self, user: &User) -> Result<(), ServiceError> {
        self.users
            .insert_one(user, None)
            .await
            .map_err(|e| conflict_on_duplicate(e, "Email already registered"))?;
        Ok(())
    }

    pub async fn exists(&self, actor: &ActorRef) -> Result<bool, ServiceError> {
        let filter = doc! { "_id": actor.id.as_str() };
        let found = match actor.kind {
            ActorKind::User => self.users.find_one(filter, None).await?.is_some(),
            ActorKind::Employee => self.employees.find_one(filter, None).await?.is_some(),
        };
        Ok(found)
    }

    /// Look up creator display fields by id, users first, then employees.
    pub async fn creators(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, CreatorSummary>, ServiceError> {
        let mut found = HashMap::new();
        if ids.is_empty() {
            return Ok(found);
        }

        let users: Vec<User> = self
            .users
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?
            .try_collect()
            .await?;
        for user in users {
            found.insert(
                user.id.clone(),
                CreatorSummary {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                },
            );
        }

        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found.contains_key(*id))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(found);
        }

        let employees: Vec<Employee> = self
            .employees
            .find(doc! { "_id": { "$in": missing } }, None)
            .await?
            .try_collect()
            .await?;
        for employee in employees {
            found.insert(
                employee.id.clone(),
                CreatorSummary {
                    id: employee.id,
                    name: employee.name,
                    email: employee.email,
                },
            );
        }

        Ok(found)
    }
}
