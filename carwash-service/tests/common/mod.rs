#![allow(dead_code)]

use carwash_service::config::{
    CarwashConfig, Environment, JwtConfig, MongoConfig, ReceiptConfig,
};
use carwash_service::models::{Employee, Role};
use carwash_service::services::CarwashDb;
use carwash_service::startup::Application;
use carwash_service::utils::{hash_password, Password};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "wash-and-wax";

pub fn test_config(db_name: &str) -> CarwashConfig {
    let uri = std::env::var("TEST_MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    CarwashConfig {
        common: CoreConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
        },
        environment: Environment::Dev,
        service_name: "carwash-service-test".to_string(),
        log_level: "warn".to_string(),
        otlp_endpoint: None,
        mongodb: MongoConfig {
            uri,
            database: db_name.to_string(),
            server_selection_timeout_secs: 2,
        },
        jwt: JwtConfig {
            secret: Secret::new("test-secret".to_string()),
            expiry_days: 1,
        },
        receipt: ReceiptConfig::default(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: CarwashDb,
    pub db_name: String,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("carwash_test_{}", Uuid::new_v4().simple());

        let app = Application::build(test_config(&db_name))
            .await
            .expect("Failed to build test application (is MongoDB running?)");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/ready", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Register a user through the API and return a bearer token for it.
    pub async fn user_token(&self) -> String {
        let email = format!("{}@example.com", Uuid::new_v4().simple());

        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "name": "Test Admin", "email": email, "password": TEST_PASSWORD, "role": "admin" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 201);

        self.login(&email).await["token"]
            .as_str()
            .expect("login response has a token")
            .to_string()
    }

    /// Seed an employee directly and log in as them.
    pub async fn employee_token(&self, name: &str) -> (String, String) {
        let email = format!("{}@example.com", Uuid::new_v4().simple());
        let hash = hash_password(&Password::new(TEST_PASSWORD.to_string()))
            .expect("Failed to hash password");
        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.clone(),
            password_hash: hash.into_string(),
            role: Role::Staff,
        };
        self.db
            .employees()
            .insert_one(&employee, None)
            .await
            .expect("Failed to seed employee");

        let body = self.login(&email).await;
        assert_eq!(body["type"], "Employee");
        (
            employee.id,
            body["token"].as_str().expect("token").to_string(),
        )
    }

    pub async fn login(&self, email: &str) -> Value {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": TEST_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 200);
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_json(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn count(&self, collection: &str) -> u64 {
        self.db
            .database()
            .collection::<mongodb::bson::Document>(collection)
            .count_documents(None, None)
            .await
            .expect("Failed to count documents")
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
