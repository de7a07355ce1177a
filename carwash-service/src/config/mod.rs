use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEV_JWT_SECRET: &str = "dev_secret_key";
pub const MAX_JWT_EXPIRY_DAYS: i64 = 365;
const DEFAULT_BUSINESS_NAME: &str = "JW Auto Clinic 246";

#[derive(Debug, Clone, Deserialize)]
pub struct CarwashConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub server_selection_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptConfig {
    pub business_name: String,
    pub tagline: String,
    /// Printed in the "Employee" row of every receipt.
    pub employee_label: String,
    pub logo_path: Option<String>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            tagline: "Professional Car Wash & Detailing".to_string(),
            employee_label: DEFAULT_BUSINESS_NAME.to_string(),
            logo_path: None,
        }
    }
}

impl CarwashConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let business_name = get_env("RECEIPT_BUSINESS_NAME", Some(DEFAULT_BUSINESS_NAME), false)?;

        let config = CarwashConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("carwash-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("carwash_db"), is_prod)?,
                server_selection_timeout_secs: parse_env(
                    "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                    "5",
                )?,
            },
            jwt: JwtConfig {
                secret: Secret::new(get_env("JWT_SECRET", Some(DEV_JWT_SECRET), is_prod)?),
                expiry_days: parse_env("JWT_EXPIRY_DAYS", "7")?,
            },
            receipt: ReceiptConfig {
                employee_label: get_env("RECEIPT_EMPLOYEE_LABEL", Some(&business_name), false)?,
                business_name,
                tagline: get_env(
                    "RECEIPT_TAGLINE",
                    Some("Professional Car Wash & Detailing"),
                    false,
                )?,
                logo_path: env::var("RECEIPT_LOGO_PATH").ok().filter(|v| !v.is_empty()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_JWT_EXPIRY_DAYS).contains(&self.jwt.expiry_days) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_EXPIRY_DAYS must be between 1 and {}",
                MAX_JWT_EXPIRY_DAYS
            )));
        }

        if self.environment == Environment::Prod
            && self.jwt.secret.expose_secret() == DEV_JWT_SECRET
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must be changed from the development default in production"
            )));
        }

        if self.jwt.secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not be empty"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(default), false)?
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
