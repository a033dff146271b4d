//! Configuration module
//!
//! Configuration is read once at startup from the process environment (after
//! loading an optional `.env` file). Every required value is checked here so
//! a misconfigured deployment fails at boot instead of on the first upload.

use std::env;

use crate::models::{AnnouncementFormat, ExchangeKind};
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 8000;
const MAX_UPLOAD_SIZE_MB: usize = 512;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_ROUTING_KEYS: &str = "ingest,detect";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
}

/// Ingest service configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, moto, etc.)
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    // Broker configuration
    pub rabbitmq_url: String,
    pub rabbitmq_exchange: String,
    pub rabbitmq_exchange_type: ExchangeKind,
    pub rabbitmq_routing_keys: Vec<String>,
    pub announcement_format: AnnouncementFormat,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_ingest().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_ingest().base.max_upload_size_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_ingest().base.http_concurrency_limit
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> &str {
        &self.as_ingest().s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.as_ingest().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.as_ingest().aws_secret_access_key.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn rabbitmq_url(&self) -> &str {
        &self.as_ingest().rabbitmq_url
    }

    pub fn rabbitmq_exchange(&self) -> &str {
        &self.as_ingest().rabbitmq_exchange
    }

    pub fn rabbitmq_exchange_type(&self) -> ExchangeKind {
        self.as_ingest().rabbitmq_exchange_type
    }

    pub fn rabbitmq_routing_keys(&self) -> &[String] {
        &self.as_ingest().rabbitmq_routing_keys
    }

    pub fn announcement_format(&self) -> AnnouncementFormat {
        self.as_ingest().announcement_format
    }
}

/// Split a comma-separated list, dropping empty entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse an optional numeric variable. Unset is `None`; set but not a whole
/// number is an error naming the variable.
fn parse_usize(raw: Option<String>, name: &str) -> Result<Option<usize>, anyhow::Error> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a whole number, got '{}'", name, value)),
    }
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            max_upload_size_bytes: parse_usize(var("MAX_UPLOAD_SIZE_MB"), "MAX_UPLOAD_SIZE_MB")?
                .unwrap_or(MAX_UPLOAD_SIZE_MB)
                .checked_mul(1024 * 1024)
                .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?,
            http_concurrency_limit: parse_usize(
                var("HTTP_CONCURRENCY_LIMIT"),
                "HTTP_CONCURRENCY_LIMIT",
            )?
            .unwrap_or(HTTP_CONCURRENCY_LIMIT)
            .max(1),
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let rabbitmq_exchange_type = match var("RABBITMQ_EXCHANGE_TYPE") {
            Some(raw) => raw.parse()?,
            None => ExchangeKind::default(),
        };

        let announcement_format = match var("ANNOUNCEMENT_FORMAT") {
            Some(raw) => raw.parse()?,
            None => AnnouncementFormat::default(),
        };

        let config = IngestConfig {
            base,
            storage_backend,
            s3_bucket: var("AWS_BUCKETNAME").or_else(|| var("S3_BUCKET")),
            s3_region: var("S3_REGION")
                .or_else(|| var("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            s3_endpoint: var("S3_ENDPOINT_URL").filter(|s| !s.is_empty()),
            aws_access_key_id: var("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            rabbitmq_url: var("RABBITMQ_URL")
                .ok_or_else(|| anyhow::anyhow!("RABBITMQ_URL must be set"))?,
            rabbitmq_exchange: var("RABBITMQ_EXCHANGE")
                .ok_or_else(|| anyhow::anyhow!("RABBITMQ_EXCHANGE must be set"))?,
            rabbitmq_exchange_type,
            rabbitmq_routing_keys: split_list(
                &var("RABBITMQ_ROUTING_KEYS").unwrap_or_else(|| DEFAULT_ROUTING_KEYS.to_string()),
            ),
            announcement_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.rabbitmq_url.starts_with("amqp://") || self.rabbitmq_url.starts_with("amqps://"))
        {
            return Err(anyhow::anyhow!(
                "RABBITMQ_URL must be an amqp:// or amqps:// connection string"
            ));
        }

        if self.rabbitmq_exchange.trim().is_empty() {
            return Err(anyhow::anyhow!("RABBITMQ_EXCHANGE cannot be empty"));
        }

        if let Some(bad) = self
            .rabbitmq_routing_keys
            .iter()
            .find(|key| key.chars().any(char::is_whitespace))
        {
            return Err(anyhow::anyhow!(
                "RABBITMQ_ROUTING_KEYS entry '{}' contains whitespace",
                bad
            ));
        }

        if self.base.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "AWS_BUCKETNAME must be set when using S3 storage backend"
                    ));
                }
                if self.aws_access_key_id.is_none() || self.aws_secret_access_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
