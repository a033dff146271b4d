#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::{S3Settings, S3Storage};
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use catflow_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config.s3_bucket().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("AWS_BUCKETNAME not configured".to_string())
            })?;
            let access_key_id = config.aws_access_key_id().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("AWS_ACCESS_KEY_ID not configured".to_string())
            })?;
            let secret_access_key =
                config
                    .aws_secret_access_key()
                    .map(String::from)
                    .ok_or_else(|| {
                        StorageError::ConfigError(
                            "AWS_SECRET_ACCESS_KEY not configured".to_string(),
                        )
                    })?;

            let storage = S3Storage::new(S3Settings {
                bucket,
                region: config.s3_region().to_string(),
                endpoint_url: config.s3_endpoint().map(String::from),
                access_key_id,
                secret_access_key,
            })?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use catflow_core::config::{BaseConfig, IngestConfig};
    use catflow_core::{AnnouncementFormat, ExchangeKind};

    fn local_config(path: Option<String>) -> Config {
        Config(Box::new(IngestConfig {
            base: BaseConfig {
                server_port: 8000,
                environment: "test".to_string(),
                max_upload_size_bytes: 1024,
                http_concurrency_limit: 10,
            },
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            local_storage_path: path,
            rabbitmq_url: "amqp://localhost".to_string(),
            rabbitmq_exchange: "x".to_string(),
            rabbitmq_exchange_type: ExchangeKind::Topic,
            rabbitmq_routing_keys: vec![],
            announcement_format: AnnouncementFormat::Json,
        }))
    }

    #[tokio::test]
    async fn test_creates_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = local_config(Some(dir.path().to_string_lossy().to_string()));
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_local_backend_without_path_is_config_error() {
        let result = create_storage(&local_config(None)).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
