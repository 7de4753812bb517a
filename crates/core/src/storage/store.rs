//! Object store collaborator and its OpenDAL implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use movomint_shared::Credentials;
use opendal::{Operator, services};

use super::config::StorageConfig;
use super::error::{StorageError, TransportError};

/// Put/get by bucket and key.
///
/// Retries, connection pooling, timeouts and credential handling all belong
/// to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` to `bucket/key` with the given content type.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), TransportError>;

    /// Read the full contents of `bucket/key`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, TransportError>;
}

/// S3 store backed by Apache OpenDAL.
///
/// OpenDAL operators are bound to a single bucket, so one is built lazily per
/// bucket and kept for reuse.
pub struct OpendalStore {
    region: String,
    endpoint: String,
    credentials: Credentials,
    operators: DashMap<String, Operator>,
}

impl OpendalStore {
    /// Create a store for `region`.
    ///
    /// Without an explicit endpoint, `https://s3.<region>.amazonaws.com` is used.
    #[must_use]
    pub fn new(region: &str, endpoint: Option<&str>, credentials: Credentials) -> Self {
        let endpoint = endpoint.map_or_else(
            || format!("https://s3.{region}.amazonaws.com"),
            ToString::to_string,
        );
        Self {
            region: region.to_string(),
            endpoint,
            credentials,
            operators: DashMap::new(),
        }
    }

    /// Create a store from router configuration.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            &config.region,
            config.endpoint.as_deref(),
            config.credentials.clone(),
        )
    }

    /// Build the operator for `bucket` ahead of first use.
    ///
    /// # Errors
    ///
    /// Returns an error if OpenDAL rejects the S3 configuration.
    pub fn warm(&self, bucket: &str) -> Result<(), StorageError> {
        self.operator(bucket)
            .map(|_| ())
            .map_err(|e| StorageError::configuration(e.to_string()))
    }

    fn operator(&self, bucket: &str) -> Result<Operator, TransportError> {
        if let Some(op) = self.operators.get(bucket) {
            return Ok(op.clone());
        }

        let mut builder = services::S3::default()
            .bucket(bucket)
            .region(&self.region)
            .endpoint(&self.endpoint);
        if let Some(access_key_id) = &self.credentials.access_key_id {
            builder = builder.access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &self.credentials.secret_access_key {
            builder = builder.secret_access_key(secret_access_key);
        }

        let op = Operator::new(builder)?.finish();
        self.operators.insert(bucket.to_string(), op.clone());
        Ok(op)
    }
}

impl std::fmt::Debug for OpendalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpendalStore")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("buckets", &self.operators.len())
            .finish()
    }
}

#[async_trait]
impl ObjectStore for OpendalStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), TransportError> {
        self.operator(bucket)?
            .write_with(key, body)
            .content_type(content_type)
            .await?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, TransportError> {
        let buffer = self.operator(bucket)?.read(key).await?;
        Ok(buffer.to_vec())
    }
}
