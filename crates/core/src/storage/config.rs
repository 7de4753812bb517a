//! Storage configuration types.

use movomint_shared::{Credentials, StorageSettings};

/// Storage router configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Environment name, validated when the router is built.
    pub environment: String,
    /// AWS region the buckets live in.
    pub region: String,
    /// Custom S3 endpoint. `None` uses the provider default.
    pub endpoint: Option<String>,
    /// Credentials handed to the object store client untouched.
    pub credentials: Credentials,
}

impl StorageConfig {
    /// Default region for all buckets.
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Create a config for `environment` with default region and no credentials.
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            region: Self::DEFAULT_REGION.to_string(),
            endpoint: None,
            credentials: Credentials::default(),
        }
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set a custom endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            environment: settings.environment.clone(),
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
            credentials: settings.credentials.clone(),
        }
    }
}
