//! Environment-aware storage router.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, warn};

use super::config::StorageConfig;
use super::content_type::content_type_for;
use super::environment::Environment;
use super::error::StorageError;
use super::key::{Disambiguator, KeyBuilder, key_filename, recover_filename};
use super::location::{parse_object_url, public_url};
use super::store::{ObjectStore, OpendalStore};

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Object was written; `url` is its public address.
    Uploaded {
        /// Public HTTPS URL.
        url: String,
        /// Storage key.
        key: String,
        /// Content type sent with the object.
        content_type: String,
    },
    /// Local environment: nothing was sent anywhere.
    Skipped {
        /// Key the object would have been stored under.
        key: String,
        /// Content type it would have been sent with.
        content_type: String,
    },
}

impl UploadOutcome {
    /// Public URL, `None` when the upload was skipped.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uploaded { url, .. } => Some(url),
            Self::Skipped { .. } => None,
        }
    }

    /// Computed storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Uploaded { key, .. } | Self::Skipped { key, .. } => key,
        }
    }

    /// Computed content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        match self {
            Self::Uploaded { content_type, .. } | Self::Skipped { content_type, .. } => {
                content_type
            }
        }
    }

    /// Whether the upload was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Downloaded object with its recovered filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedObject {
    /// Filename with the disambiguator removed.
    pub filename: String,
    /// Raw payload.
    pub data: Vec<u8>,
}

impl DownloadedObject {
    /// Payload as standard padded base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// Router for the `local` environment: builds keys, never talks to a store.
#[derive(Debug, Clone)]
pub struct LocalRouter {
    keys: KeyBuilder,
}

impl LocalRouter {
    /// Compute key and content type, log the skip, return [`UploadOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if no key can be built.
    pub fn upload(
        &self,
        filename: &str,
        category: &str,
        subpath: &str,
    ) -> Result<UploadOutcome, StorageError> {
        let key = self.keys.build(filename, category, subpath)?;
        let content_type = content_type_for(filename);

        info!(
            environment = %self.keys.environment(),
            key = %key,
            content_type = %content_type,
            "upload skipped: local environment"
        );

        Ok(UploadOutcome::Skipped { key, content_type })
    }
}

/// Router for environments with a bucket and an object store.
#[derive(Clone)]
pub struct RemoteRouter {
    keys: KeyBuilder,
    bucket: &'static str,
    region: String,
    store: Arc<dyn ObjectStore>,
}

impl RemoteRouter {
    /// Bucket all uploads go to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.bucket
    }

    /// Region used in public URLs.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Put the object and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if no key can be built and
    /// [`StorageError::UploadFailed`] if the store rejects the put.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        category: &str,
        subpath: &str,
    ) -> Result<UploadOutcome, StorageError> {
        let key = self.keys.build(filename, category, subpath)?;
        let content_type = content_type_for(filename);
        let size = data.len();

        if let Err(source) = self.store.put(self.bucket, &key, data, &content_type).await {
            warn!(bucket = %self.bucket, key = %key, error = %source, "upload failed");
            return Err(StorageError::UploadFailed { key, source });
        }

        let url = public_url(self.bucket, &self.region, &key);
        debug!(
            bucket = %self.bucket,
            key = %key,
            size,
            content_type = %content_type,
            "uploaded object"
        );

        Ok(UploadOutcome::Uploaded {
            url,
            key,
            content_type,
        })
    }

    /// Fetch the object behind `url` and recover its original filename.
    ///
    /// The bucket comes from the URL, not from this router.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUrl`] for unparseable URLs and
    /// [`StorageError::DownloadFailed`] if the store rejects the get.
    pub async fn download_bytes(&self, url: &str) -> Result<DownloadedObject, StorageError> {
        let location = parse_object_url(url)?;

        let data = match self.store.get(&location.bucket, &location.key).await {
            Ok(data) => data,
            Err(source) => {
                warn!(
                    bucket = %location.bucket,
                    key = %location.key,
                    error = %source,
                    "download failed"
                );
                return Err(StorageError::DownloadFailed {
                    bucket: location.bucket,
                    key: location.key,
                    source,
                });
            }
        };

        let filename = recover_filename(key_filename(&location.key));
        debug!(
            bucket = %location.bucket,
            key = %location.key,
            size = data.len(),
            "downloaded object"
        );

        Ok(DownloadedObject { filename, data })
    }
}

impl fmt::Debug for RemoteRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteRouter")
            .field("keys", &self.keys)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Routes uploads and downloads for one deployment environment.
///
/// ```
/// use movomint_core::storage::{StorageConfig, StorageRouter};
///
/// let router = StorageRouter::from_config(StorageConfig::new("local"))?;
/// assert!(router.is_local());
/// assert_eq!(router.bucket(), None);
/// # Ok::<(), movomint_core::storage::StorageError>(())
/// ```
#[derive(Debug, Clone)]
pub enum StorageRouter {
    /// No store, uploads skipped.
    Local(LocalRouter),
    /// Bucket and store configured.
    Remote(RemoteRouter),
}

impl StorageRouter {
    /// Build a router, using OpenDAL's S3 service for remote environments.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidEnvironment`] for unknown environments
    /// and [`StorageError::Configuration`] if the S3 client cannot be built.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let environment: Environment = config.environment.parse()?;
        let Some(bucket) = environment.bucket() else {
            return Ok(Self::local());
        };

        let store = OpendalStore::from_config(&config);
        store.warm(bucket)?;
        info!(%environment, bucket, region = %config.region, "object storage configured");

        let router = Self::with_store(environment.as_str(), Arc::new(store))?;
        Ok(router.with_region(config.region))
    }

    /// Build a router around an existing store. The store is dropped for `local`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidEnvironment`] for unknown environments.
    pub fn with_store(
        environment: &str,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self, StorageError> {
        let environment: Environment = environment.parse()?;
        let keys = KeyBuilder::new(environment);

        Ok(match environment.bucket() {
            None => Self::Local(LocalRouter { keys }),
            Some(bucket) => Self::Remote(RemoteRouter {
                keys,
                bucket,
                region: StorageConfig::DEFAULT_REGION.to_string(),
                store,
            }),
        })
    }

    /// Router for the `local` environment.
    #[must_use]
    pub fn local() -> Self {
        Self::Local(LocalRouter {
            keys: KeyBuilder::new(Environment::Local),
        })
    }

    /// Override the region used in public URLs. No effect on `local`.
    #[must_use]
    pub fn with_region(self, region: impl Into<String>) -> Self {
        match self {
            Self::Remote(remote) => Self::Remote(RemoteRouter {
                region: region.into(),
                ..remote
            }),
            local @ Self::Local(_) => local,
        }
    }

    /// Replace the disambiguator source.
    #[must_use]
    pub fn with_disambiguator(self, disambiguator: Arc<dyn Disambiguator>) -> Self {
        match self {
            Self::Local(local) => Self::Local(LocalRouter {
                keys: local.keys.with_disambiguator(disambiguator),
            }),
            Self::Remote(remote) => Self::Remote(RemoteRouter {
                keys: remote.keys.with_disambiguator(disambiguator),
                ..remote
            }),
        }
    }

    /// Environment this router serves.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.keys().environment()
    }

    /// Bucket for remote environments.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::Local(_) => None,
            Self::Remote(remote) => Some(remote.bucket()),
        }
    }

    /// Region for remote environments.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Local(_) => None,
            Self::Remote(remote) => Some(remote.region()),
        }
    }

    /// Whether uploads are skipped.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    fn keys(&self) -> &KeyBuilder {
        match self {
            Self::Local(local) => &local.keys,
            Self::Remote(remote) => &remote.keys,
        }
    }

    /// Build a storage key without uploading anything.
    ///
    /// # Errors
    ///
    /// See [`KeyBuilder::build`].
    pub fn build_key(
        &self,
        filename: &str,
        category: &str,
        subpath: &str,
    ) -> Result<String, StorageError> {
        self.keys().build(filename, category, subpath)
    }

    /// Upload `data`, or skip it in `local`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if no key can be built and
    /// [`StorageError::UploadFailed`] if the store rejects the put.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        category: &str,
        subpath: &str,
    ) -> Result<UploadOutcome, StorageError> {
        match self {
            Self::Local(local) => local.upload(filename, category, subpath),
            Self::Remote(remote) => remote.upload(data, filename, category, subpath).await,
        }
    }

    /// Download an object by its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnsupportedInLocalEnvironment`] in `local`,
    /// otherwise see [`RemoteRouter::download_bytes`].
    pub async fn download_bytes(&self, url: &str) -> Result<DownloadedObject, StorageError> {
        match self {
            Self::Local(_) => Err(StorageError::UnsupportedInLocalEnvironment),
            Self::Remote(remote) => remote.download_bytes(url).await,
        }
    }

    /// Download an object and return `(original filename, base64 payload)`.
    ///
    /// # Errors
    ///
    /// Same as [`StorageRouter::download_bytes`].
    pub async fn download(&self, url: &str) -> Result<(String, String), StorageError> {
        let object = self.download_bytes(url).await?;
        let encoded = object.to_base64();
        Ok((object.filename, encoded))
    }
}
