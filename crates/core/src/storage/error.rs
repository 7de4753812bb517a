//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Environment name is not one of `local`, `dev`, `stage`, `prod`.
    #[error("invalid environment '{value}': expected one of local, dev, stage, prod")]
    InvalidEnvironment {
        /// The rejected value.
        value: String,
    },

    /// Object store rejected or failed a put.
    #[error("upload of '{key}' failed: {source}")]
    UploadFailed {
        /// Storage key that was being written.
        key: String,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// Object store rejected or failed a get.
    #[error("download of '{key}' from bucket '{bucket}' failed: {source}")]
    DownloadFailed {
        /// Bucket parsed from the object URL.
        bucket: String,
        /// Storage key parsed from the object URL.
        key: String,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// Download attempted without a configured object store.
    #[error("cannot download from object storage in the local environment")]
    UnsupportedInLocalEnvironment,

    /// Filename or category cannot form a storage key.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Object URL cannot be parsed into a bucket and key.
    #[error("invalid object url: {0}")]
    InvalidUrl(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an invalid environment error.
    #[must_use]
    pub fn invalid_environment(value: impl Into<String>) -> Self {
        Self::InvalidEnvironment {
            value: value.into(),
        }
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Broad category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Object or bucket does not exist.
    NotFound,
    /// Credentials were rejected.
    PermissionDenied,
    /// Anything else: network, throttling, malformed response.
    Other,
}

/// Failure reported by an [`ObjectStore`](super::ObjectStore) implementation.
///
/// Errors converted from OpenDAL keep the original error as their source.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<opendal::Error>,
}

impl TransportError {
    /// Create a transport error.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error of kind [`TransportErrorKind::Other`].
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    /// The failure category.
    #[must_use]
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Human-readable failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<opendal::Error> for TransportError {
    fn from(err: opendal::Error) -> Self {
        let kind = match err.kind() {
            opendal::ErrorKind::NotFound => TransportErrorKind::NotFound,
            opendal::ErrorKind::PermissionDenied => TransportErrorKind::PermissionDenied,
            _ => TransportErrorKind::Other,
        };
        Self {
            kind,
            message: err.to_string(),
            source: Some(err),
        }
    }
}
