//! Public object URLs.
//!
//! `https://<bucket>.s3.<region>.amazonaws.com/<percent-encoded key>`

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

use super::error::StorageError;

/// Everything except unreserved characters and `/` gets escaped.
const KEY_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Bucket and key addressed by an object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Decoded storage key.
    pub key: String,
}

/// Build the public virtual-hosted style URL for an object.
///
/// ```
/// use movomint_core::storage::public_url;
///
/// assert_eq!(
///     public_url("movomint-dev", "us-east-1", "dev/ingested/my file-a1b2c3d4.pdf"),
///     "https://movomint-dev.s3.us-east-1.amazonaws.com/dev/ingested/my%20file-a1b2c3d4.pdf"
/// );
/// ```
#[must_use]
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!(
        "https://{bucket}.s3.{region}.amazonaws.com/{}",
        utf8_percent_encode(key, KEY_PATH)
    )
}

/// Split an object URL into bucket (first host label) and decoded key.
///
/// # Errors
///
/// Returns [`StorageError::InvalidUrl`] if the URL cannot be parsed, has no
/// host, has an empty key, or decodes to invalid UTF-8.
pub fn parse_object_url(raw: &str) -> Result<ObjectLocation, StorageError> {
    let parsed = Url::parse(raw).map_err(|e| StorageError::invalid_url(format!("{raw}: {e}")))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| StorageError::invalid_url(format!("{raw}: missing host")))?;
    let bucket = host.split('.').next().unwrap_or(host);
    if bucket.is_empty() {
        return Err(StorageError::invalid_url(format!("{raw}: empty bucket")));
    }

    let key = percent_decode_str(parsed.path().trim_start_matches('/'))
        .decode_utf8()
        .map_err(|e| StorageError::invalid_url(format!("{raw}: {e}")))?;
    if key.is_empty() {
        return Err(StorageError::invalid_url(format!("{raw}: empty key")));
    }

    Ok(ObjectLocation {
        bucket: bucket.to_string(),
        key: key.into_owned(),
    })
}
