//! Storage key construction and filename recovery.
//!
//! Key format: `<env>/<category>/[<subpath>/]<stem>-<disambiguator><ext>`
//!
//! ```text
//! stage/ingested/report-a1b2c3d4.csv
//! prod/generated/pick-tickets/pt-0001-9f8e7d6c.pdf
//! ```

use std::fmt;
use std::sync::Arc;

use super::environment::Environment;
use super::error::StorageError;

/// Length of the hex token appended to every stem.
pub const DISAMBIGUATOR_LEN: usize = 8;

/// Source of the random token that keeps keys for the same filename apart.
///
/// Uniqueness is probabilistic (32 bits); collisions are not checked.
pub trait Disambiguator: fmt::Debug + Send + Sync {
    /// Produce a fresh token of [`DISAMBIGUATOR_LEN`] lowercase hex characters.
    fn generate(&self) -> String;
}

/// Thread-local RNG backed tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDisambiguator;

impl Disambiguator for RandomDisambiguator {
    fn generate(&self) -> String {
        format!("{:08x}", rand::random::<u32>())
    }
}

/// Always returns the same token. Useful when keys must be reproducible.
#[derive(Debug, Clone)]
pub struct FixedDisambiguator(String);

impl FixedDisambiguator {
    /// Create a fixed source.
    ///
    /// # Errors
    ///
    /// Returns an error unless `token` is exactly 8 lowercase hex characters.
    pub fn new(token: impl Into<String>) -> Result<Self, StorageError> {
        let token = token.into();
        if !is_disambiguator(&token) {
            return Err(StorageError::invalid_key(format!(
                "disambiguator '{token}' is not {DISAMBIGUATOR_LEN} lowercase hex characters"
            )));
        }
        Ok(Self(token))
    }
}

impl Disambiguator for FixedDisambiguator {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

fn is_disambiguator(token: &str) -> bool {
    token.len() == DISAMBIGUATOR_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Builds keys for one environment.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    environment: Environment,
    disambiguator: Arc<dyn Disambiguator>,
}

impl KeyBuilder {
    /// Create a builder using [`RandomDisambiguator`].
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            disambiguator: Arc::new(RandomDisambiguator),
        }
    }

    /// Replace the disambiguator source.
    #[must_use]
    pub fn with_disambiguator(mut self, disambiguator: Arc<dyn Disambiguator>) -> Self {
        self.disambiguator = disambiguator;
        self
    }

    /// Environment written as the first key segment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Build a key for `filename` under `category` and an optional `subpath`.
    ///
    /// Leading and trailing slashes are stripped from `category` and
    /// `subpath`; an empty `subpath` is left out of the key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if `filename` is empty or contains
    /// `/`, if `category`/`subpath` would produce an empty, `.` or `..`
    /// segment, or if the disambiguator returns a malformed token.
    pub fn build(
        &self,
        filename: &str,
        category: &str,
        subpath: &str,
    ) -> Result<String, StorageError> {
        if filename.is_empty() {
            return Err(StorageError::invalid_key("filename is empty"));
        }
        if filename.contains('/') {
            return Err(StorageError::invalid_key(format!(
                "filename '{filename}' contains '/'"
            )));
        }

        let category = trim_segment("category", category)?;
        if category.is_empty() {
            return Err(StorageError::invalid_key("category is empty"));
        }
        let subpath = trim_segment("subpath", subpath)?;

        let (stem, ext) = split_filename(filename);
        let token = self.disambiguator.generate();
        if !is_disambiguator(&token) {
            return Err(StorageError::invalid_key(format!(
                "disambiguator produced '{token}', expected {DISAMBIGUATOR_LEN} lowercase hex characters"
            )));
        }
        let unique = format!("{stem}-{token}{ext}");

        let mut parts = vec![self.environment.as_str(), category];
        if !subpath.is_empty() {
            parts.push(subpath);
        }
        parts.push(&unique);
        Ok(parts.join("/"))
    }
}

/// Strip outer slashes and reject empty inner segments like `a//b`.
///
/// `.` and `..` are rejected too: URL parsers resolve them, so the key in a
/// public URL would no longer name the stored object.
fn trim_segment<'a>(field: &str, value: &'a str) -> Result<&'a str, StorageError> {
    let trimmed = value.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(trimmed);
    }
    for segment in trimmed.split('/') {
        match segment {
            "" => {
                return Err(StorageError::invalid_key(format!(
                    "{field} '{value}' contains an empty path segment"
                )));
            }
            "." | ".." => {
                return Err(StorageError::invalid_key(format!(
                    "{field} '{value}' contains a '{segment}' path segment"
                )));
            }
            _ => {}
        }
    }
    Ok(trimmed)
}

/// Split a filename at its last dot into `(stem, extension)`.
///
/// The extension keeps its dot. Leading dots belong to the stem, so `.env`
/// has no extension.
///
/// ```
/// use movomint_core::storage::split_filename;
///
/// assert_eq!(split_filename("invoice.pdf"), ("invoice", ".pdf"));
/// assert_eq!(split_filename("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_filename("README"), ("README", ""));
/// assert_eq!(split_filename(".env"), (".env", ""));
/// ```
#[must_use]
pub fn split_filename(name: &str) -> (&str, &str) {
    let body_start = name.len() - name.trim_start_matches('.').len();
    match name[body_start..].rfind('.') {
        Some(idx) => name.split_at(body_start + idx),
        None => (name, ""),
    }
}

/// Recover the original filename from the last segment of a key.
///
/// Strips `-<8 hex>` from the end of the stem. Segments that do not carry a
/// disambiguator are returned unchanged.
///
/// ```
/// use movomint_core::storage::recover_filename;
///
/// assert_eq!(recover_filename("invoice-a1b2c3d4.pdf"), "invoice.pdf");
/// assert_eq!(recover_filename("notes.txt"), "notes.txt");
/// ```
#[must_use]
pub fn recover_filename(segment: &str) -> String {
    let (stem, ext) = split_filename(segment);
    match stem.rsplit_once('-') {
        Some((name, token)) if !name.is_empty() && is_disambiguator(token) => {
            format!("{name}{ext}")
        }
        _ => segment.to_string(),
    }
}

/// Last `/`-separated segment of a key.
#[must_use]
pub fn key_filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
