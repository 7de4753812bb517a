//! Deployment environments and their buckets.

use std::fmt;
use std::str::FromStr;

use super::error::StorageError;

/// Deployment environment.
///
/// `Local` never touches remote storage; every other environment owns exactly
/// one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Developer machine. Uploads are skipped, downloads are unsupported.
    Local,
    /// Shared development environment.
    Dev,
    /// Staging environment.
    Stage,
    /// Production environment.
    Prod,
}

impl Environment {
    /// All environments, in promotion order.
    pub const ALL: [Self; 4] = [Self::Local, Self::Dev, Self::Stage, Self::Prod];

    /// Name used in keys and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Stage => "stage",
            Self::Prod => "prod",
        }
    }

    /// Bucket owned by this environment, `None` for `Local`.
    #[must_use]
    pub const fn bucket(self) -> Option<&'static str> {
        match self {
            Self::Local => None,
            Self::Dev => Some("movomint-dev"),
            Self::Stage => Some("movomint-stage"),
            Self::Prod => Some("movomint-prod"),
        }
    }

    /// Whether this environment skips remote storage.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }
}

impl FromStr for Environment {
    type Err = StorageError;

    /// Exact, case-sensitive match; no trimming or normalization.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| StorageError::invalid_environment(s))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
