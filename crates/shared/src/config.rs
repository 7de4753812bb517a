//! Application configuration management.

use serde::Deserialize;

pub use config::ConfigError;

/// Environment variable holding the AWS access key ID.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the AWS secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Object storage configuration.
    pub storage: StorageSettings,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Deployment environment: `local`, `dev`, `stage` or `prod`.
    ///
    /// Kept as a raw string; validation happens when the storage router is built.
    pub environment: String,
    /// AWS region the buckets live in.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom S3 endpoint. `None` uses the provider default.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access credentials passed to the object store client.
    #[serde(default)]
    pub credentials: Credentials,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Object store credentials.
///
/// Missing values are passed through to the store client as-is; nothing here
/// checks that they are present or well formed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Access key ID.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl Credentials {
    /// Create credentials from explicit values.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
        }
    }

    /// Reads `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            access_key_id: std::env::var(ACCESS_KEY_ID_VAR).ok(),
            secret_access_key: std::env::var(SECRET_ACCESS_KEY_VAR).ok(),
        }
    }

    /// Fill in any missing value from `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            access_key_id: self.access_key_id.or(other.access_key_id),
            secret_access_key: self.secret_access_key.or(other.secret_access_key),
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "***"))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, config files and environment variables.
    ///
    /// Sources, later ones winning:
    /// 1. `config/default` and `config/{RUN_MODE}` (optional)
    /// 2. `MOVOMINT__*` variables, e.g. `MOVOMINT__STORAGE__ENVIRONMENT=stage`
    /// 3. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` for credentials not set above
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MOVOMINT").separator("__"))
            .build()?;

        let mut app: Self = config.try_deserialize()?;
        app.storage.credentials = app.storage.credentials.or(Credentials::from_env());
        Ok(app)
    }
}
