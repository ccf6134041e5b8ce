//! Configuration module
//!
//! Typed configuration for the content store and the batch pipeline. Values are
//! read from the process environment (and an optional `.env` file) only by the
//! CLI; libraries receive the resulting structs through their constructors.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_S3_REGION};
use crate::storage_types::StorageBackend;

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: String, value: String },
}

/// What the transformer does with a format token it does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPolicy {
    /// Encode as WebP and log a warning
    #[default]
    FallbackToWebp,
    /// Fail the item with `InvalidFormat`
    Reject,
}

impl FromStr for FormatPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fallback" | "webp" => Ok(FormatPolicy::FallbackToWebp),
            "reject" => Ok(FormatPolicy::Reject),
            _ => Err(anyhow::anyhow!("Invalid format policy: {}", s)),
        }
    }
}

/// Content store configuration
#[derive(Clone, Default)]
pub struct StorageConfig {
    pub backend: Option<StorageBackend>,
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, R2 with a custom domain, etc.)
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub local_storage_path: Option<String>,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "***"))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("local_storage_path", &self.local_storage_path)
            .finish()
    }
}

impl StorageConfig {
    pub fn backend(&self) -> StorageBackend {
        self.backend.unwrap_or(StorageBackend::S3)
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_S3_REGION)
    }

    /// S3 endpoint: explicit override first, then the R2 account endpoint.
    pub fn s3_endpoint(&self) -> Option<String> {
        self.endpoint.clone().or_else(|| {
            self.account_id
                .as_ref()
                .map(|id| format!("https://{}.r2.cloudflarestorage.com", id))
        })
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    /// Names of every variable the selected backend needs but does not have.
    pub fn missing_vars(&self) -> Vec<String> {
        let mut missing = Vec::new();
        match self.backend() {
            StorageBackend::S3 => {
                if self.endpoint.is_none() && self.account_id.is_none() {
                    missing.push("ACCOUNT_ID".to_string());
                }
                if self.access_key_id.is_none() {
                    missing.push("ACCESS_KEY".to_string());
                }
                if self.secret_access_key.is_none() {
                    missing.push("SECRET_KEY".to_string());
                }
                if self.bucket.is_none() {
                    missing.push("BUCKET".to_string());
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    missing.push("LOCAL_STORAGE_PATH".to_string());
                }
            }
            StorageBackend::Memory => {}
        }
        missing
    }
}

/// Top-level configuration for a batch run
#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageConfig,
    pub concurrency: usize,
    pub format_policy: FormatPolicy,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// All missing required variables are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = match get("STORAGE_BACKEND") {
            Some(value) => Some(value.parse::<StorageBackend>().map_err(|_| {
                ConfigError::Invalid {
                    var: "STORAGE_BACKEND".to_string(),
                    value,
                }
            })?),
            None => None,
        };

        let concurrency = match get("BATCH_CONCURRENCY") {
            Some(value) => value.parse::<usize>().map_err(|_| ConfigError::Invalid {
                var: "BATCH_CONCURRENCY".to_string(),
                value,
            })?,
            None => DEFAULT_CONCURRENCY,
        };

        let format_policy = match get("FORMAT_POLICY") {
            Some(value) => value
                .parse::<FormatPolicy>()
                .map_err(|_| ConfigError::Invalid {
                    var: "FORMAT_POLICY".to_string(),
                    value,
                })?,
            None => FormatPolicy::default(),
        };

        let storage = StorageConfig {
            backend,
            account_id: get("ACCOUNT_ID"),
            access_key_id: get("ACCESS_KEY"),
            secret_access_key: get("SECRET_KEY"),
            bucket: get("BUCKET"),
            endpoint: get("S3_ENDPOINT"),
            region: get("S3_REGION"),
            local_storage_path: get("LOCAL_STORAGE_PATH"),
        };

        let missing = storage.missing_vars();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Config {
            storage,
            concurrency,
            format_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_reports_all_missing_s3_vars() {
        let err = Config::from_lookup(lookup(&[("ACCESS_KEY", "ak")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![
                "ACCOUNT_ID".to_string(),
                "SECRET_KEY".to_string(),
                "BUCKET".to_string(),
            ])
        );
        assert_eq!(
            err.to_string(),
            "Missing environment variables: ACCOUNT_ID, SECRET_KEY, BUCKET"
        );
    }

    #[test]
    fn test_r2_endpoint_from_account_id() {
        let config = Config::from_lookup(lookup(&[
            ("ACCOUNT_ID", "abc123"),
            ("ACCESS_KEY", "ak"),
            ("SECRET_KEY", "sk"),
            ("BUCKET", "images"),
        ]))
        .unwrap();

        assert_eq!(config.storage.backend(), StorageBackend::S3);
        assert_eq!(
            config.storage.s3_endpoint().as_deref(),
            Some("https://abc123.r2.cloudflarestorage.com")
        );
        assert_eq!(config.storage.region(), "auto");
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.format_policy, FormatPolicy::FallbackToWebp);
    }

    #[test]
    fn test_explicit_endpoint_replaces_account_id() {
        let config = Config::from_lookup(lookup(&[
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("ACCESS_KEY", "ak"),
            ("SECRET_KEY", "sk"),
            ("BUCKET", "images"),
            ("S3_REGION", "us-east-1"),
        ]))
        .unwrap();

        assert_eq!(
            config.storage.s3_endpoint().as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.storage.region(), "us-east-1");
    }

    #[test]
    fn test_local_backend_requires_path() {
        let err = Config::from_lookup(lookup(&[("STORAGE_BACKEND", "local")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["LOCAL_STORAGE_PATH".to_string()])
        );
    }

    #[test]
    fn test_memory_backend_and_tuning() {
        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("BATCH_CONCURRENCY", "8"),
            ("FORMAT_POLICY", "reject"),
        ]))
        .unwrap();

        assert_eq!(config.storage.backend(), StorageBackend::Memory);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.format_policy, FormatPolicy::Reject);
    }

    #[test]
    fn test_invalid_concurrency() {
        let err = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("BATCH_CONCURRENCY", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "BATCH_CONCURRENCY"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let storage = StorageConfig {
            access_key_id: Some("ak-secret".to_string()),
            secret_access_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", storage);
        assert!(!rendered.contains("ak-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
