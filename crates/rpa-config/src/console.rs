//! Console configuration module.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! RPA_DATA_DIR=~/.rpa-console              # local storage + backend snapshots
//! RPA_STORAGE_ENDPOINT=https://storage.rpa.local
//! RPA_STORAGE_BUCKET=rpa-console.local
//! RPA_DEFAULT_COUNTRY_CODE=91              # prefixed to national numbers at login
//! ```

use std::env;
use std::path::PathBuf;

use crate::ConfigError;

const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.rpa.local";
const DEFAULT_STORAGE_BUCKET: &str = "rpa-console.local";
const DEFAULT_COUNTRY_CODE: &str = "91";

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Directory holding local storage and backend snapshots
    pub data_dir: PathBuf,
    /// Base URL download links are issued under
    pub storage_endpoint: String,
    /// Bucket name used in download links
    pub storage_bucket: String,
    /// Dialing code for numbers entered without one
    pub default_country_code: String,
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = match env::var("RPA_DATA_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_data_dir()?,
        };

        let storage_endpoint = env::var("RPA_STORAGE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_STORAGE_ENDPOINT.to_string());
        if !storage_endpoint.starts_with("http://") && !storage_endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "RPA_STORAGE_ENDPOINT".to_string(),
                value: storage_endpoint,
            });
        }

        let storage_bucket =
            env::var("RPA_STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_STORAGE_BUCKET.to_string());
        if storage_bucket.is_empty() || storage_bucket.contains('/') {
            return Err(ConfigError::InvalidValue {
                var: "RPA_STORAGE_BUCKET".to_string(),
                value: storage_bucket,
            });
        }

        let default_country_code = env::var("RPA_DEFAULT_COUNTRY_CODE")
            .unwrap_or_else(|_| DEFAULT_COUNTRY_CODE.to_string());
        let code = default_country_code.trim_start_matches('+');
        let valid_code = (1..=3).contains(&code.len())
            && code.chars().all(|c| c.is_ascii_digit())
            && !code.starts_with('0');
        if !valid_code {
            return Err(ConfigError::InvalidValue {
                var: "RPA_DEFAULT_COUNTRY_CODE".to_string(),
                value: default_country_code,
            });
        }
        let default_country_code = code.to_string();

        Ok(Self {
            data_dir,
            storage_endpoint,
            storage_bucket,
            default_country_code,
        })
    }

    /// `~/.rpa-console`
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".rpa-console"))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Override the data directory (e.g. from a CLI flag).
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.json")
    }

    pub fn documents_path(&self) -> PathBuf {
        self.data_dir.join("documents.json")
    }

    pub fn identity_path(&self) -> PathBuf {
        self.data_dir.join("identity.json")
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}
