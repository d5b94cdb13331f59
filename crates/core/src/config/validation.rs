//! Configuration validation rules.
//!
//! This module provides validation logic for `StoreConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::StoreConfig;
use thiserror::Error;

/// Upper bound for `busy_timeout_ms` (one minute).
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl StoreConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `db_path` is empty
    /// - `busy_timeout_ms` exceeds one minute
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid {
                field: "busy_timeout_ms".into(),
                reason: format!("must not exceed {MAX_BUSY_TIMEOUT_MS}ms"),
            });
        }

        Ok(())
    }
}
