//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SAATY_AHP` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use saaty_ahp::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Snapshots live in {}", config.storage.snapshot_dir.display());
//! ```

mod engine;
mod error;
mod logging;
mod storage;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine parameters (rounding precision, consistency threshold)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Snapshot storage location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SAATY_AHP` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SAATY_AHP__ENGINE__PRECISION=3` -> `engine.precision = 3`
    /// - `SAATY_AHP__STORAGE__SNAPSHOT_DIR=/var/lib/ahp` -> `storage.snapshot_dir`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SAATY_AHP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("SAATY_AHP__ENGINE__PRECISION");
        env::remove_var("SAATY_AHP__ENGINE__CONSISTENCY_THRESHOLD");
        env::remove_var("SAATY_AHP__STORAGE__SNAPSHOT_DIR");
        env::remove_var("SAATY_AHP__LOGGING__FILTER");
        env::remove_var("SAATY_AHP__LOGGING__JSON");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.engine.precision, 4);
        assert_eq!(config.storage.snapshot_dir, PathBuf::from("./data/hierarchies"));
        assert_eq!(config.logging.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SAATY_AHP__ENGINE__PRECISION", "3");
        env::set_var("SAATY_AHP__ENGINE__CONSISTENCY_THRESHOLD", "0.1");
        env::set_var("SAATY_AHP__STORAGE__SNAPSHOT_DIR", "/tmp/ahp");
        env::set_var("SAATY_AHP__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.precision, 3);
        assert!((config.engine.consistency_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.storage.snapshot_dir, PathBuf::from("/tmp/ahp"));
        assert!(config.logging.json);
    }

    #[test]
    fn test_validate_rejects_bad_precision() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SAATY_AHP__ENGINE__PRECISION", "9");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPrecision { actual: 9, .. })
        ));
    }

    #[test]
    fn test_unparseable_value_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SAATY_AHP__ENGINE__PRECISION", "four");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
