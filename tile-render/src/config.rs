//! Glyph cache configuration
//!
//! Settings can be built in code or read from the `[cache]` table of a TOML
//! file. Missing keys fall back to defaults; the result is validated before
//! a cache accepts it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sizing and expiry for a glyph cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached glyph images
    pub capacity: usize,
    /// Milliseconds an entry may go unused before it is evicted
    pub expire_after_ms: u64,
}

fn default_capacity() -> usize {
    4096
}

fn default_expire_after_ms() -> u64 {
    5 * 60 * 1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            expire_after_ms: default_expire_after_ms(),
        }
    }
}

/// Top-level layout of a config file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cache: CacheConfig,
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl CacheConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the idle expiry, rounded up to whole milliseconds
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        let millis = expiry.as_millis() + u128::from(expiry.subsec_nanos() % 1_000_000 > 0);
        self.expire_after_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    pub fn expire_after(&self) -> Duration {
        Duration::from_millis(self.expire_after_ms)
    }

    /// Parse the `[cache]` table of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.cache.validate()?;
        Ok(file.cache)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject settings a cache cannot work with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError {
                message: "Capacity must be at least 1".to_string(),
                field: Some("cache.capacity".to_string()),
            });
        }
        if self.expire_after_ms == 0 {
            return Err(ConfigError {
                message: "Expiry must be at least 1 millisecond".to_string(),
                field: Some("cache.expire_after_ms".to_string()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = CacheConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.expire_after(), Duration::from_secs(300));
        assert_eq!(config.capacity, 4096);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = CacheConfig::default().with_capacity(0).validate().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("cache.capacity"));
        assert!(err.to_string().contains("cache.capacity"));
    }

    #[test]
    fn test_zero_expiry_rejected() {
        let config = CacheConfig::default().with_expiry(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expiry_rounds_up() {
        let config = CacheConfig::default().with_expiry(Duration::from_micros(1500));
        assert_eq!(config.expire_after_ms, 2);
        let config = CacheConfig::default().with_expiry(Duration::from_secs(2));
        assert_eq!(config.expire_after_ms, 2000);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CacheConfig::from_toml_str("[cache]\ncapacity = 16\n").unwrap();
        assert_eq!(config.capacity, 16);
        assert_eq!(config.expire_after_ms, 300_000);

        let empty = CacheConfig::from_toml_str("").unwrap();
        assert_eq!(empty, CacheConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(matches!(
            CacheConfig::from_toml_str("[cache]\ncapacity = 0\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("[cache]\ncapacity = \"lots\"\n"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nexpire_after_ms = 250").unwrap();
        let config = CacheConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.expire_after(), Duration::from_millis(250));

        let missing = CacheConfig::load_from_file(Path::new("/nonexistent/tiles.toml"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
