//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application and
//! domain types by the accessor methods on [`FileConfig`].

use chrono::Duration as ChronoDuration;
use panel_application::CacheParams;
use panel_domain::{DomainError, Language};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("api.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("cache.capacity cannot be 0")]
    InvalidCapacity,

    #[error("cache.ttl_hours cannot be 0")]
    InvalidTtl,

    #[error("discussion.language is invalid: {0}")]
    InvalidLanguage(#[from] DomainError),
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the news backend
    pub base_url: String,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth_token: None,
            timeout_seconds: 60,
        }
    }
}

/// Panel cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Persist panels on disk; when false the cache lives in memory only
    pub enabled: bool,
    /// Directory holding the cache table (defaults to the user cache dir)
    pub directory: Option<PathBuf>,
    pub ttl_hours: u32,
    pub capacity: usize,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            ttl_hours: 24,
            capacity: 20,
        }
    }
}

/// Discussion behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Language requested from the backend and required of cached panels
    pub language: String,
    /// Pause before each opinion is revealed, in milliseconds
    pub reveal_delay_ms: u64,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            reveal_delay_ms: 800,
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format: "full", "consensus", or "json"
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub cache: FileCacheConfig,
    pub discussion: FileDiscussionConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Check values that would make the application misbehave
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.cache.capacity == 0 {
            return Err(ConfigValidationError::InvalidCapacity);
        }
        if self.cache.ttl_hours == 0 {
            return Err(ConfigValidationError::InvalidTtl);
        }
        self.language()?;
        Ok(())
    }

    pub fn language(&self) -> Result<Language, ConfigValidationError> {
        Ok(Language::new(self.discussion.language.as_str())?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.discussion.reveal_delay_ms)
    }

    pub fn cache_params(&self) -> CacheParams {
        CacheParams::default()
            .with_ttl(ChronoDuration::hours(i64::from(self.cache.ttl_hours)))
            .with_capacity(self.cache.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_params(), CacheParams::default());
        assert_eq!(config.reveal_delay(), Duration::from_millis(800));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.language().unwrap(), Language::english());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://news.example.com"

            [cache]
            capacity = 5

            [discussion]
            language = "zh"
            reveal_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://news.example.com");
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.cache.capacity, 5);
        assert_eq!(config.cache.ttl_hours, 24);
        assert!(config.cache.enabled);
        assert_eq!(config.language().unwrap().as_str(), "zh");
        assert!(config.reveal_delay().is_zero());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = FileConfig::default();
        config.api.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));

        let mut config = FileConfig::default();
        config.cache.capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidCapacity)
        ));

        let mut config = FileConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyBaseUrl)
        ));

        let mut config = FileConfig::default();
        config.discussion.language = "en us".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidLanguage(_))
        ));
    }
}
