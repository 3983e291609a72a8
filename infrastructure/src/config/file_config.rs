//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use glance_application::StoreConfig;
use glance_domain::ModelSize;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("model.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model.model_id cannot be empty")]
    EmptyModelId,

    #[error("session.idle_timeout_seconds cannot be 0")]
    InvalidIdleTimeout,

    #[error("session.reap_interval_seconds cannot be 0")]
    InvalidReapInterval,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub model: FileModelConfig,
    pub session: FileSessionConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if matches!(self.model.model_id.as_deref(), Some(id) if id.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModelId);
        }
        if self.session.idle_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidIdleTimeout);
        }
        if self.session.reap_interval_seconds == 0 {
            return Err(ConfigValidationError::InvalidReapInterval);
        }
        Ok(())
    }
}

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address to bind
    pub bind: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Raw model configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Named size tier (uses domain type)
    pub size: ModelSize,
    /// Explicit model identifier; overrides the tier when set
    pub model_id: Option<String>,
    /// Base URL of the OpenAI-compatible inference runtime
    pub backend_url: String,
    /// Compute device reported by the health probe
    pub device: String,
    /// Timeout in seconds for inference calls
    pub timeout_seconds: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            size: ModelSize::default(),
            model_id: None,
            backend_url: "http://localhost:8080".to_string(),
            device: "cpu".to_string(),
            timeout_seconds: 120,
        }
    }
}

impl FileModelConfig {
    /// The model identifier to serve: explicit override, or the tier's
    pub fn resolved_model_id(&self) -> String {
        self.model_id
            .clone()
            .unwrap_or_else(|| self.size.model_id().to_string())
    }
}

/// Raw session table configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Idle seconds before a session may be evicted
    pub idle_timeout_seconds: u64,
    /// Seconds between reaper passes
    pub reap_interval_seconds: u64,
    /// Optional cap on live sessions
    pub max_sessions: Option<usize>,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: 3600,
            reap_interval_seconds: 300,
            max_sessions: None,
            max_upload_bytes: crate::media::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl FileSessionConfig {
    /// Convert to the store's runtime configuration
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            idle_timeout: Duration::from_secs(self.idle_timeout_seconds),
            max_sessions: self.max_sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.size, ModelSize::Small256M);
        assert_eq!(config.session.idle_timeout_seconds, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolved_model_id_prefers_override() {
        let mut model = FileModelConfig::default();
        assert_eq!(
            model.resolved_model_id(),
            "HuggingFaceTB/SmolVLM2-256M-Video-Instruct"
        );

        model.model_id = Some("my-org/custom-vlm".to_string());
        assert_eq!(model.resolved_model_id(), "my-org/custom-vlm");
    }

    #[test]
    fn test_validation_rejects_zero_timeouts() {
        let mut config = FileConfig::default();
        config.model.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));

        let mut config = FileConfig::default();
        config.session.idle_timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidIdleTimeout)
        ));
    }

    #[test]
    fn test_validation_rejects_blank_model_id() {
        let mut config = FileConfig::default();
        config.model.model_id = Some("  ".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelId)
        ));
    }

    #[test]
    fn test_store_config_conversion() {
        let mut session = FileSessionConfig::default();
        session.idle_timeout_seconds = 60;
        session.max_sessions = Some(5);

        let store = session.store_config();
        assert_eq!(store.idle_timeout, Duration::from_secs(60));
        assert_eq!(store.max_sessions, Some(5));
    }

    #[test]
    fn test_toml_parse_with_partial_sections() {
        let config: FileConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [model]
            size = "2.2B"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.model.size, ModelSize::Large2_2B);
        assert_eq!(config.session.reap_interval_seconds, 300);
    }
}
