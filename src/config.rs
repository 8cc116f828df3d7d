//! # Configuration Management
//!
//! Loads application configuration from multiple sources:
//! - Built-in defaults (the `Default` impl below)
//! - A TOML configuration file (`config.toml`, optional)
//! - Environment variables with an `APP_` prefix
//! - `HOST` / `PORT` deployment-platform overrides
//!
//! ## Configuration Priority (highest to lowest):
//! 1. `HOST` / `PORT` environment variables
//! 2. `APP_*` environment variables (e.g. `APP_SERVER_PORT`)
//! 3. `config.toml`
//! 4. Defaults

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which Whisper model to load at startup, and how to run it.
///
/// The model is a startup-time constant: one named configuration loaded
/// once, never switched per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier reported by the health endpoint ("tiny", "base", ...)
    pub name: String,
    /// Path to the ggml model file on disk
    pub path: String,
    /// Decode language, always forced (no auto-detection)
    pub language: String,
    /// CPU threads for inference
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory for scoped temp artifacts; system temp dir when unset
    pub temp_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            model: ModelConfig {
                name: "tiny".to_string(),
                path: "models/ggml-tiny.bin".to_string(),
                language: "en".to_string(),
                threads: 4,
            },
            upload: UploadConfig { temp_dir: None },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml` and the environment.
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("_"));

        // Deployment platforms commonly inject HOST/PORT without a prefix
        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }
        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense before serving.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }
        if self.model.name.is_empty() {
            return Err(anyhow::anyhow!("Model name must not be empty"));
        }
        if self.model.path.is_empty() {
            return Err(anyhow::anyhow!("Model path must not be empty"));
        }
        if self.model.language.is_empty() {
            return Err(anyhow::anyhow!("Model language must not be empty"));
        }
        if self.model.threads == 0 {
            return Err(anyhow::anyhow!("Model threads must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.name, "tiny");
        assert_eq!(config.model.language, "en");
        assert!(config.upload.temp_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_port_zero() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_threads() {
        let mut config = AppConfig::default();
        config.model.threads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_model_fields() {
        for field in ["name", "path", "language"] {
            let mut config = AppConfig::default();
            match field {
                "name" => config.model.name.clear(),
                "path" => config.model.path.clear(),
                _ => config.model.language.clear(),
            }
            assert!(config.validate().is_err(), "empty {field} should fail");
        }
    }
}
