//! YAML configuration file support.
//!
//! Deployments describe the whole engine (concurrency, matcher thresholds,
//! guardrail limits, embedding provider) in one YAML file loaded at startup.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "production"
//!
//! engine:
//!   max_concurrency: 8
//!   port_timeout_secs: 10
//!   matcher:
//!     semantic_floor: 0.70
//!     text_limit: 10
//!     vector_k: 5
//!   guardrail:
//!     max_yield_ratio: 8.0
//!     max_cpp_improvement: 0.90
//!
//! embedding:
//!   mode: "stub"
//!   model_name: "stub-sinusoid"
//!   dimension: 384
//!   normalize: true
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use embedding::EmbeddingConfig;

use crate::pipeline::EngineConfig;

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the whole engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CartwiseConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Pipeline and batch engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Embedding provider configuration.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Optional environment variable overrides.
    #[serde(default)]
    pub env_overrides: HashMap<String, String>,
}

impl CartwiseConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CartwiseConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        self.engine
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.embedding
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        if self.engine.guardrail.max_yield_ratio <= 1.0 {
            return Err(ConfigLoadError::Validation(
                "engine.guardrail.max_yield_ratio must be greater than 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.engine.guardrail.max_cpp_improvement) {
            return Err(ConfigLoadError::Validation(
                "engine.guardrail.max_cpp_improvement must be within [0.0, 1.0]".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CartwiseConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            engine: EngineConfig::default(),
            embedding: EmbeddingConfig::default(),
            env_overrides: HashMap::new(),
        }
    }
}
