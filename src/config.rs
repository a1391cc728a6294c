//! Configuration management
//!
//! Loads settings from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `INTENTFORGE_PROVIDER`: Provider selection (mock|openai) - default: "mock"
//! - `INTENTFORGE_ENDPOINT`: Base URL of an OpenAI-compatible endpoint - default: "http://localhost:11434"
//! - `INTENTFORGE_MODEL`: Model name for the provider - default: "qwen2.5-coder:7b"
//! - `INTENTFORGE_API_KEY`: Bearer token for the provider, if it requires one
//! - `INTENTFORGE_STORAGE_PATH`: Root directory for materialized projects and archives - default: "./storage"
//! - `INTENTFORGE_BUILD_TIMEOUT`: Per-command timeout in seconds for build/test runs - default: "300"
//! - `INTENTFORGE_LOG_LEVEL`: Logging level - default: "info"

use crate::provider::{CompletionClient, MockProvider, OpenAiCompatibleClient};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_STORAGE_PATH: &str = "./storage";
const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 300;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: mock, openai")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Which completion provider to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    OpenAiCompatible,
}

/// Platform configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub provider: ProviderKind,

    /// Base URL of the OpenAI-compatible endpoint (ignored for the mock)
    pub endpoint: String,

    pub model: String,

    pub api_key: Option<String>,

    /// Root directory for materialized projects and exported archives
    pub storage_path: PathBuf,

    /// Per-command timeout for build/test runs, in seconds
    pub build_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PlatformConfig {
    /// Loads from `INTENTFORGE_*` environment variables with defaults for
    /// any missing values
    fn default() -> Self {
        let provider = env::var("INTENTFORGE_PROVIDER")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "mock" => Some(ProviderKind::Mock),
                "openai" => Some(ProviderKind::OpenAiCompatible),
                _ => None,
            })
            .unwrap_or(ProviderKind::Mock);

        let endpoint =
            env::var("INTENTFORGE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let model = env::var("INTENTFORGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_key = env::var("INTENTFORGE_API_KEY").ok().filter(|k| !k.is_empty());

        let storage_path = env::var("INTENTFORGE_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH));

        let build_timeout_secs = env::var("INTENTFORGE_BUILD_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_BUILD_TIMEOUT_SECS);

        let log_level = env::var("INTENTFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            endpoint,
            model,
            api_key,
            storage_path,
            build_timeout_secs,
            log_level,
        }
    }
}

impl PlatformConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Build timeout must be at least 1 second".to_string(),
            ));
        }
        if self.build_timeout_secs > 3600 {
            return Err(ConfigError::ValidationFailed(
                "Build timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.provider == ProviderKind::OpenAiCompatible && self.endpoint.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Endpoint must be set for the openai provider".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Creates the completion client for the configured provider
    pub fn create_client(&self) -> Arc<dyn CompletionClient> {
        match self.provider {
            ProviderKind::Mock => Arc::new(MockProvider::new()),
            ProviderKind::OpenAiCompatible => Arc::new(OpenAiCompatibleClient::new(
                self.endpoint.clone(),
                self.model.clone(),
                self.api_key.clone(),
            )),
        }
    }

    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }
}

impl fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Platform Configuration:")?;
        writeln!(f, "  Provider: {:?}", self.provider)?;
        writeln!(f, "  Endpoint: {}", self.endpoint)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  API Key: {}", if self.api_key.is_some() { "set" } else { "unset" })?;
        writeln!(f, "  Storage Path: {}", self.storage_path.display())?;
        writeln!(f, "  Build Timeout: {}s", self.build_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
