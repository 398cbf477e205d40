//! Configuration loading, validation, and management for BauBot.
//!
//! Loads configuration from `~/.baubot/config.toml` with environment
//! variable overrides (the original deployment configured everything
//! through the environment, so those names are honored). Validates all
//! settings at startup — components receive an immutable `AppConfig` and
//! never read the environment themselves.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.baubot/config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Document index settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Text-generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Case storage settings
    #[serde(default)]
    pub cases: CasesConfig,

    /// Gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("search", &self.search)
            .field("generation", &self.generation)
            .field("cases", &self.cases)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Settings for the external document index.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Index service endpoint, e.g. `https://myservice.search.windows.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Name of the index to query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(default = "default_search_api_version")]
    pub api_version: String,

    /// Ranking mode: "simple" (keyword) or "semantic" (with extractive
    /// captions and answers).
    #[serde(default = "default_ranking")]
    pub ranking: String,

    /// How many candidates to retrieve per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_search_api_version() -> String {
    "2023-11-01".into()
}
fn default_ranking() -> String {
    "semantic".into()
}
fn default_top_k() -> usize {
    5
}
fn default_search_timeout() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            index: None,
            api_version: default_search_api_version(),
            ranking: default_ranking(),
            top_k: default_top_k(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("index", &self.index)
            .field("api_version", &self.api_version)
            .field("ranking", &self.ranking)
            .field("top_k", &self.top_k)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Settings for the text-generation deployment.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generation service endpoint, e.g. `https://myservice.openai.azure.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Deployment (model) name to invoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    #[serde(default = "default_generation_api_version")]
    pub api_version: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

fn default_generation_api_version() -> String {
    "2024-02-01".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_generation_timeout() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: default_generation_api_version(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Settings for the case store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasesConfig {
    /// Root directory holding the partition directories. Defaults to
    /// `~/.baubot/cases`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default = "default_raw_partition")]
    pub raw_partition: String,

    #[serde(default = "default_approved_partition")]
    pub approved_partition: String,
}

fn default_raw_partition() -> String {
    "cases-raw".into()
}
fn default_approved_partition() -> String {
    "cases-approved".into()
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self {
            root: None,
            raw_partition: default_raw_partition(),
            approved_partition: default_approved_partition(),
        }
    }
}

impl CasesConfig {
    /// The resolved root directory for case storage.
    pub fn resolved_root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("cases"))
    }
}

/// Settings for the HTTP gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    7071
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.baubot/config.toml).
    ///
    /// Environment variables override file values. The names match the
    /// original deployment:
    /// - `SEARCH_ENDPOINT`, `SEARCH_KEY`, `SEARCH_INDEX_RAG` / `SEARCH_INDEX`
    /// - `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_KEY`,
    ///   `AZURE_OPENAI_DEPLOYMENT_NAME`
    /// - `CASES_ROOT`, `BAUBOT_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (highest priority).
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEARCH_ENDPOINT") {
            self.search.endpoint = Some(v);
        }
        if let Ok(v) = std::env::var("SEARCH_KEY") {
            self.search.api_key = Some(v);
        }
        if let Some(v) = std::env::var("SEARCH_INDEX_RAG")
            .ok()
            .or_else(|| std::env::var("SEARCH_INDEX").ok())
        {
            self.search.index = Some(v);
        }
        if let Ok(v) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            self.generation.endpoint = Some(v);
        }
        if let Ok(v) = std::env::var("AZURE_OPENAI_KEY") {
            self.generation.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("AZURE_OPENAI_DEPLOYMENT_NAME") {
            self.generation.deployment = Some(v);
        }
        if let Ok(v) = std::env::var("CASES_ROOT") {
            self.cases.root = Some(PathBuf::from(v));
        }
        if let Some(port) = std::env::var("BAUBOT_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.gateway.port = port;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".baubot")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.search.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "search.top_k must be at least 1".into(),
            ));
        }

        match self.search.ranking.as_str() {
            "simple" | "semantic" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "search.ranking must be 'simple' or 'semantic', got '{other}'"
                )));
            }
        }

        Ok(())
    }

    /// Missing required search settings, by their operator-facing names.
    /// Empty means the Retriever can be constructed.
    pub fn missing_search_settings(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.search.endpoint.is_none() {
            missing.push("SEARCH_ENDPOINT".into());
        }
        if self.search.api_key.is_none() {
            missing.push("SEARCH_KEY".into());
        }
        if self.search.index.is_none() {
            missing.push("SEARCH_INDEX".into());
        }
        missing
    }

    /// Missing required generation settings, by their operator-facing
    /// names. Empty means the Generator can be constructed.
    pub fn missing_generation_settings(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.generation.endpoint.is_none() {
            missing.push("AZURE_OPENAI_ENDPOINT".into());
        }
        if self.generation.api_key.is_none() {
            missing.push("AZURE_OPENAI_KEY".into());
        }
        if self.generation.deployment.is_none() {
            missing.push("AZURE_OPENAI_DEPLOYMENT_NAME".into());
        }
        missing
    }

    /// Generate a default config TOML string (for `onboard`-style setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.top_k, 5);
        assert_eq!(config.search.ranking, "semantic");
        assert_eq!(config.gateway.port, 7071);
        assert_eq!(config.cases.raw_partition, "cases-raw");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.search.top_k, config.search.top_k);
        assert_eq!(parsed.gateway.port, config.gateway.port);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.generation.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_ranking_rejected() {
        let mut config = AppConfig::default();
        config.search.ranking = "hybrid-v3".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().search.top_k, 5);
    }

    #[test]
    fn parses_full_config_file() {
        let toml_str = r#"
[search]
endpoint = "https://docs.search.windows.net"
api_key = "sk-search"
index = "manuals-rag"
ranking = "semantic"
top_k = 3

[generation]
endpoint = "https://docs.openai.azure.com"
api_key = "sk-gen"
deployment = "gpt-4o-mini"

[cases]
root = "/var/lib/baubot/cases"

[gateway]
port = 8081
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.index.as_deref(), Some("manuals-rag"));
        assert_eq!(config.search.top_k, 3);
        assert_eq!(config.generation.deployment.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(
            config.cases.resolved_root(),
            PathBuf::from("/var/lib/baubot/cases")
        );
        assert_eq!(config.gateway.port, 8081);
        assert!(config.missing_search_settings().is_empty());
        assert!(config.missing_generation_settings().is_empty());
    }

    #[test]
    fn missing_settings_listed_by_operator_name() {
        let config = AppConfig::default();
        let missing = config.missing_search_settings();
        assert_eq!(missing, vec!["SEARCH_ENDPOINT", "SEARCH_KEY", "SEARCH_INDEX"]);

        let missing = config.missing_generation_settings();
        assert_eq!(
            missing,
            vec![
                "AZURE_OPENAI_ENDPOINT",
                "AZURE_OPENAI_KEY",
                "AZURE_OPENAI_DEPLOYMENT_NAME"
            ]
        );
    }

    #[test]
    fn debug_redacts_api_keys() {
        let mut config = AppConfig::default();
        config.search.api_key = Some("sk-search-secret".into());
        config.generation.api_key = Some("sk-gen-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("cases-raw"));
        assert!(toml_str.contains("7071"));
    }
}
