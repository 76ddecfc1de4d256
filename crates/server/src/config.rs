//! # Application Configuration
//!
//! This module defines the configuration structure for `tenderlens-server` and
//! loads it from an optional YAML file layered under environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;

/// The environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "TENDERLENS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
    /// A required API key is absent or empty.
    MissingApiKey(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::MissingApiKey(var) => {
                write!(f, "{var} is required but was not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Key for the chat-completion provider. Loaded from `XAI_API_KEY`.
    #[serde(default)]
    pub xai_api_key: Option<String>,
    /// Key for the embedding provider. Loaded from `OPENAI_API_KEY`.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Directory holding the vector index. Created on startup if missing.
    #[serde(default = "default_persist_directory")]
    pub persist_directory: PathBuf,
    /// Directory for temporary upload files. Defaults to the OS temp dir.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_persist_directory() -> PathBuf {
    PathBuf::from("./vector_db")
}
fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            xai_api_key: None,
            openai_api_key: None,
            persist_directory: default_persist_directory(),
            upload_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Returns the `(xai, openai)` keys, failing on the first one that is
    /// missing or blank.
    pub fn require_keys(&self) -> Result<(&str, &str), ConfigError> {
        let present = |key: &Option<String>| {
            key.as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
        };
        let xai = present(&self.xai_api_key).ok_or(ConfigError::MissingApiKey("XAI_API_KEY"))?;
        let openai =
            present(&self.openai_api_key).ok_or(ConfigError::MissingApiKey("OPENAI_API_KEY"))?;
        Ok((xai, openai))
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

/// Settings for the chat-completion model used for analysis.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.x.ai/v1/chat/completions".to_string(),
            model: "grok-3".to_string(),
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    /// Bound on one store or search call, embedding included.
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/embeddings".to_string(),
            model_name: "text-embedding-ada-002".to_string(),
            timeout_secs: 30,
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// The file is `config_path_override` if given (it must exist), otherwise the
/// path in `TENDERLENS_CONFIG`, otherwise `config.yml` in the working
/// directory; the latter two are skipped when absent.
/// - Top-level keys like `port` and `xai_api_key` are overridden by `PORT` and `XAI_API_KEY`.
/// - Nested keys are overridden by `TENDERLENS_...` variables (e.g., `TENDERLENS_LLM__API_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(Path::new(path))?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
            if let Some(content) = read_and_substitute(Path::new(&path))? {
                info!("Loading configuration from '{path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            } else {
                info!("No configuration file at '{path}'; using defaults and environment.");
            }
        }
    }

    let settings = builder
        // Top-level keys such as PORT or XAI_API_KEY.
        .add_source(Environment::default().try_parsing(true))
        // Prefixed variables for nested overrides.
        .add_source(
            Environment::with_prefix("TENDERLENS")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
