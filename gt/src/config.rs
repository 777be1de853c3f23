//! Goal tracker configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Countdown and redraw timing
    pub tracker: TrackerConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Fails fast when no API key source is available.
    pub fn validate(&self) -> Result<()> {
        self.llm.resolve()?.get_api_key()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path must load or fail
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .goaltracker.yml
        let local_config = PathBuf::from(".goaltracker.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/goaltracker/goaltracker.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => std::iter::once(PathBuf::from(".goaltracker.yml"))
                .chain(Self::user_config_path())
                .collect(),
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("goaltracker").join("goaltracker.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File containing the API key (takes precedence over the env var)
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<String>,

    /// API base URL (provider default when unset)
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key_file: None,
            base_url: None,
            max_tokens: 256,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Resolve provider defaults into a concrete client configuration
    pub fn resolve(&self) -> Result<ResolvedLlmConfig> {
        debug!(provider = %self.provider, model = %self.model, "LlmConfig::resolve: called");
        let provider = self.provider.to_lowercase();
        let default_base_url = match provider.as_str() {
            "openai" => "https://api.openai.com",
            "anthropic" => "https://api.anthropic.com",
            other => {
                return Err(eyre::eyre!(
                    "Unknown LLM provider: '{}'. Supported: openai, anthropic",
                    other
                ));
            }
        };

        Ok(ResolvedLlmConfig {
            provider,
            model: self.model.clone(),
            api_key_env: self.api_key_env.clone(),
            api_key_file: self.api_key_file.as_deref().map(expand_home),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_tokens: self.max_tokens,
            timeout_ms: self.timeout_ms,
        })
    }
}

/// LLM configuration with provider defaults filled in
#[derive(Clone)]
pub struct ResolvedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub api_key_file: Option<PathBuf>,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .field("api_key_file", &self.api_key_file)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ResolvedLlmConfig {
    /// Read the API key from the key file, falling back to the env var
    pub fn get_api_key(&self) -> Result<String> {
        if let Some(path) = &self.api_key_file {
            let key = fs::read_to_string(path)
                .context(format!("Failed to read API key file {}", path.display()))?
                .trim()
                .to_string();
            if key.is_empty() {
                return Err(eyre::eyre!("API key file {} is empty", path.display()));
            }
            return Ok(key);
        }

        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable or llm.api-key-file.",
                self.api_key_env
            )),
        }
    }
}

/// Countdown and redraw timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How often the countdown display is recomputed
    #[serde(rename = "countdown-interval-ms")]
    pub countdown_interval_ms: u64,

    /// Terminal event poll interval
    #[serde(rename = "tick-rate-ms")]
    pub tick_rate_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            countdown_interval_ms: 1000,
            tick_rate_ms: 100,
        }
    }
}

impl TrackerConfig {
    /// Countdown refresh cadence (at least 100ms)
    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms.max(100))
    }

    /// Event poll interval (at least 10ms)
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
