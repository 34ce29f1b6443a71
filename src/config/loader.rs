//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables
//! 3. `.critiq.toml` in the working directory
//! 4. `~/.config/critiq/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::chunker::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE};
use crate::constants;
use crate::env::Env;
use crate::models::ProviderName;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub chunking: ChunkingConfig,
    pub analysis: AnalysisConfig,
    pub review: ReviewConfig,
    pub history: HistoryConfig,
}

/// LLM provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let name = ProviderName::default();
        Self {
            name,
            model: name.default_model().to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

/// How source files are split before analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Files up to this many characters are analyzed in one request.
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }
}

/// Decoding parameters and limits for each model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub temperature: f64,
    pub max_tokens: u64,
    /// Upper bound on a single model call, in seconds.
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 2000,
            timeout_secs: 30,
        }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Input limits enforced before a review starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Largest accepted file, in bytes.
    pub max_file_size: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

/// Review history storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// Overrides the default `~/.config/critiq/reviews` directory.
    pub dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl HistoryConfig {
    /// Directory review records are written to, if one can be determined.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir.clone().or_else(|| {
            dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join(constants::HISTORY_DIR))
        })
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the local config in `work_dir`, then
    /// applies environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_provider = ProviderConfig::default();
        if other.provider.name != default_provider.name {
            self.provider.name = other.provider.name;
            // a provider switch without an explicit model picks that provider's default
            if other.provider.model == default_provider.model {
                self.provider.model = other.provider.name.default_model().to_string();
            }
        }
        if other.provider.model != default_provider.model {
            self.provider.model = other.provider.model;
        }
        if other.provider.base_url.is_some() {
            self.provider.base_url = other.provider.base_url;
        }
        if other.provider.api_key.is_some() {
            self.provider.api_key = other.provider.api_key;
        }

        let default_chunking = ChunkingConfig::default();
        if other.chunking.max_chunk_size != default_chunking.max_chunk_size {
            self.chunking.max_chunk_size = other.chunking.max_chunk_size;
        }
        if other.chunking.min_chunk_size != default_chunking.min_chunk_size {
            self.chunking.min_chunk_size = other.chunking.min_chunk_size;
        }

        let default_analysis = AnalysisConfig::default();
        if other.analysis.temperature != default_analysis.temperature {
            self.analysis.temperature = other.analysis.temperature;
        }
        if other.analysis.max_tokens != default_analysis.max_tokens {
            self.analysis.max_tokens = other.analysis.max_tokens;
        }
        if other.analysis.timeout_secs != default_analysis.timeout_secs {
            self.analysis.timeout_secs = other.analysis.timeout_secs;
        }

        if other.review.max_file_size != ReviewConfig::default().max_file_size {
            self.review.max_file_size = other.review.max_file_size;
        }

        // disabled overrides enabled
        if !other.history.enabled {
            self.history.enabled = false;
        }
        if other.history.dir.is_some() {
            self.history.dir = other.history.dir;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_PROVIDER) {
            match val.parse::<ProviderName>() {
                Ok(name) => {
                    if self.provider.name != name && env.var(constants::ENV_MODEL).is_err() {
                        self.provider.model = name.default_model().to_string();
                    }
                    self.provider.name = name;
                }
                Err(_) => warn!("ignoring invalid {} value: {val}", constants::ENV_PROVIDER),
            }
        }
        if let Ok(val) = env.var(constants::ENV_MODEL) {
            self.provider.model = val;
        }
        if let Ok(val) = env.var(constants::ENV_BASE_URL) {
            self.provider.base_url = Some(val);
        }

        // Provider-specific API key resolution
        let api_key = env
            .var(constants::ENV_API_KEY)
            .or_else(|_| env.var(self.provider.name.api_key_env_var()))
            .ok();
        if api_key.is_some() {
            self.provider.api_key = api_key;
        }

        match env.parsed::<usize>(constants::ENV_MAX_CHUNK_SIZE) {
            Some(Ok(size)) if size > 0 => self.chunking.max_chunk_size = size,
            Some(_) => warn!("ignoring invalid {} value", constants::ENV_MAX_CHUNK_SIZE),
            None => {}
        }
        match env.parsed::<u64>(constants::ENV_TIMEOUT_SECS) {
            Some(Ok(secs)) if secs > 0 => self.analysis.timeout_secs = secs,
            Some(_) => warn!("ignoring invalid {} value", constants::ENV_TIMEOUT_SECS),
            None => {}
        }
        match env.flag(constants::ENV_HISTORY) {
            Some(Ok(enabled)) => self.history.enabled = enabled,
            Some(Err(val)) => warn!("ignoring invalid {} value: {val}", constants::ENV_HISTORY),
            None => {}
        }
    }
}
