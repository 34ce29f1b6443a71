//! App-wide constants.
//!
//! Centralises the tool name, config paths and environment variable names
//! so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "critiq";

/// Crate version, as reported by `critiq --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.critiq.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".critiq.toml";

/// Directory name under `~/.config/` for global config and review history.
pub const CONFIG_DIR: &str = "critiq";

/// Subdirectory of [`CONFIG_DIR`] holding stored review records.
pub const HISTORY_DIR: &str = "reviews";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "CRITIQ_PROVIDER";
pub const ENV_MODEL: &str = "CRITIQ_MODEL";
pub const ENV_API_KEY: &str = "CRITIQ_API_KEY";
pub const ENV_BASE_URL: &str = "CRITIQ_BASE_URL";
pub const ENV_MAX_CHUNK_SIZE: &str = "CRITIQ_MAX_CHUNK_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "CRITIQ_TIMEOUT_SECS";
pub const ENV_HISTORY: &str = "CRITIQ_HISTORY";
