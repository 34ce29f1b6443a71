//! Configuration loading and layering.
//!
//! Handles `.critiq.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{AnalysisConfig, ChunkingConfig, Config, ConfigError, ProviderConfig};
