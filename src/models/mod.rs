//! Shared types used across all modules.
//!
//! This module defines the core data structures for chunks, analyses,
//! and stored review records. Other modules import from here rather
//! than reaching into each other's internals.

pub mod analysis;
pub mod chunk;
pub mod review;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use analysis::{CodeIssue, ReviewAnalysis, SeverityLevel};
pub use chunk::{ChunkType, CodeChunk};
pub use review::{CodeReview, ReviewStats};

/// Supported LLM provider backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Cohere,
    Gemini,
    Perplexity,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "xai")]
    XAI,
    #[default]
    Groq,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Anthropic => write!(f, "anthropic"),
            ProviderName::OpenAI => write!(f, "openai"),
            ProviderName::Cohere => write!(f, "cohere"),
            ProviderName::Gemini => write!(f, "gemini"),
            ProviderName::Perplexity => write!(f, "perplexity"),
            ProviderName::DeepSeek => write!(f, "deepseek"),
            ProviderName::XAI => write!(f, "xai"),
            ProviderName::Groq => write!(f, "groq"),
            ProviderName::OpenAICompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderName::Anthropic),
            "openai" => Ok(ProviderName::OpenAI),
            "cohere" => Ok(ProviderName::Cohere),
            "gemini" => Ok(ProviderName::Gemini),
            "perplexity" => Ok(ProviderName::Perplexity),
            "deepseek" => Ok(ProviderName::DeepSeek),
            "xai" => Ok(ProviderName::XAI),
            "groq" => Ok(ProviderName::Groq),
            "openai-compatible" => Ok(ProviderName::OpenAICompatible),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: anthropic, openai, cohere, \
                 gemini, perplexity, deepseek, xai, groq, openai-compatible"
            )),
        }
    }
}

impl ProviderName {
    /// Returns the provider-specific environment variable name for the API key.
    ///
    /// These match the env var names used by rig-core's `from_env()` implementations.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
            ProviderName::Cohere => "COHERE_API_KEY",
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Perplexity => "PERPLEXITY_API_KEY",
            ProviderName::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderName::XAI => "XAI_API_KEY",
            ProviderName::Groq => "GROQ_API_KEY",
        }
    }

    /// Default model for the provider when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderName::Anthropic => "claude-sonnet-4-20250514",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "gpt-4o",
            ProviderName::Cohere => "command-r-plus",
            ProviderName::Gemini => "gemini-2.5-flash",
            ProviderName::Perplexity => "sonar",
            ProviderName::DeepSeek => "deepseek-chat",
            ProviderName::XAI => "grok-3",
            ProviderName::Groq => "llama-3.3-70b-versatile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_round_trips_through_display() {
        for name in [
            ProviderName::Anthropic,
            ProviderName::OpenAI,
            ProviderName::Groq,
            ProviderName::OpenAICompatible,
        ] {
            assert_eq!(name.to_string().parse::<ProviderName>(), Ok(name));
        }
    }

    #[test]
    fn provider_name_rejects_unknown() {
        let err = "bard".parse::<ProviderName>().unwrap_err();
        assert!(err.contains("unsupported provider"));
    }

    #[test]
    fn default_provider_is_groq() {
        assert_eq!(ProviderName::default(), ProviderName::Groq);
        assert_eq!(ProviderName::Groq.api_key_env_var(), "GROQ_API_KEY");
        assert_eq!(ProviderName::Groq.default_model(), "llama-3.3-70b-versatile");
    }
}
