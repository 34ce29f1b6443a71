//! rig-core integration for LLM-backed analysis.
//!
//! Uses rig-core's provider clients and Agent abstraction for multi-provider
//! support. Currently supports: Anthropic, OpenAI, Cohere, Gemini, Perplexity,
//! DeepSeek, xAI, Groq, and any OpenAI-compatible API.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use crate::config::ProviderConfig;
use crate::models::ProviderName;

use super::{LlmTransport, TransportError};

/// Build a single-turn agent from a rig-core client and prompt it.
macro_rules! prompt_once {
    ($client:expr, $model:expr, $system:expr, $user:expr, $temperature:expr, $max_tokens:expr, $label:expr) => {{
        let agent = $client
            .agent($model)
            .preamble($system)
            .temperature($temperature)
            .max_tokens($max_tokens)
            .build();
        agent
            .prompt($user)
            .await
            .map_err(|e| TransportError::ApiError(format!("{} API error: {e}", $label)))
    }};
}

/// Create a rig-core client using the `Client::new(api_key)` convention.
macro_rules! new_client {
    ($provider_mod:path, $api_key:expr, $label:expr) => {{
        <$provider_mod>::new($api_key).map_err(|e| {
            TransportError::ApiError(format!("failed to create {} client: {e}", $label))
        })
    }};
}

/// rig-core based transport.
///
/// The provider name in config selects which rig-core client is built.
/// A client is created per call; calls are infrequent and sequential.
pub struct RigTransport {
    config: ProviderConfig,
}

impl RigTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, TransportError> {
        if config.api_key.is_none() {
            return Err(TransportError::NotConfigured(format!(
                "no API key found for provider '{}'. Set {} or {}.",
                config.name,
                crate::constants::ENV_API_KEY,
                config.name.api_key_env_var(),
            )));
        }
        Ok(Self { config })
    }

    /// The model requests are sent to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build an OpenAI-style client, optionally with a custom base URL.
    fn build_openai_client(
        &self,
        api_key: &str,
    ) -> Result<providers::openai::CompletionsClient, TransportError> {
        let mut builder = providers::openai::CompletionsClient::builder().api_key(api_key);
        if let Some(ref base_url) = self.config.base_url {
            builder = builder.base_url(base_url);
        }
        builder
            .build()
            .map_err(|e| TransportError::ApiError(format!("failed to create OpenAI client: {e}")))
    }

    /// Require `base_url` for OpenAI-compatible providers.
    fn require_base_url(&self) -> Result<&str, TransportError> {
        self.config.base_url.as_deref().ok_or_else(|| {
            TransportError::NotConfigured(
                "openai-compatible provider requires base_url to be set".to_string(),
            )
        })
    }

    fn api_key(&self) -> Result<&str, TransportError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| TransportError::NotConfigured("missing API key".to_string()))
    }
}

#[async_trait]
impl LlmTransport for RigTransport {
    async fn submit(
        &self,
        system: &str,
        prompt: &str,
        temperature: f64,
        max_tokens: u64,
    ) -> Result<String, TransportError> {
        let api_key = self.api_key()?;
        let model = self.config.model.as_str();

        match self.config.name {
            ProviderName::Anthropic => {
                let client: providers::anthropic::Client = providers::anthropic::Client::builder()
                    .api_key(api_key)
                    .build()
                    .map_err(|e| {
                        TransportError::ApiError(format!("failed to create Anthropic client: {e}"))
                    })?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "Anthropic")
            }
            ProviderName::OpenAI => {
                let client = self.build_openai_client(api_key)?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "OpenAI")
            }
            ProviderName::Cohere => {
                let client = new_client!(providers::cohere::Client, api_key, "Cohere")?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "Cohere")
            }
            ProviderName::Gemini => {
                let client = new_client!(providers::gemini::Client, api_key, "Gemini")?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "Gemini")
            }
            ProviderName::Perplexity => {
                let client = new_client!(providers::perplexity::Client, api_key, "Perplexity")?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "Perplexity")
            }
            ProviderName::DeepSeek => {
                let client = new_client!(providers::deepseek::Client, api_key, "DeepSeek")?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "DeepSeek")
            }
            ProviderName::XAI => {
                let client = new_client!(providers::xai::Client, api_key, "xAI")?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "xAI")
            }
            ProviderName::Groq => {
                let client = new_client!(providers::groq::Client, api_key, "Groq")?;
                prompt_once!(client, model, system, prompt, temperature, max_tokens, "Groq")
            }
            ProviderName::OpenAICompatible => {
                let base_url = self.require_base_url()?;
                let client: providers::openai::CompletionsClient =
                    providers::openai::CompletionsClient::builder()
                        .api_key(api_key)
                        .base_url(base_url)
                        .build()
                        .map_err(|e| {
                            TransportError::ApiError(format!(
                                "failed to create OpenAI-compatible client: {e}"
                            ))
                        })?;
                prompt_once!(
                    client,
                    model,
                    system,
                    prompt,
                    temperature,
                    max_tokens,
                    "OpenAI-compatible"
                )
            }
        }
    }
}
