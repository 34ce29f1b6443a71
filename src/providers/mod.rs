//! LlmTransport trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core so the analysis code only
//! ever sees "send a prompt, get text back".

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the LLM transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// A single-shot completion endpoint.
///
/// Implementations send one system instruction plus one user prompt and
/// return the raw response text. They do not retry.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    async fn submit(
        &self,
        system: &str,
        prompt: &str,
        temperature: f64,
        max_tokens: u64,
    ) -> Result<String, TransportError>;
}

/// Classifies a transport error message into a short, user-friendly reason.
///
/// Returns `None` when the message matches no known transient condition.
pub fn classify_error(message: &str) -> Option<&'static str> {
    let msg_lower = message.to_lowercase();
    if msg_lower.contains("429")
        || msg_lower.contains("rate limit")
        || msg_lower.contains("too many requests")
        || msg_lower.contains("quota")
    {
        Some("Rate limited by API")
    } else if msg_lower.contains("503")
        || msg_lower.contains("service unavailable")
        || msg_lower.contains("high demand")
    {
        Some("High model load")
    } else if msg_lower.contains("529") || msg_lower.contains("overloaded") {
        Some("API overloaded")
    } else if msg_lower.contains("502") {
        Some("API gateway error")
    } else if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
        Some("Request timed out")
    } else if msg_lower.contains("connection") {
        Some("Connection error")
    } else if msg_lower.contains("401") || msg_lower.contains("unauthorized") {
        Some("Authentication failed")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_rate_limit() {
        assert_eq!(
            classify_error("HttpError: Invalid status code 429 Too Many Requests"),
            Some("Rate limited by API")
        );
        assert_eq!(classify_error("monthly quota exceeded"), Some("Rate limited by API"));
    }

    #[test]
    fn classify_timeout_and_connection() {
        assert_eq!(classify_error("request timed out after 30s"), Some("Request timed out"));
        assert_eq!(classify_error("connection refused"), Some("Connection error"));
    }

    #[test]
    fn classify_gateway_and_overload() {
        assert_eq!(classify_error("HTTP 502 Bad Gateway"), Some("API gateway error"));
        assert_eq!(classify_error("overloaded, try later"), Some("API overloaded"));
    }

    #[test]
    fn classify_unknown_is_none() {
        assert_eq!(classify_error("some unknown error"), None);
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::ApiError("Groq API error: boom".into());
        assert_eq!(err.to_string(), "LLM API error: Groq API error: boom");
    }
}
