//! Single-call code analysis.
//!
//! [`AnalysisClient`] turns one piece of code into a [`ReviewAnalysis`]:
//! build the prompt, submit it through an [`LlmTransport`] under a timeout,
//! and parse the reply. Every failure along the way collapses into
//! [`ReviewAnalysis::fallback`], so [`AnalysisClient::analyze`] never fails.

pub mod parser;
pub mod prompt;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::models::ReviewAnalysis;
use crate::providers::{LlmTransport, TransportError, classify_error};

pub use parser::parse_analysis_response;
pub use prompt::{SYSTEM_PROMPT, build_prompt};

/// Why a single analysis call produced no usable result.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Decoding parameters for each model call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub temperature: f64,
    pub max_tokens: u64,
    pub timeout: Duration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AnalysisSettings {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        }
    }
}

/// Runs one review request per call.
#[derive(Clone)]
pub struct AnalysisClient {
    transport: Arc<dyn LlmTransport>,
    settings: AnalysisSettings,
}

impl AnalysisClient {
    pub fn new(transport: Arc<dyn LlmTransport>, settings: AnalysisSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analyze `code`, substituting the fallback analysis on any failure.
    pub async fn analyze(&self, code: &str, language: &str, hint: &str) -> ReviewAnalysis {
        match self.try_analyze(code, language, hint).await {
            Ok(analysis) => analysis,
            Err(e) => Self::fallback_for(&e, language, hint),
        }
    }

    /// Log a failed call and build the fallback analysis standing in for it.
    pub fn fallback_for(error: &AnalysisError, language: &str, hint: &str) -> ReviewAnalysis {
        let message = error.to_string();
        let reason = classify_error(&message).unwrap_or(match error {
            AnalysisError::Malformed(_) => "Unusable response",
            _ => "Request failed",
        });
        warn!(language, hint, reason, error = %message, "analysis failed, using fallback");
        ReviewAnalysis::fallback(message)
    }

    /// Analyze `code`, surfacing failures instead of falling back.
    pub async fn try_analyze(
        &self,
        code: &str,
        language: &str,
        hint: &str,
    ) -> Result<ReviewAnalysis, AnalysisError> {
        let prompt = build_prompt(code, language, hint);
        let started = Instant::now();

        let response = tokio::time::timeout(
            self.settings.timeout,
            self.transport.submit(
                SYSTEM_PROMPT,
                &prompt,
                self.settings.temperature,
                self.settings.max_tokens,
            ),
        )
        .await
        .map_err(|_| AnalysisError::Timeout(self.settings.timeout))??;

        debug!(
            language,
            hint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = response.len(),
            "model call finished"
        );

        parse_analysis_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Transport returning a fixed reply and remembering what it was sent.
    struct FixedTransport {
        reply: Result<String, String>,
        delay: Option<Duration>,
        seen: Mutex<Vec<(String, String, f64, u64)>>,
    }

    impl FixedTransport {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn err(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmTransport for FixedTransport {
        async fn submit(
            &self,
            system: &str,
            prompt: &str,
            temperature: f64,
            max_tokens: u64,
        ) -> Result<String, TransportError> {
            self.seen.lock().unwrap().push((
                system.to_string(),
                prompt.to_string(),
                temperature,
                max_tokens,
            ));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map_err(TransportError::ApiError)
        }
    }

    fn client(transport: Arc<FixedTransport>) -> AnalysisClient {
        AnalysisClient::new(transport, AnalysisSettings::default())
    }

    #[tokio::test]
    async fn analyze_parses_model_reply() {
        let transport = Arc::new(FixedTransport::ok(
            r#"{"readability_score": 9, "overall_summary": "Clean"}"#,
        ));
        let analysis = client(transport.clone()).analyze("x = 1", "python", "").await;
        assert_eq!(analysis.readability, 9);
        assert_eq!(analysis.modularity, 5);
        assert_eq!(analysis.summary, "Clean");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (system, prompt, temperature, max_tokens) = &seen[0];
        assert_eq!(system, SYSTEM_PROMPT);
        assert!(prompt.contains("```python\nx = 1\n```"));
        assert_eq!(*temperature, 0.3);
        assert_eq!(*max_tokens, 2000);
    }

    #[tokio::test]
    async fn transport_error_becomes_fallback() {
        let transport = Arc::new(FixedTransport::err("Groq API error: 429 Too Many Requests"));
        let analysis = client(transport).analyze("x = 1", "python", "").await;
        assert!(analysis.summary.starts_with("Analysis failed: "));
        assert_eq!(analysis.scores().map(|(_, s)| s), [5, 5, 5]);
        assert!(analysis.summary.contains("429"));
    }

    #[tokio::test]
    async fn malformed_reply_becomes_fallback() {
        let transport = Arc::new(FixedTransport::ok("Sorry, I can't help with that."));
        let analysis = client(transport).analyze("x = 1", "python", "").await;
        assert!(analysis.summary.starts_with("Analysis failed: malformed response"));
        assert_eq!(analysis.strengths, vec!["Code structure appears standard"]);
    }

    #[tokio::test]
    async fn slow_transport_times_out() {
        let transport = Arc::new(FixedTransport {
            delay: Some(Duration::from_secs(10)),
            ..FixedTransport::ok("{}")
        });
        let settings = AnalysisSettings {
            timeout: Duration::from_millis(50),
            ..AnalysisSettings::default()
        };
        let client = AnalysisClient::new(transport, settings);

        let err = client.try_analyze("x = 1", "python", "").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout(d) if d == Duration::from_millis(50)));

        let analysis = client.analyze("x = 1", "python", "").await;
        assert_eq!(analysis.summary, "Analysis failed: request timed out after 50ms");
    }

    #[test]
    fn settings_follow_config() {
        let config = AnalysisConfig {
            temperature: 0.0,
            max_tokens: 512,
            timeout_secs: 5,
        };
        let settings = AnalysisSettings::from(&config);
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_tokens, 512);
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }
}
