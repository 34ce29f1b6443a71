//! Stored review records and statistics over them.

use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::analysis::ReviewAnalysis;

/// Number of recent reviews included in [`ReviewStats`].
pub const RECENT_REVIEWS: usize = 5;

/// A completed file review as handed to the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReview {
    pub id: String,
    pub filename: String,
    pub language: String,
    /// Size of the reviewed content in bytes.
    pub file_size: u64,
    pub lines_of_code: usize,
    pub analysis: ReviewAnalysis,
    /// Unix timestamp (seconds).
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl CodeReview {
    /// Assemble a new record with a fresh id and the current time.
    pub fn new(
        filename: &str,
        language: &str,
        content: &str,
        analysis: ReviewAnalysis,
        user_id: Option<String>,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            language: language.to_string(),
            file_size: content.len() as u64,
            lines_of_code: content.split('\n').count(),
            analysis,
            created_at,
            user_id,
        }
    }
}

/// Aggregate statistics over a set of stored reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total_reviews: usize,
    /// language → number of reviews.
    pub languages: IndexMap<String, usize>,
    pub avg_readability: f64,
    pub avg_modularity: f64,
    pub avg_maintainability: f64,
    pub recent_reviews: Vec<CodeReview>,
}

impl ReviewStats {
    /// Compute statistics from reviews ordered newest first.
    pub fn from_reviews(reviews: &[CodeReview]) -> Self {
        let mut languages = IndexMap::new();
        for review in reviews {
            *languages.entry(review.language.clone()).or_insert(0) += 1;
        }

        let avg = |score: fn(&ReviewAnalysis) -> u8| -> f64 {
            if reviews.is_empty() {
                return 0.0;
            }
            let sum: f64 = reviews.iter().map(|r| f64::from(score(&r.analysis))).sum();
            round_one_decimal(sum / reviews.len() as f64)
        };

        Self {
            total_reviews: reviews.len(),
            languages,
            avg_readability: avg(|a| a.readability),
            avg_modularity: avg(|a| a.modularity),
            avg_maintainability: avg(|a| a.maintainability),
            recent_reviews: reviews.iter().take(RECENT_REVIEWS).cloned().collect(),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
