//! JSON output renderer.
//!
//! Reviews are emitted as the stored record, so `critiq show --format json`
//! and the history file contain the same document.

use serde::Serialize;

use crate::models::{CodeChunk, CodeReview, ReviewStats};
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputRenderer for JsonRenderer {
    fn render_review(&self, review: &CodeReview) -> String {
        to_json(review)
    }

    fn render_history(&self, reviews: &[CodeReview]) -> String {
        let entries: Vec<_> = reviews
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "filename": r.filename,
                    "language": r.language,
                    "analysis": r.analysis,
                    "created_at": r.created_at,
                })
            })
            .collect();
        to_json(&serde_json::json!({ "reviews": entries }))
    }

    fn render_stats(&self, stats: &ReviewStats) -> String {
        to_json(stats)
    }

    fn render_chunks(&self, filename: &str, language: &str, chunks: &[CodeChunk]) -> String {
        let plan: Vec<_> = chunks
            .iter()
            .map(|c| {
                serde_json::json!({
                    "start_line": c.start_line,
                    "end_line": c.end_line,
                    "chunk_type": c.chunk_type,
                    "context": c.context,
                    "chars": c.content.chars().count(),
                })
            })
            .collect();
        to_json(&serde_json::json!({
            "filename": filename,
            "language": language,
            "chunks": plan,
        }))
    }
}
