//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::{CodeChunk, CodeReview, ReviewStats};

/// Trait for rendering reviews and related listings to an output format.
pub trait OutputRenderer {
    /// Render one complete review.
    fn render_review(&self, review: &CodeReview) -> String;

    /// Render a page of stored reviews, newest first.
    fn render_history(&self, reviews: &[CodeReview]) -> String;

    /// Render aggregate statistics.
    fn render_stats(&self, stats: &ReviewStats) -> String;

    /// Render the chunk plan for a file without analyzing it.
    fn render_chunks(&self, filename: &str, language: &str, chunks: &[CodeChunk]) -> String;
}
