//! File-level review pipeline.
//!
//! Detects the language, chunks the file, analyzes every chunk in order
//! and merges the results. Chunks are analyzed one after another; a failed
//! chunk contributes a fallback analysis and the remaining chunks still run.

pub mod merge;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::analysis::AnalysisClient;
use crate::chunker::Chunker;
use crate::language;
use crate::models::ReviewAnalysis;

pub use merge::merge;

/// Outcome of reviewing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReview {
    pub language: &'static str,
    pub chunk_count: usize,
    /// Chunks whose analysis failed and were replaced by the fallback.
    pub failed_chunks: usize,
    pub analysis: ReviewAnalysis,
}

/// Drives chunking and per-chunk analysis for whole files.
#[derive(Clone)]
pub struct ReviewAggregator {
    chunker: Chunker,
    client: AnalysisClient,
}

impl ReviewAggregator {
    pub fn new(chunker: Chunker, client: AnalysisClient) -> Self {
        Self { chunker, client }
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Review `content` and return the merged analysis.
    pub async fn produce_review(&self, filename: &str, content: &str) -> ReviewAnalysis {
        self.review_file(filename, content).await.analysis
    }

    /// Review `content`, also reporting the detected language and chunk count.
    pub async fn review_file(&self, filename: &str, content: &str) -> FileReview {
        let language = language::detect(filename);
        let chunks = self.chunker.chunk(content, language);
        let total = chunks.len();
        let started = Instant::now();

        info!(filename, language, chunks = total, "reviewing file");

        let mut failed_chunks = 0;
        let analysis = match chunks.as_slice() {
            [] => {
                warn!(filename, "chunker produced no chunks");
                ReviewAnalysis::fallback("no code segments to analyze")
            }
            [only] => {
                self.analyze_chunk(&only.content, language, &only.context, &mut failed_chunks)
                    .await
            }
            _ => {
                let mut analyses = Vec::with_capacity(total);
                for (i, chunk) in chunks.iter().enumerate() {
                    let hint = format!("chunk {}/{total}: {}", i + 1, chunk.context);
                    debug!(
                        filename,
                        start_line = chunk.start_line,
                        end_line = chunk.end_line,
                        chunk_type = %chunk.chunk_type,
                        "analyzing {hint}"
                    );
                    analyses.push(
                        self.analyze_chunk(&chunk.content, language, &hint, &mut failed_chunks)
                            .await,
                    );
                }
                merge(analyses)
                    .unwrap_or_else(|| ReviewAnalysis::fallback("no code segments to analyze"))
            }
        };

        info!(
            filename,
            elapsed_ms = started.elapsed().as_millis() as u64,
            failed_chunks,
            "review finished"
        );

        FileReview {
            language,
            chunk_count: total,
            failed_chunks,
            analysis,
        }
    }

    async fn analyze_chunk(
        &self,
        code: &str,
        language: &str,
        hint: &str,
        failed_chunks: &mut usize,
    ) -> ReviewAnalysis {
        match self.client.try_analyze(code, language, hint).await {
            Ok(analysis) => analysis,
            Err(e) => {
                *failed_chunks += 1;
                AnalysisClient::fallback_for(&e, language, hint)
            }
        }
    }
}
