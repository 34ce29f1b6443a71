//! critiq: LLM-assisted code review (library crate).
//!
//! The review pipeline lives in [`aggregator`]: files are split by
//! [`chunker`], each chunk is reviewed through [`analysis`], and the
//! per-chunk verdicts are merged into one [`models::ReviewAnalysis`].
//! Re-exports public modules for integration tests and the binary.

pub mod aggregator;
pub mod analysis;
pub mod chunker;
pub mod config;
pub mod constants;
pub mod env;
pub mod history;
pub mod language;
pub mod models;
pub mod output;
pub mod providers;
