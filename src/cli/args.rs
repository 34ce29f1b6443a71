//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use critiq::output::OutputRenderer;
use critiq::output::json::JsonRenderer;
use critiq::output::terminal::TerminalRenderer;

/// LLM-assisted code review for single source files.
#[derive(Parser, Debug)]
#[command(name = "critiq", version = critiq::constants::VERSION)]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a source file.
    Review(ReviewArgs),

    /// Show how a file would be chunked, without calling the model.
    Chunks(ChunksArgs),

    /// List supported file extensions and their language tags.
    Languages,

    /// List stored reviews, newest first.
    History(HistoryArgs),

    /// Show one stored review.
    Show(ShowArgs),

    /// Summarize stored reviews.
    Stats(StatsArgs),
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// File to review.
    pub file: PathBuf,

    /// Maximum chunk size in characters.
    #[arg(long)]
    pub max_chunk_size: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Record the review under this user id.
    #[arg(long)]
    pub user: Option<String>,

    /// Do not store the review in the history.
    #[arg(long, default_value_t = false)]
    pub no_history: bool,
}

/// Arguments for the `chunks` subcommand.
#[derive(Parser, Debug)]
pub struct ChunksArgs {
    /// File to split.
    pub file: PathBuf,

    /// Maximum chunk size in characters.
    #[arg(long)]
    pub max_chunk_size: Option<usize>,
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Maximum number of reviews to list.
    #[arg(long, default_value_t = critiq::history::DEFAULT_LIST_LIMIT)]
    pub limit: usize,

    /// Number of newest reviews to skip.
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Only reviews recorded for this user id.
    #[arg(long)]
    pub user: Option<String>,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Review id as printed by `review` or `history`.
    pub id: String,
}

/// Arguments for the `stats` subcommand.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Only reviews recorded for this user id.
    #[arg(long)]
    pub user: Option<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// The renderer for this format.
    pub fn renderer(&self) -> Box<dyn OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(TerminalRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}
