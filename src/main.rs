//! critiq: LLM-assisted code review CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use critiq::aggregator;
use critiq::analysis;
use critiq::chunker;
use critiq::config;
use critiq::constants;
use critiq::env;
use critiq::history;
use critiq::language;
use critiq::models;
use critiq::providers;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aggregator::ReviewAggregator;
use analysis::{AnalysisClient, AnalysisSettings};
use chunker::Chunker;
use cli::args::{ChunksArgs, Cli, Command, HistoryArgs, ReviewArgs, ShowArgs, StatsArgs};
use config::Config;
use env::Env;
use history::{FileStore, ReviewQuery, ReviewStore};
use models::{CodeReview, ReviewStats};
use providers::rig::RigTransport;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let env = Env::real();
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let config = Config::load(Some(&cwd), &env).context("failed to load configuration")?;

    let renderer = cli.format.renderer();
    let output = match cli.command {
        Command::Review(args) => run_review(args, config, renderer.as_ref()).await?,
        Command::Chunks(args) => run_chunks(args, &config, renderer.as_ref()).await?,
        Command::Languages => run_languages(),
        Command::History(args) => run_history(args, &config, renderer.as_ref()).await?,
        Command::Show(args) => run_show(args, &config, renderer.as_ref()).await?,
        Command::Stats(args) => run_stats(args, &config, renderer.as_ref()).await?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Log to stderr so stdout stays clean for rendered output.
///
/// `RUST_LOG` wins over `--verbose` when set.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={default_level}", constants::APP_NAME)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open_store(config: &Config) -> Result<FileStore> {
    let dir = config
        .history
        .resolved_dir()
        .context("could not determine the review history directory; set [history] dir")?;
    Ok(FileStore::new_with_dir(dir))
}

/// Review one file, store the record and render it.
async fn run_review(
    args: ReviewArgs,
    mut config: Config,
    renderer: &dyn critiq::output::OutputRenderer,
) -> Result<String> {
    if let Some(size) = args.max_chunk_size {
        if size == 0 {
            bail!("--max-chunk-size must be greater than zero");
        }
        config.chunking.max_chunk_size = size;
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            bail!("--timeout must be greater than zero");
        }
        config.analysis.timeout_secs = secs;
    }
    if args.no_history {
        config.history.enabled = false;
    }

    let content = cli::read_source(&args.file, config.review.max_file_size).await?;
    let filename = cli::display_name(&args.file);

    let transport = RigTransport::new(config.provider.clone())
        .context("failed to set up the LLM provider")?;
    info!(provider = %config.provider.name, model = transport.model(), "using provider");

    let client = AnalysisClient::new(
        Arc::new(transport),
        AnalysisSettings::from(&config.analysis),
    );
    let chunker = Chunker::new(config.chunking.max_chunk_size)
        .with_min_chunk_size(config.chunking.min_chunk_size);
    let aggregator = ReviewAggregator::new(chunker, client);

    let result = aggregator.review_file(&filename, &content).await;
    let review = CodeReview::new(&filename, result.language, &content, result.analysis, args.user);

    if config.history.enabled {
        let store = open_store(&config)?;
        store
            .insert(&review)
            .await
            .context("failed to store the review")?;
    }

    Ok(renderer.render_review(&review))
}

/// Print the chunk plan for a file.
async fn run_chunks(
    args: ChunksArgs,
    config: &Config,
    renderer: &dyn critiq::output::OutputRenderer,
) -> Result<String> {
    let max_chunk_size = args.max_chunk_size.unwrap_or(config.chunking.max_chunk_size);
    if max_chunk_size == 0 {
        bail!("--max-chunk-size must be greater than zero");
    }

    let content = cli::read_source(&args.file, config.review.max_file_size).await?;
    let filename = cli::display_name(&args.file);
    let language = language::detect(&filename);
    let chunks = Chunker::new(max_chunk_size)
        .with_min_chunk_size(config.chunking.min_chunk_size)
        .chunk(&content, language);

    Ok(renderer.render_chunks(&filename, language, &chunks))
}

/// List supported extensions.
fn run_languages() -> String {
    use colored::Colorize;

    let mut out = String::new();
    for (ext, tag) in language::supported_extensions() {
        out.push_str(&format!("  {:<8} {}\n", ext.bold(), tag));
    }
    out.push_str(&format!(
        "  {}\n",
        format!("anything else: {}", language::UNKNOWN_LANGUAGE).dimmed()
    ));
    out
}

async fn run_history(
    args: HistoryArgs,
    config: &Config,
    renderer: &dyn critiq::output::OutputRenderer,
) -> Result<String> {
    let store = open_store(config)?;
    let reviews = store
        .list(&ReviewQuery {
            limit: args.limit,
            skip: args.skip,
            user_id: args.user,
        })
        .await
        .context("failed to list reviews")?;
    Ok(renderer.render_history(&reviews))
}

async fn run_show(
    args: ShowArgs,
    config: &Config,
    renderer: &dyn critiq::output::OutputRenderer,
) -> Result<String> {
    let store = open_store(config)?;
    let review = store
        .get(&args.id)
        .await
        .with_context(|| format!("failed to load review {}", args.id))?;
    match review {
        Some(review) => Ok(renderer.render_review(&review)),
        None => bail!("review not found: {}", args.id),
    }
}

async fn run_stats(
    args: StatsArgs,
    config: &Config,
    renderer: &dyn critiq::output::OutputRenderer,
) -> Result<String> {
    let store = open_store(config)?;
    let reviews = store
        .list(&ReviewQuery::all(args.user))
        .await
        .context("failed to list reviews")?;
    Ok(renderer.render_stats(&ReviewStats::from_reviews(&reviews)))
}
