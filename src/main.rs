// Tue Jan 13 2026 - Alex

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use gorest_aggregator::{
    config::Config,
    engine::{EngineSettings, PoolMetrics, UserAggregator},
    fetch::{HttpFetcher, InMemoryFetcher, ResourceFetcher},
    output::{JsonWriter, Summary},
    utils::{logging, measure_time},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Fetches gorest users with their posts, comments and todos", long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    token: Option<String>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    per_page: Option<u32>,

    #[arg(short, long)]
    workers: Option<usize>,

    #[arg(long)]
    fetch_concurrency: Option<usize>,

    #[arg(long)]
    nested_concurrency: Option<usize>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    compact: bool,

    /// Use the built-in sample dataset instead of the remote API
    #[arg(long)]
    offline: bool,

    #[arg(long)]
    metrics: bool,

    #[arg(long)]
    no_progress: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(ref url) = args.base_url {
        config = config.with_base_url(url);
    }
    if let Some(ref token) = args.token {
        config = config.with_access_token(token.clone());
    }
    if args.page.is_some() || args.per_page.is_some() {
        let page = args.page.unwrap_or(config.page);
        let per_page = args.per_page.unwrap_or(config.per_page);
        config = config.with_page(page, per_page);
    }
    if let Some(workers) = args.workers {
        config = config.with_branch_workers(workers);
    }
    if let Some(n) = args.fetch_concurrency {
        config = config.with_fetch_concurrency(n);
    }
    if let Some(n) = args.nested_concurrency {
        config = config.with_nested_fetch_concurrency(n);
    }
    if args.compact {
        config.pretty_output = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn spinner(enabled: bool) -> Result<Option<ProgressBar>> {
    if !enabled {
        return Ok(None);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Aggregating users...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(pb))
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;

    let fetcher: Arc<dyn ResourceFetcher> = if args.offline {
        eprintln!("{} Using built-in sample dataset", "[*]".blue());
        Arc::new(InMemoryFetcher::sample())
    } else {
        eprintln!("{} Fetching from {}", "[*]".blue(), config.base_url);
        Arc::new(HttpFetcher::new(&config).context("Failed to create HTTP client")?)
    };

    let metrics = Arc::new(PoolMetrics::new());
    let aggregator = UserAggregator::new(fetcher)
        .with_settings(EngineSettings::from(&config))
        .with_observer(metrics.clone());

    let progress = spinner(!args.no_progress)?;
    let (result, elapsed) = measure_time(|| aggregator.aggregate_page(&config.page_request()));

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let page = result.context("Aggregation failed")?;
    let writer = JsonWriter::new().with_pretty_print(config.pretty_output);

    match &args.output {
        Some(path) => {
            writer.write_to_file(&page, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Results saved to: {}", "[+]".green(), path.display());
        }
        None => writer.write_to(&page, io::stdout().lock())?,
    }

    eprintln!();
    eprintln!("{}", "Summary".cyan().bold());
    eprintln!("{}", "-".repeat(40).cyan());
    for (label, value) in Summary::from_page(&page, elapsed).lines() {
        eprintln!("  {:<10} {}", label, value.green());
    }

    if args.metrics {
        let snap = metrics.snapshot();
        eprintln!();
        eprintln!("{}", "Worker pools".cyan().bold());
        eprintln!("  tasks submitted: {}", snap.submitted);
        eprintln!("  tasks completed: {} ({} panicked)", snap.completed, snap.failed);
    }

    Ok(())
}
