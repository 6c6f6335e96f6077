//! Rank-Ripple main entry point
//!
//! This is the command-line interface for the Rank-Ripple ladder crawler.

use anyhow::{bail, Context};
use clap::Parser;
use rank_ripple::config::{load_config_with_hash, validate, Config};
use rank_ripple::crawler::{run_crawl, CompletionReason, CrawlRequest};
use rank_ripple::output::{export_rankings, load_statistics, print_statistics};
use rank_ripple::state::{AccountId, Region};
use rank_ripple::storage::{load_latest, open_existing_store, CheckpointStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Rank-Ripple: a ranked ladder crawler
///
/// Rank-Ripple walks the ranked solo queue outward from a seed account,
/// recording the tier and division of every player it meets. Progress is
/// checkpointed after every account so an interrupted crawl resumes.
#[derive(Parser, Debug)]
#[command(name = "rank-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A ranked ladder crawler", long_about = None)]
struct Cli {
    /// Provider API key
    #[arg(value_name = "PROVIDER_KEY")]
    provider_key: String,

    /// Platform region to crawl (na1, euw1, kr, ...)
    #[arg(value_name = "REGION")]
    region: String,

    /// Stop once this many players are ranked
    #[arg(long, value_name = "N")]
    max_players: Option<usize>,

    /// Seed account; required only when no checkpoint exists
    #[arg(long, value_name = "ID")]
    account_id: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding checkpoint files
    #[arg(long, value_name = "DIR")]
    checkpoint_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show whether the crawl would resume or seed
    #[arg(long, conflicts_with_all = ["stats", "export_db"])]
    dry_run: bool,

    /// Show statistics of the latest checkpoint and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_db"])]
    stats: bool,

    /// Write the latest checkpoint's rank mapping to a SQLite database and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let region = Region::parse(&cli.region)?;
    let seed = cli.account_id.as_deref().map(AccountId::new);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &region, seed.as_ref())
    } else if cli.stats {
        handle_stats(&config, &region)
    } else if let Some(path) = &cli.export_db {
        handle_export_db(&config, &region, path)
    } else {
        handle_crawl(config, cli.provider_key, region, seed).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rank_ripple=info,warn"),
            1 => EnvFilter::new("rank_ripple=debug,info"),
            2 => EnvFilter::new("rank_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_players) = cli.max_players {
        config.crawler.max_players = max_players;
    }
    if let Some(dir) = &cli.checkpoint_dir {
        config.checkpoint.directory = dir.to_string_lossy().into_owned();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(
    config: &Config,
    region: &Region,
    seed: Option<&AccountId>,
) -> anyhow::Result<()> {
    println!("=== Rank-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Region: {}", region);
    println!("  Max players: {}", config.crawler.max_players);
    println!("  Target season: {}", config.crawler.target_season);
    println!("  Match queue: {}", config.crawler.match_queue);
    println!("  Rank queue: {}", config.crawler.rank_queue);

    println!("\nProvider:");
    println!("  Base URL: {}", config.provider.base_url);
    println!("  Request timeout: {}s", config.provider.request_timeout_secs);
    println!(
        "  Default throttle wait: {}ms",
        config.provider.default_retry_wait_ms
    );

    println!("\nCheckpoints:");
    println!("  Directory: {}", config.checkpoint.directory);

    // Look without creating the directory
    let dir = Path::new(&config.checkpoint.directory);
    let latest = if dir.is_dir() {
        open_existing_store(dir)?.find_latest(region)?
    } else {
        None
    };

    println!("\n✓ Configuration is valid");
    match (latest, seed) {
        (Some(handle), _) => println!("✓ Would resume from checkpoint {}", handle.name),
        (None, Some(account)) => println!("✓ Would start a new crawl from account {}", account),
        (None, None) => bail!(
            "no checkpoint found for region {}; pass --account-id to start a new crawl",
            region
        ),
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics of the latest checkpoint
fn handle_stats(config: &Config, region: &Region) -> anyhow::Result<()> {
    println!("Checkpoint directory: {}\n", config.checkpoint.directory);

    let store = open_existing_store(Path::new(&config.checkpoint.directory))?;
    match load_statistics(&store, region)? {
        Some((handle, stats)) => {
            println!("Checkpoint: {}\n", handle.name);
            print_statistics(&stats);
            Ok(())
        }
        None => bail!("no checkpoint found for region {}", region),
    }
}

/// Handles the --export-db mode: writes the rank mapping to SQLite
fn handle_export_db(config: &Config, region: &Region, path: &Path) -> anyhow::Result<()> {
    println!("=== Exporting Rank Mapping ===\n");

    let store = open_existing_store(Path::new(&config.checkpoint.directory))?;
    let (handle, state) = match load_latest(&store, region)? {
        Some(latest) => latest,
        None => bail!("no checkpoint found for region {}", region),
    };

    println!("Checkpoint: {}", handle.name);
    println!("Output: {}", path.display());
    println!();

    let written = export_rankings(&state, path)
        .with_context(|| format!("failed to export to {}", path.display()))?;

    println!("✓ Exported {} players to: {}", written, path.display());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    api_key: String,
    region: Region,
    seed: Option<AccountId>,
) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} for up to {} players (season {})",
        region,
        config.crawler.max_players,
        config.crawler.target_season
    );

    let request = CrawlRequest {
        api_key,
        region,
        seed,
    };

    // Run the crawler
    match run_crawl(config, request).await {
        Ok(summary) => {
            let reason = match summary.reason {
                CompletionReason::TargetReached => "target reached",
                CompletionReason::FrontierExhausted => "frontier exhausted",
            };
            tracing::info!(
                "Crawl completed successfully ({}): {} players mapped",
                reason,
                summary.state.rank_count()
            );
            if let Some(handle) = summary.last_checkpoint {
                tracing::info!("Latest checkpoint: {}", handle.name);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
