//! Crawler module for rank discovery
//!
//! This module contains the core crawling logic, including:
//! - Choosing between resuming a checkpoint and seeding a fresh crawl
//! - Wiring the HTTP gateway, throttle retry and checkpoint store together
//! - The crawl engine itself

mod coordinator;
#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{
    local_now, select_new_games, Clock, CompletionReason, Coordinator, CrawlSettings,
    CrawlSummary, IterationReport, StepOutcome,
};

use crate::config::Config;
use crate::gateway::{RetryPolicy, RetryingGateway, RiotGateway};
use crate::state::{AccountId, CrawlState, Region};
use crate::storage::{load_latest, open_store, CheckpointHandle, CheckpointStore};
use crate::RippleError;
use std::path::Path;
use std::time::Duration;

/// What to crawl and with which credentials
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub api_key: String,
    pub region: Region,

    /// Account to start from when no checkpoint exists
    pub seed: Option<AccountId>,
}

/// Produces the state a crawl starts from
///
/// The newest checkpoint for the region wins over the seed account. The seed
/// is only required when there is nothing to resume.
///
/// # Returns
///
/// * `Ok((state, Some(handle)))` - Resuming from the given checkpoint
/// * `Ok((state, None))` - Fresh crawl seeded with the account
/// * `Err(RippleError::Usage)` - No checkpoint and no seed account
pub fn prepare_state(
    store: &dyn CheckpointStore,
    region: &Region,
    seed: Option<AccountId>,
) -> Result<(CrawlState, Option<CheckpointHandle>), RippleError> {
    if let Some((handle, state)) = load_latest(store, region)? {
        tracing::info!(
            "Resuming from checkpoint {} ({} players, {} pending accounts)",
            handle.name,
            state.rank_count(),
            state.frontier().pending_len()
        );
        if seed.is_some() {
            tracing::warn!("Ignoring seed account, checkpoint {} exists", handle.name);
        }
        return Ok((state, Some(handle)));
    }

    match seed {
        Some(account) => {
            tracing::info!("No checkpoint for {}, seeding with account {}", region, account);
            Ok((CrawlState::seeded(region.clone(), account), None))
        }
        None => Err(RippleError::Usage(format!(
            "no checkpoint found for region {}; pass --account-id to start a new crawl",
            region
        ))),
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the checkpoint directory
/// 2. Resume the newest checkpoint or seed a new crawl
/// 3. Build the HTTP gateway behind the throttle retry
/// 4. Expand accounts until the target size or an empty frontier
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `request` - Region, seed account and API key
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed successfully
/// * `Err(RippleError)` - Crawl failed; the newest checkpoint is the resume point
///
/// # Example
///
/// ```no_run
/// use rank_ripple::config::Config;
/// use rank_ripple::crawler::{run_crawl, CrawlRequest};
/// use rank_ripple::state::{AccountId, Region};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = CrawlRequest {
///     api_key: "RGAPI-...".to_string(),
///     region: Region::parse("na1")?,
///     seed: Some(AccountId::new("abc123")),
/// };
/// let summary = run_crawl(Config::default(), request).await?;
/// println!("{} players ranked", summary.state.rank_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, request: CrawlRequest) -> Result<CrawlSummary, RippleError> {
    let store = open_store(Path::new(&config.checkpoint.directory))?;
    let (state, resumed_from) = prepare_state(&store, &request.region, request.seed)?;

    let riot = RiotGateway::new(&request.api_key, &config.provider, &config.crawler)?;
    let policy = RetryPolicy::new(Duration::from_millis(config.provider.default_retry_wait_ms));
    let gateway = RetryingGateway::new(riot, policy);

    let mut coordinator = Coordinator::new(gateway, store, CrawlSettings::from(&config.crawler));
    if let Some(handle) = resumed_from {
        coordinator = coordinator.resuming_after(handle.timestamp);
    }

    coordinator.run(state).await
}
