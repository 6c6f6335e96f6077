//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. One iteration:
//! - Dequeues the next unprocessed account from the frontier
//! - Lists its ranked matches and keeps unvisited games of the target season
//! - Fetches each new game's participants, enqueueing their accounts
//! - Resolves the solo queue rank of every newly seen participant
//! - Writes a checkpoint of the whole crawl state
//!
//! The loop stops once the rank mapping reaches the target size or the
//! frontier runs dry. Any non-throttle gateway failure aborts the crawl,
//! leaving the last checkpoint as the resume point.

use crate::config::CrawlerConfig;
use crate::gateway::{Gateway, MatchSummary};
use crate::state::{AccountId, CrawlPhase, CrawlState, GameId, ParticipantId, Region};
use crate::storage::naming::checkpoint_name;
use crate::storage::{CheckpointHandle, CheckpointStore, StorageError};
use crate::RippleError;
use chrono::{Local, NaiveDateTime, Timelike};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// How many successive timestamps a checkpoint write tries before giving up
const MAX_CHECKPOINT_ATTEMPTS: u32 = 120;

/// Source of checkpoint timestamps
pub type Clock = fn() -> NaiveDateTime;

/// Current local wall-clock time at second resolution
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Crawl parameters the engine cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Stop once this many participants are ranked
    pub max_players: usize,

    /// Only games from this season are expanded
    pub target_season: u32,
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_players: config.max_players,
            target_season: config.target_season,
        }
    }
}

/// What one completed iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    /// The account that was expanded
    pub account: AccountId,

    /// Unvisited games of the target season found in its match list
    pub games_found: usize,

    /// Participants whose rank was looked up
    pub participants_discovered: usize,

    /// Participants added to the rank mapping
    pub participants_ranked: usize,

    /// Checkpoint written at the end of the iteration
    pub checkpoint: CheckpointHandle,
}

/// Result of a single engine step
#[derive(Debug)]
pub enum StepOutcome {
    Processed(IterationReport),

    /// No unprocessed account was left
    Exhausted,
}

/// Why a crawl finished normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    TargetReached,
    FrontierExhausted,
}

/// Summary of a finished crawl
#[derive(Debug)]
pub struct CrawlSummary {
    pub state: CrawlState,
    pub phase: CrawlPhase,
    pub iterations: u64,
    pub reason: CompletionReason,

    /// Newest checkpoint written during this run, if any
    pub last_checkpoint: Option<CheckpointHandle>,
    pub elapsed: Duration,
}

/// Main crawl engine
///
/// Owns the gateway and the checkpoint store; the crawl state is passed in
/// and handed back by each step so callers always see a consistent snapshot.
pub struct Coordinator<G, S> {
    gateway: G,
    store: S,
    settings: CrawlSettings,
    clock: Clock,
    phase: CrawlPhase,
    last_checkpoint_at: Option<NaiveDateTime>,
}

impl<G: Gateway, S: CheckpointStore> Coordinator<G, S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `gateway` - Provider access, normally wrapped in a `RetryingGateway`
    /// * `store` - Where checkpoints are written
    /// * `settings` - Target size and season filter
    pub fn new(gateway: G, store: S, settings: CrawlSettings) -> Self {
        Self {
            gateway,
            store,
            settings,
            clock: local_now,
            phase: CrawlPhase::Idle,
            last_checkpoint_at: None,
        }
    }

    /// Replaces the timestamp source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Keeps new checkpoints strictly newer than the one the state came from
    pub fn resuming_after(mut self, timestamp: NaiveDateTime) -> Self {
        self.last_checkpoint_at = Some(timestamp);
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn settings(&self) -> CrawlSettings {
        self.settings
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the crawl until the target is reached or the frontier is empty
    ///
    /// The target is checked before every dequeue, so a run that starts with
    /// enough ranked participants finishes without touching the gateway.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Crawl finished normally
    /// * `Err(RippleError)` - Crawl aborted; the last checkpoint holds the
    ///   state of the last completed iteration
    pub async fn run(&mut self, mut state: CrawlState) -> Result<CrawlSummary, RippleError> {
        tracing::info!(
            "Starting crawl of {} ({} ranked, {} pending, target {})",
            state.region(),
            state.rank_count(),
            state.frontier().pending_len(),
            self.settings.max_players
        );

        let start_time = Instant::now();
        let mut iterations: u64 = 0;
        let mut last_checkpoint = None;

        let reason = loop {
            if state.target_reached(self.settings.max_players) {
                self.transition(CrawlPhase::Done)?;
                tracing::info!("Reached {} ranked players", state.rank_count());
                break CompletionReason::TargetReached;
            }

            match self.step(state).await? {
                (next, StepOutcome::Processed(report)) => {
                    state = next;
                    iterations += 1;
                    last_checkpoint = Some(report.checkpoint);

                    let elapsed = start_time.elapsed();
                    let rate = iterations as f64 / elapsed.as_secs_f64().max(1e-3) * 60.0;
                    tracing::info!(
                        "Progress: {} accounts expanded, {} players mapped, {} in frontier, {:.2} accounts/min",
                        iterations,
                        state.rank_count(),
                        state.frontier().pending_len(),
                        rate
                    );
                }
                (next, StepOutcome::Exhausted) => {
                    state = next;
                    break CompletionReason::FrontierExhausted;
                }
            }
        };

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl completed: {} accounts expanded, {} players mapped in {:?}",
            iterations,
            state.rank_count(),
            elapsed
        );

        Ok(CrawlSummary {
            state,
            phase: self.phase,
            iterations,
            reason,
            last_checkpoint,
            elapsed,
        })
    }

    /// Performs one iteration of the crawl
    ///
    /// On failure the coordinator moves to `Aborted` and the in-memory state
    /// is dropped; nothing from the failed iteration is persisted.
    pub async fn step(
        &mut self,
        state: CrawlState,
    ) -> Result<(CrawlState, StepOutcome), RippleError> {
        match self.advance(state).await {
            Ok(result) => Ok(result),
            Err(e) => {
                self.abort(&e);
                Err(e)
            }
        }
    }

    async fn advance(
        &mut self,
        mut state: CrawlState,
    ) -> Result<(CrawlState, StepOutcome), RippleError> {
        self.transition(CrawlPhase::Dequeuing)?;

        let account = match state.frontier_mut().dequeue_next() {
            Some(account) => account,
            None => {
                self.transition(CrawlPhase::Done)?;
                tracing::info!("Frontier is empty, crawl complete");
                return Ok((state, StepOutcome::Exhausted));
            }
        };
        let region = state.region().clone();

        self.transition(CrawlPhase::FetchingMatches)?;
        tracing::info!("Getting matches for account {}", account);
        let matches = self.gateway.list_ranked_matches(&region, &account).await?;
        let new_games = select_new_games(&mut state, &matches, self.settings.target_season);
        tracing::info!(
            "Found {} new games for account {} ({} listed)",
            new_games.len(),
            account,
            matches.len()
        );

        self.transition(CrawlPhase::FetchingDetails)?;
        let discovered = self
            .discover_participants(&mut state, &region, &new_games)
            .await?;
        tracing::info!("Participants to be ranked: {}", discovered.len());

        self.transition(CrawlPhase::FetchingRanks)?;
        let ranked = self.resolve_ranks(&mut state, &region, &discovered).await?;
        tracing::info!(
            "Added {} new players to mapping ({} total)",
            ranked,
            state.rank_count()
        );

        state.frontier_mut().mark_processed(account.clone());

        self.transition(CrawlPhase::Checkpointing)?;
        let checkpoint = self.save_checkpoint(&state)?;
        tracing::info!("Saved checkpoint {}", checkpoint.name);

        let report = IterationReport {
            account,
            games_found: new_games.len(),
            participants_discovered: discovered.len(),
            participants_ranked: ranked,
            checkpoint,
        };
        Ok((state, StepOutcome::Processed(report)))
    }

    /// Fetches game details and collects participants not yet ranked
    ///
    /// Each participant not yet ranked is returned once, in discovery order,
    /// and their account is offered to the frontier. Ranked participants are
    /// skipped entirely.
    async fn discover_participants(
        &self,
        state: &mut CrawlState,
        region: &Region,
        games: &[GameId],
    ) -> Result<Vec<ParticipantId>, RippleError> {
        let mut discovered = Vec::new();
        let mut seen = HashSet::new();

        for (index, game) in games.iter().enumerate() {
            let detail = self.gateway.fetch_match_detail(region, *game).await?;

            for participant in detail.participants {
                if state.is_ranked(&participant.participant_id)
                    || !seen.insert(participant.participant_id.clone())
                {
                    continue;
                }
                state.frontier_mut().enqueue_if_new(participant.account_id);
                discovered.push(participant.participant_id);
            }

            tracing::debug!(
                "Game {} ({}/{}): {} participants to be ranked so far",
                game,
                index + 1,
                games.len(),
                discovered.len()
            );
        }

        Ok(discovered)
    }

    /// Looks up ranks and records the ranked ones; returns how many were added
    async fn resolve_ranks(
        &self,
        state: &mut CrawlState,
        region: &Region,
        participants: &[ParticipantId],
    ) -> Result<usize, RippleError> {
        let mut added = 0;

        for participant in participants {
            match self.gateway.fetch_rank(region, participant).await? {
                Some(rank) => {
                    if state.record_rank(participant.clone(), rank) {
                        tracing::debug!("{} is {}", participant, rank);
                        added += 1;
                    }
                }
                None => tracing::debug!("{} has no solo queue rank", participant),
            }
        }

        Ok(added)
    }

    /// Writes a checkpoint, moving the timestamp forward on collisions
    ///
    /// Timestamps never go backwards: each checkpoint is strictly newer than
    /// the previous one, so the newest file is always the newest state.
    fn save_checkpoint(&mut self, state: &CrawlState) -> Result<CheckpointHandle, RippleError> {
        let mut timestamp = (self.clock)();
        if let Some(last) = self.last_checkpoint_at {
            if timestamp <= last {
                timestamp = last + chrono::Duration::seconds(1);
            }
        }

        for _ in 0..MAX_CHECKPOINT_ATTEMPTS {
            match self.store.save(state, timestamp) {
                Ok(handle) => {
                    self.last_checkpoint_at = Some(handle.timestamp);
                    return Ok(handle);
                }
                Err(StorageError::WriteConflict(name)) => {
                    tracing::debug!("Checkpoint {} already exists, trying next second", name);
                    timestamp += chrono::Duration::seconds(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::WriteConflict(checkpoint_name(state.region(), timestamp)).into())
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), RippleError> {
        if !self.phase.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    fn abort(&mut self, error: &RippleError) {
        tracing::error!("Crawl aborted during {}: {}", self.phase, error);
        if self.phase.can_transition_to(CrawlPhase::Aborted) {
            self.phase = CrawlPhase::Aborted;
        }
    }
}

/// Picks the unvisited games of the target season and marks them visited
///
/// # Arguments
///
/// * `state` - Crawl state whose visited set is updated
/// * `matches` - An account's match list
/// * `target_season` - Season to keep
///
/// # Returns
///
/// The newly visited games in match list order
pub fn select_new_games(
    state: &mut CrawlState,
    matches: &[MatchSummary],
    target_season: u32,
) -> Vec<GameId> {
    matches
        .iter()
        .filter(|summary| summary.season == target_season)
        .filter_map(|summary| {
            state
                .mark_game_visited(summary.game_id)
                .then_some(summary.game_id)
        })
        .collect()
}
