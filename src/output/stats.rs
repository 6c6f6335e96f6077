//! Statistics generation from crawl state
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from a loaded checkpoint.

use crate::state::{CrawlState, Division, Tier};
use crate::storage::{load_latest, CheckpointHandle, CheckpointStore};
use crate::{RippleError, Region};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankStatistics {
    pub region: Region,

    /// Number of participants with a recorded rank
    pub mapped_players: usize,

    /// Number of games already expanded
    pub visited_games: usize,

    /// Accounts waiting in the frontier (may contain repeats)
    pub pending_accounts: usize,

    /// Accounts already expanded
    pub processed_accounts: usize,

    /// Count of mapped players per tier
    pub players_by_tier: BTreeMap<Tier, usize>,

    /// Count of mapped players per (tier, division)
    pub players_by_division: BTreeMap<(Tier, Division), usize>,
}

impl RankStatistics {
    /// Computes statistics from a crawl state
    pub fn from_state(state: &CrawlState) -> Self {
        let mut players_by_tier = BTreeMap::new();
        let mut players_by_division = BTreeMap::new();

        for rank in state.ranks().values() {
            *players_by_tier.entry(rank.tier).or_insert(0) += 1;
            *players_by_division
                .entry((rank.tier, rank.division))
                .or_insert(0) += 1;
        }

        Self {
            region: state.region().clone(),
            mapped_players: state.rank_count(),
            visited_games: state.visited_games().len(),
            pending_accounts: state.frontier().pending_len(),
            processed_accounts: state.frontier().processed_len(),
            players_by_tier,
            players_by_division,
        }
    }

    /// Share of mapped players in a tier, as a percentage
    pub fn tier_share(&self, tier: Tier) -> f64 {
        if self.mapped_players == 0 {
            return 0.0;
        }
        let count = self.players_by_tier.get(&tier).copied().unwrap_or(0);
        (count as f64 / self.mapped_players as f64) * 100.0
    }
}

/// Loads statistics from the newest checkpoint of a region
///
/// # Arguments
///
/// * `store` - The checkpoint store to read
/// * `region` - Region whose latest checkpoint is summarized
///
/// # Returns
///
/// * `Ok(Some((handle, stats)))` - Statistics of the newest checkpoint
/// * `Ok(None)` - No checkpoint exists for the region
/// * `Err(RippleError)` - The checkpoint could not be read
pub fn load_statistics(
    store: &dyn CheckpointStore,
    region: &Region,
) -> Result<Option<(CheckpointHandle, RankStatistics)>, RippleError> {
    Ok(load_latest(store, region)?
        .map(|(handle, state)| (handle, RankStatistics::from_state(&state))))
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RankStatistics) {
    println!("=== Crawl Statistics ({}) ===\n", stats.region);

    println!("Overview:");
    println!("  Players mapped: {}", stats.mapped_players);
    println!("  Games visited: {}", stats.visited_games);
    println!("  Accounts expanded: {}", stats.processed_accounts);
    println!("  Accounts pending: {}", stats.pending_accounts);
    println!();

    if stats.players_by_tier.is_empty() {
        println!("No ranked players recorded yet");
        return;
    }

    println!("Players by Tier:");
    // Highest tier first
    for (tier, count) in stats.players_by_tier.iter().rev() {
        println!(
            "  {:<12} {:>7} ({:.1}%)",
            tier.as_str(),
            count,
            stats.tier_share(*tier)
        );

        let divisions: Vec<String> = stats
            .players_by_division
            .range((*tier, Division::I)..=(*tier, Division::IV))
            .map(|((_, division), n)| format!("{} {}", division, n))
            .collect();
        if divisions.len() > 1 {
            println!("  {:<12} {}", "", divisions.join(", "));
        }
    }
}
