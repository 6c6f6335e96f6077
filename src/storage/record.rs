//! On-disk checkpoint layout
//!
//! The JSON shape is kept compatible with checkpoints written by earlier
//! versions of the tool: `playerDict` maps summoner ids to `[tier, division]`
//! pairs and the frontier is stored as two plain arrays.

use crate::state::{
    AccountId, CrawlState, Division, Frontier, GameId, ParticipantId, RankEntry, Region, Tier,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized form of a [`CrawlState`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRecord {
    pub region: String,
    pub player_dict: BTreeMap<ParticipantId, (Tier, Division)>,
    pub game_ids: Vec<GameId>,
    pub unused_account_players: Vec<AccountId>,
    pub used_account_players: Vec<AccountId>,
}

impl CheckpointRecord {
    /// Captures a crawl state for writing
    pub fn from_state(state: &CrawlState) -> Self {
        Self {
            region: state.region().to_string(),
            player_dict: state
                .ranks()
                .iter()
                .map(|(id, rank)| (id.clone(), (rank.tier, rank.division)))
                .collect(),
            game_ids: state.visited_games().iter().copied().collect(),
            unused_account_players: state.frontier().pending().cloned().collect(),
            used_account_players: state.frontier().processed().cloned().collect(),
        }
    }

    /// Rebuilds the crawl state
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlState)` - The record describes a valid state
    /// * `Err(String)` - Reason the record cannot be used
    pub fn into_state(self) -> Result<CrawlState, String> {
        let region = Region::parse(&self.region).map_err(|e| e.to_string())?;

        let ranks = self
            .player_dict
            .into_iter()
            .map(|(id, (tier, division))| (id, RankEntry::new(tier, division)))
            .collect();

        Ok(CrawlState::from_parts(
            region,
            ranks,
            self.game_ids.into_iter().collect(),
            Frontier::from_parts(self.unused_account_players, self.used_account_players),
        ))
    }
}
