//! Aggregate crawl state
//!
//! Everything that must survive a restart lives in [`CrawlState`]: the
//! result mapping, the visited games, and the frontier. The engine owns one
//! value of it and passes it through each iteration.

use crate::state::{AccountId, Frontier, GameId, ParticipantId, RankEntry, Region};
use std::collections::{BTreeMap, BTreeSet};

/// The unit of durability for a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    region: Region,
    ranks: BTreeMap<ParticipantId, RankEntry>,
    visited_games: BTreeSet<GameId>,
    frontier: Frontier,
}

impl CrawlState {
    /// Creates a fresh state with a single seed account in the frontier
    pub fn seeded(region: Region, seed: AccountId) -> Self {
        let mut frontier = Frontier::new();
        frontier.enqueue_if_new(seed);
        Self {
            region,
            ranks: BTreeMap::new(),
            visited_games: BTreeSet::new(),
            frontier,
        }
    }

    /// Rebuilds a state from its persisted parts
    pub fn from_parts(
        region: Region,
        ranks: BTreeMap<ParticipantId, RankEntry>,
        visited_games: BTreeSet<GameId>,
        frontier: Frontier,
    ) -> Self {
        Self {
            region,
            ranks,
            visited_games,
            frontier,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    // ===== Result Mapping =====

    /// The result mapping: participant -> rank
    pub fn ranks(&self) -> &BTreeMap<ParticipantId, RankEntry> {
        &self.ranks
    }

    /// Number of participants with a resolved rank
    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_ranked(&self, participant: &ParticipantId) -> bool {
        self.ranks.contains_key(participant)
    }

    /// Records a participant's rank unless one is already set
    ///
    /// # Returns
    ///
    /// `true` if the entry was inserted, `false` if the participant already
    /// had a rank (the existing entry is kept)
    pub fn record_rank(&mut self, participant: ParticipantId, rank: RankEntry) -> bool {
        if self.ranks.contains_key(&participant) {
            return false;
        }
        self.ranks.insert(participant, rank);
        true
    }

    /// Returns true once the mapping holds at least `target` participants
    pub fn target_reached(&self, target: usize) -> bool {
        self.ranks.len() >= target
    }

    // ===== Visited Games =====

    pub fn visited_games(&self) -> &BTreeSet<GameId> {
        &self.visited_games
    }

    pub fn has_visited(&self, game: GameId) -> bool {
        self.visited_games.contains(&game)
    }

    /// Records a game as visited
    ///
    /// # Returns
    ///
    /// `true` if the game had not been seen before
    pub fn mark_game_visited(&mut self, game: GameId) -> bool {
        self.visited_games.insert(game)
    }

    // ===== Frontier =====

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Division, Tier};

    fn region() -> Region {
        Region::parse("na1").unwrap()
    }

    #[test]
    fn test_seeded_state() {
        let state = CrawlState::seeded(region(), AccountId::new("acc-1"));
        assert_eq!(state.rank_count(), 0);
        assert!(state.visited_games().is_empty());
        assert_eq!(state.frontier().pending_len(), 1);
        assert_eq!(state.region().as_str(), "na1");
    }

    #[test]
    fn test_record_rank_never_overwrites() {
        let mut state = CrawlState::seeded(region(), AccountId::new("acc-1"));
        let gold = RankEntry::new(Tier::Gold, Division::II);
        let iron = RankEntry::new(Tier::Iron, Division::IV);

        assert!(state.record_rank(ParticipantId::new("p1"), gold));
        assert!(!state.record_rank(ParticipantId::new("p1"), iron));
        assert_eq!(state.ranks()[&ParticipantId::new("p1")], gold);
        assert!(state.is_ranked(&ParticipantId::new("p1")));
    }

    #[test]
    fn test_mark_game_visited_once() {
        let mut state = CrawlState::seeded(region(), AccountId::new("acc-1"));
        assert!(state.mark_game_visited(GameId::new(7)));
        assert!(!state.mark_game_visited(GameId::new(7)));
        assert!(state.has_visited(GameId::new(7)));
        assert_eq!(state.visited_games().len(), 1);
    }

    #[test]
    fn test_target_reached() {
        let mut state = CrawlState::seeded(region(), AccountId::new("acc-1"));
        assert!(state.target_reached(0));
        assert!(!state.target_reached(1));
        state.record_rank(
            ParticipantId::new("p1"),
            RankEntry::new(Tier::Silver, Division::I),
        );
        assert!(state.target_reached(1));
    }
}
