//! Deterministic gateway doubles for engine tests

use crate::gateway::{
    Gateway, GatewayError, GatewayResult, MatchDetail, MatchParticipant, MatchSummary, Sleeper,
};
use crate::state::{AccountId, Division, GameId, ParticipantId, RankEntry, Region, Tier};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const SEASON: u32 = 13;

/// In-memory provider serving a fixed match graph
#[derive(Default)]
pub struct ScriptedGateway {
    matchlists: HashMap<AccountId, Vec<MatchSummary>>,
    details: HashMap<GameId, Vec<MatchParticipant>>,
    ranks: HashMap<ParticipantId, RankEntry>,

    /// 1-based match list call that fails with HTTP 500
    pub fail_on_matchlist_call: Option<usize>,

    /// Throttle every other call of every operation
    pub throttle_alternate_calls: bool,

    matchlist_calls: AtomicUsize,
    total_calls: AtomicUsize,
    detail_calls: Mutex<HashMap<GameId, usize>>,
    rank_calls: Mutex<HashMap<ParticipantId, usize>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(mut self, account: &str, games: &[(u64, u32)]) -> Self {
        self.matchlists.insert(
            AccountId::new(account),
            games
                .iter()
                .map(|(game, season)| MatchSummary {
                    game_id: GameId::new(*game),
                    season: *season,
                })
                .collect(),
        );
        self
    }

    /// Registers a game's participants as (summoner, account) pairs
    pub fn with_game(mut self, game: u64, participants: &[(&str, &str)]) -> Self {
        self.details.insert(
            GameId::new(game),
            participants
                .iter()
                .map(|(summoner, account)| MatchParticipant {
                    participant_id: ParticipantId::new(*summoner),
                    account_id: AccountId::new(*account),
                })
                .collect(),
        );
        self
    }

    pub fn with_rank(mut self, summoner: &str, tier: Tier, division: Division) -> Self {
        self.ranks
            .insert(ParticipantId::new(summoner), RankEntry::new(tier, division));
        self
    }

    pub fn detail_calls(&self, game: u64) -> usize {
        self.detail_calls
            .lock()
            .unwrap()
            .get(&GameId::new(game))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_detail_calls(&self) -> usize {
        self.detail_calls.lock().unwrap().values().sum()
    }

    pub fn rank_calls(&self, summoner: &str) -> usize {
        self.rank_calls
            .lock()
            .unwrap()
            .get(&ParticipantId::new(summoner))
            .copied()
            .unwrap_or(0)
    }

    pub fn matchlist_calls(&self) -> usize {
        self.matchlist_calls.load(Ordering::SeqCst)
    }

    fn maybe_throttle(&self) -> GatewayResult<()> {
        let n = self.total_calls.fetch_add(1, Ordering::SeqCst);
        if self.throttle_alternate_calls && n % 2 == 0 {
            return Err(GatewayError::Throttled {
                retry_after: Some(Duration::from_secs(1)),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn list_ranked_matches(
        &self,
        _region: &Region,
        account: &AccountId,
    ) -> GatewayResult<Vec<MatchSummary>> {
        self.maybe_throttle()?;
        let n = self.matchlist_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_matchlist_call == Some(n) {
            return Err(GatewayError::Status {
                endpoint: format!("/matchlists/by-account/{}", account),
                status: 500,
            });
        }
        Ok(self.matchlists.get(account).cloned().unwrap_or_default())
    }

    async fn fetch_match_detail(
        &self,
        _region: &Region,
        game: GameId,
    ) -> GatewayResult<MatchDetail> {
        self.maybe_throttle()?;
        *self.detail_calls.lock().unwrap().entry(game).or_insert(0) += 1;
        let participants = self
            .details
            .get(&game)
            .cloned()
            .ok_or_else(|| GatewayError::Status {
                endpoint: format!("/matches/{}", game),
                status: 404,
            })?;
        Ok(MatchDetail {
            game_id: game,
            participants,
        })
    }

    async fn fetch_rank(
        &self,
        _region: &Region,
        participant: &ParticipantId,
    ) -> GatewayResult<Option<RankEntry>> {
        self.maybe_throttle()?;
        *self
            .rank_calls
            .lock()
            .unwrap()
            .entry(participant.clone())
            .or_insert(0) += 1;
        Ok(self.ranks.get(participant).copied())
    }
}

/// Records requested waits without sleeping
#[derive(Default)]
pub struct RecordingSleeper {
    pub waits: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// The single-iteration example: g1 brings p2, p3; g2 brings p3, p4
pub fn example_gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_matches("acc-1", &[(1, SEASON), (2, SEASON)])
        .with_game(1, &[("p2", "acc-2"), ("p3", "acc-3")])
        .with_game(2, &[("p3", "acc-3"), ("p4", "acc-4")])
        .with_rank("p2", Tier::Gold, Division::II)
        .with_rank("p4", Tier::Silver, Division::I)
}

/// A small graph that is exhausted after seven iterations
///
/// acc-1 plays games 1, 2 (and 3 from another season); the crawl spreads to
/// accounts 2..7. p3 never has a solo rank.
pub fn graph_gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_matches("acc-1", &[(1, SEASON), (2, SEASON), (3, SEASON - 1)])
        .with_matches("acc-2", &[(1, SEASON), (4, SEASON)])
        .with_matches("acc-3", &[(2, SEASON), (5, SEASON)])
        .with_matches("acc-5", &[(4, SEASON)])
        .with_matches("acc-6", &[(5, SEASON), (6, SEASON)])
        .with_game(1, &[("p1", "acc-1"), ("p2", "acc-2"), ("p3", "acc-3")])
        .with_game(2, &[("p1", "acc-1"), ("p3", "acc-3"), ("p4", "acc-4")])
        .with_game(3, &[("p9", "acc-9")])
        .with_game(4, &[("p2", "acc-2"), ("p5", "acc-5")])
        .with_game(5, &[("p3", "acc-3"), ("p6", "acc-6")])
        .with_game(6, &[("p6", "acc-6"), ("p7", "acc-7")])
        .with_rank("p1", Tier::Gold, Division::III)
        .with_rank("p2", Tier::Silver, Division::II)
        .with_rank("p4", Tier::Iron, Division::IV)
        .with_rank("p5", Tier::Diamond, Division::I)
        .with_rank("p6", Tier::Bronze, Division::I)
        .with_rank("p7", Tier::Master, Division::I)
}
