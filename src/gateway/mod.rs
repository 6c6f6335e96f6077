//! Remote data gateway
//!
//! This module is the crawler's only view of the match/rank provider:
//! - The `Gateway` trait with the three read operations the engine needs
//! - `RiotGateway`, the HTTP implementation
//! - `RetryingGateway`, which absorbs throttle signals around any gateway
//!
//! Every operation is an idempotent read, so retrying a throttled call
//! never duplicates work.

mod retry;
mod riot;

pub use retry::{retry_on_throttle, RetryPolicy, RetryingGateway, Sleeper, TokioSleeper};
pub use riot::{build_http_client, RiotGateway};

use crate::state::{AccountId, GameId, ParticipantId, RankEntry, Region};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider asked us to slow down
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    Throttled { retry_after: Option<Duration> },

    #[error("HTTP {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("HTTP error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Gateway setup error: {0}")]
    Setup(String),
}

impl GatewayError {
    /// Returns true for the provider's throttle signal
    pub fn is_throttle(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// One entry of a participant's ranked match list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSummary {
    pub game_id: GameId,
    pub season: u32,
}

/// A participant as listed in a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchParticipant {
    /// Summoner identity, the result mapping key
    pub participant_id: ParticipantId,

    /// Account identity, what gets enqueued for later expansion
    pub account_id: AccountId,
}

/// Participants of one match, in the provider's order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetail {
    pub game_id: GameId,
    pub participants: Vec<MatchParticipant>,
}

/// Read operations against the match/rank provider
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Lists the ranked solo matches an account has played
    async fn list_ranked_matches(
        &self,
        region: &Region,
        account: &AccountId,
    ) -> GatewayResult<Vec<MatchSummary>>;

    /// Fetches the participants of a single match
    async fn fetch_match_detail(&self, region: &Region, game: GameId)
        -> GatewayResult<MatchDetail>;

    /// Fetches a participant's ranked solo standing
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RankEntry))` - The participant is ranked in the queue
    /// * `Ok(None)` - No entry for the ranked solo queue
    async fn fetch_rank(
        &self,
        region: &Region,
        participant: &ParticipantId,
    ) -> GatewayResult<Option<RankEntry>>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for std::sync::Arc<G> {
    async fn list_ranked_matches(
        &self,
        region: &Region,
        account: &AccountId,
    ) -> GatewayResult<Vec<MatchSummary>> {
        (**self).list_ranked_matches(region, account).await
    }

    async fn fetch_match_detail(
        &self,
        region: &Region,
        game: GameId,
    ) -> GatewayResult<MatchDetail> {
        (**self).fetch_match_detail(region, game).await
    }

    async fn fetch_rank(
        &self,
        region: &Region,
        participant: &ParticipantId,
    ) -> GatewayResult<Option<RankEntry>> {
        (**self).fetch_rank(region, participant).await
    }
}
