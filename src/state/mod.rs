//! State module for tracking crawl progress
//!
//! This module provides the data model of a crawl.
//!
//! # Components
//!
//! - `CrawlState`: The persisted aggregate (result mapping, visited games, frontier)
//! - `Frontier`: FIFO of accounts to expand plus the processed set
//! - `CrawlPhase`: The engine's per-iteration state machine
//! - `RankEntry`: Tier and division of a participant
//! - `Region`: Validated provider region selector

mod crawl_state;
mod frontier;
mod ids;
mod phase;
mod rank;
mod region;

// Re-export main types
pub use crawl_state::CrawlState;
pub use frontier::Frontier;
pub use ids::{AccountId, GameId, ParticipantId};
pub use phase::CrawlPhase;
pub use rank::{Division, RankEntry, Tier};
pub use region::{Region, KNOWN_REGIONS};
