/// Crawl engine phase definitions
///
/// The engine walks through these phases once per frontier entry. Only the
/// transitions listed in [`CrawlPhase::can_transition_to`] are legal.
use std::fmt;

/// Represents the current phase of the crawl engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Engine constructed, no frontier entry taken yet
    Idle,

    /// Taking the next unprocessed account from the frontier
    Dequeuing,

    /// Listing ranked matches for the dequeued account
    FetchingMatches,

    /// Fetching details of newly seen games
    FetchingDetails,

    /// Resolving ranks of newly discovered participants
    FetchingRanks,

    /// Persisting the crawl state
    Checkpointing,

    // ===== Terminal Phases =====
    /// Target size reached or frontier exhausted
    Done,

    /// A fatal error ended the run
    Aborted,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if a remote call may be in flight in this phase
    pub fn is_fetching(&self) -> bool {
        matches!(
            self,
            Self::FetchingMatches | Self::FetchingDetails | Self::FetchingRanks
        )
    }

    /// Checks whether moving from `self` to `next` is legal
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        if next == Aborted {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Idle, Dequeuing)
                | (Idle, Done)
                | (Dequeuing, FetchingMatches)
                | (Dequeuing, Done)
                | (FetchingMatches, FetchingDetails)
                | (FetchingDetails, FetchingRanks)
                | (FetchingRanks, Checkpointing)
                | (Checkpointing, Dequeuing)
                | (Checkpointing, Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dequeuing => "dequeuing",
            Self::FetchingMatches => "fetching_matches",
            Self::FetchingDetails => "fetching_details",
            Self::FetchingRanks => "fetching_ranks",
            Self::Checkpointing => "checkpointing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
