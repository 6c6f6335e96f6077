use serde::Deserialize;

/// Default target size of the result mapping
pub const DEFAULT_MAX_PLAYERS: usize = 10_000;

/// Season whose matches are expanded
pub const DEFAULT_TARGET_SEASON: u32 = 13;

/// Provider queue id of ranked solo games
pub const RANKED_SOLO_QUEUE_ID: u32 = 420;

/// Provider queue type of ranked solo league entries
pub const RANKED_SOLO_QUEUE_TYPE: &str = "RANKED_SOLO_5x5";

/// Provider base URL; `{platform}` is replaced by the region
pub const DEFAULT_BASE_URL: &str = "https://{platform}.api.riotgames.com";

/// Main configuration structure for rank-ripple
///
/// Every field has a default, so an absent or empty file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub provider: ProviderConfig,
    pub checkpoint: CheckpointConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Stop once this many participants have a rank
    #[serde(rename = "max-players")]
    pub max_players: usize,

    /// Only matches from this season are expanded
    #[serde(rename = "target-season")]
    pub target_season: u32,

    /// Queue id used to filter match lists
    #[serde(rename = "match-queue")]
    pub match_queue: u32,

    /// League queue type whose rank is recorded
    #[serde(rename = "rank-queue")]
    pub rank_queue: String,
}

/// Remote provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL template, `{platform}` is substituted with the region
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Wait after a throttle response without a Retry-After hint (milliseconds)
    #[serde(rename = "default-retry-wait-ms")]
    pub default_retry_wait_ms: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Checkpoint persistence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Directory holding the checkpoint files
    pub directory: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            target_season: DEFAULT_TARGET_SEASON,
            match_queue: RANKED_SOLO_QUEUE_ID,
            rank_queue: RANKED_SOLO_QUEUE_TYPE.to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            default_retry_wait_ms: 1000,
            user_agent: format!("rank-ripple/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}
