//! HTTP gateway implementation
//!
//! This module talks to the provider's REST API:
//! - Building an HTTP client that sends the provider key on every request
//! - Match list, match detail and league entry lookups
//! - Classifying responses into data, throttle signals and fatal errors

use crate::config::{CrawlerConfig, ProviderConfig};
use crate::gateway::{
    Gateway, GatewayError, GatewayResult, MatchDetail, MatchParticipant, MatchSummary,
};
use crate::state::{AccountId, Division, GameId, ParticipantId, RankEntry, Region, Tier};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Header carrying the provider key
const TOKEN_HEADER: &str = "X-Riot-Token";

#[derive(Debug, Deserialize)]
struct MatchlistDto {
    #[serde(default)]
    matches: Vec<MatchReferenceDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchReferenceDto {
    game_id: u64,
    season: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchDto {
    #[serde(default)]
    participant_identities: Vec<ParticipantIdentityDto>,
}

#[derive(Debug, Deserialize)]
struct ParticipantIdentityDto {
    player: Option<PlayerDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerDto {
    summoner_id: Option<String>,
    account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeagueEntryDto {
    queue_type: String,
    tier: String,
    rank: String,
}

/// Builds an HTTP client that authenticates with the provider key
///
/// # Arguments
///
/// * `api_key` - Provider credential, sent as `X-Riot-Token`
/// * `config` - Provider configuration (user agent, timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(GatewayError::Setup)` - The key is not a valid header value or the
///   client could not be built
pub fn build_http_client(api_key: &str, config: &ProviderConfig) -> GatewayResult<Client> {
    let mut token = HeaderValue::from_str(api_key)
        .map_err(|_| GatewayError::Setup("provider key contains invalid characters".to_string()))?;
    token.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(TOKEN_HEADER, token);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(|e| GatewayError::Setup(e.to_string()))
}

/// Parses a `Retry-After` header given in seconds
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    // Out of range hints fall back to the default wait
    let secs = value.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Gateway backed by the provider's REST API
pub struct RiotGateway {
    client: Client,
    base_url: String,
    match_queue: u32,
    rank_queue: String,
}

impl RiotGateway {
    /// Creates a gateway for the given key and settings
    pub fn new(
        api_key: &str,
        provider: &ProviderConfig,
        crawler: &CrawlerConfig,
    ) -> GatewayResult<Self> {
        let client = build_http_client(api_key, provider)?;
        Ok(Self::with_client(client, provider, crawler))
    }

    /// Creates a gateway around an existing client
    pub fn with_client(client: Client, provider: &ProviderConfig, crawler: &CrawlerConfig) -> Self {
        Self {
            client,
            base_url: provider.base_url.clone(),
            match_queue: crawler.match_queue,
            rank_queue: crawler.rank_queue.clone(),
        }
    }

    /// Builds an endpoint URL for a region from path segments
    ///
    /// Segments are percent-encoded, so ids can be passed through as-is.
    fn endpoint(&self, region: &Region, segments: &[&str]) -> GatewayResult<Url> {
        let base = self.base_url.replace("{platform}", region.as_str());
        let mut url = Url::parse(&base)
            .map_err(|e| GatewayError::Setup(format!("invalid base URL '{}': {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| GatewayError::Setup(format!("base URL '{}' cannot have a path", base)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> GatewayResult<T> {
        let endpoint = url.path().to_string();
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::Throttled {
                retry_after: parse_retry_after(response.headers()),
            });
        }

        if !status.is_success() {
            return Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Gateway for RiotGateway {
    async fn list_ranked_matches(
        &self,
        region: &Region,
        account: &AccountId,
    ) -> GatewayResult<Vec<MatchSummary>> {
        let mut url = self.endpoint(
            region,
            &["lol", "match", "v4", "matchlists", "by-account", account.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("queue", &self.match_queue.to_string());

        let list: MatchlistDto = self.get_json(url).await?;
        Ok(list
            .matches
            .into_iter()
            .map(|m| MatchSummary {
                game_id: GameId::new(m.game_id),
                season: m.season,
            })
            .collect())
    }

    async fn fetch_match_detail(
        &self,
        region: &Region,
        game: GameId,
    ) -> GatewayResult<MatchDetail> {
        let game_id = game.to_string();
        let url = self.endpoint(region, &["lol", "match", "v4", "matches", game_id.as_str()])?;

        let detail: MatchDto = self.get_json(url).await?;
        let participants = detail
            .participant_identities
            .into_iter()
            .filter_map(|identity| {
                // Bot slots carry no summoner or account id
                let player = identity.player?;
                Some(MatchParticipant {
                    participant_id: ParticipantId::new(player.summoner_id?),
                    account_id: AccountId::new(player.account_id?),
                })
            })
            .collect();

        Ok(MatchDetail {
            game_id: game,
            participants,
        })
    }

    async fn fetch_rank(
        &self,
        region: &Region,
        participant: &ParticipantId,
    ) -> GatewayResult<Option<RankEntry>> {
        let url = self.endpoint(
            region,
            &["lol", "league", "v4", "entries", "by-summoner", participant.as_str()],
        )?;
        let endpoint = url.path().to_string();

        let entries: Vec<LeagueEntryDto> = self.get_json(url).await?;
        let Some(entry) = entries
            .into_iter()
            .find(|entry| entry.queue_type == self.rank_queue)
        else {
            return Ok(None);
        };

        let decode = |message: String| GatewayError::Decode {
            endpoint: endpoint.clone(),
            message,
        };
        let tier: Tier = entry.tier.parse().map_err(decode)?;
        let division: Division = entry.rank.parse().map_err(decode)?;

        Ok(Some(RankEntry::new(tier, division)))
    }
}
