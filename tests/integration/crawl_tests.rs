//! Integration tests for the crawler
//!
//! These tests use wiremock to create a mock provider and run the full
//! crawl cycle end-to-end: HTTP gateway, throttle retry, engine and
//! checkpoint files.

use rank_ripple::config::Config;
use rank_ripple::crawler::{run_crawl, CompletionReason, CrawlRequest};
use rank_ripple::gateway::GatewayError;
use rank_ripple::output::export_rankings;
use rank_ripple::state::{AccountId, Division, ParticipantId, RankEntry, Region, Tier};
use rank_ripple::storage::{load_latest, open_store};
use rank_ripple::RippleError;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock provider
fn create_test_config(server: &MockServer, checkpoint_dir: &Path, max_players: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_players = max_players;
    config.provider.base_url = server.uri();
    config.provider.default_retry_wait_ms = 0;
    config.checkpoint.directory = checkpoint_dir.to_string_lossy().into_owned();
    config
}

fn request(seed: Option<&str>) -> CrawlRequest {
    CrawlRequest {
        api_key: "RGAPI-test".to_string(),
        region: Region::parse("na1").unwrap(),
        seed: seed.map(AccountId::new),
    }
}

fn identity(summoner: &str, account: &str) -> Value {
    json!({ "player": { "summonerId": summoner, "accountId": account } })
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the one-account example: acc-1 played g1 (p2, p3) and g2 (p3, p4)
/// in the target season, plus an older game that must be skipped.
/// p2 and p4 have solo ranks, p3 only a flex rank.
async fn mount_example(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/lol/match/v4/matchlists/by-account/acc-1"))
        .and(query_param("queue", "420"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                { "gameId": 1, "season": 13 },
                { "gameId": 2, "season": 13 },
                { "gameId": 3, "season": 12 }
            ]
        })))
        .expect(1)
        .mount(server)
        .await;

    let games = [
        (1, [("p2", "acc-2"), ("p3", "acc-3")]),
        (2, [("p3", "acc-3"), ("p4", "acc-4")]),
    ];
    for (game, players) in games {
        let identities: Vec<Value> = players.iter().map(|(s, a)| identity(s, a)).collect();
        Mock::given(method("GET"))
            .and(path(format!("/lol/match/v4/matches/{}", game)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "participantIdentities": identities
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/lol/match/v4/matches/3"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;

    mount_json(
        server,
        "/lol/league/v4/entries/by-summoner/p2",
        json!([{ "queueType": "RANKED_SOLO_5x5", "tier": "GOLD", "rank": "II" }]),
    )
    .await;
    mount_json(
        server,
        "/lol/league/v4/entries/by-summoner/p3",
        json!([{ "queueType": "RANKED_FLEX_SR", "tier": "DIAMOND", "rank": "I" }]),
    )
    .await;
    mount_json(
        server,
        "/lol/league/v4/entries/by-summoner/p4",
        json!([
            { "queueType": "RANKED_FLEX_SR", "tier": "IRON", "rank": "IV" },
            { "queueType": "RANKED_SOLO_5x5", "tier": "SILVER", "rank": "I" }
        ]),
    )
    .await;
}

fn checkpoint_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_iteration_through_http() {
    let server = MockServer::start().await;
    mount_example(&server).await;

    // The first rank lookup is throttled once
    Mock::given(method("GET"))
        .and(path("/lol/league/v4/entries/by-summoner/p2"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path(), 2);

    let summary = run_crawl(config, request(Some("acc-1"))).await.unwrap();

    assert_eq!(summary.reason, CompletionReason::TargetReached);
    assert_eq!(summary.iterations, 1);
    assert_eq!(
        summary.state.ranks().get(&ParticipantId::new("p2")),
        Some(&RankEntry::new(Tier::Gold, Division::II))
    );
    assert_eq!(
        summary.state.ranks().get(&ParticipantId::new("p4")),
        Some(&RankEntry::new(Tier::Silver, Division::I))
    );
    assert_eq!(summary.state.rank_count(), 2);

    // Exactly one checkpoint, in the documented layout
    let files = checkpoint_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("na1-"));

    let content = std::fs::read_to_string(dir.path().join(&files[0])).unwrap();
    let json: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["region"], "na1");
    assert_eq!(
        json["playerDict"],
        json!({ "p2": ["GOLD", "II"], "p4": ["SILVER", "I"] })
    );
    assert_eq!(json["gameIds"], json!([1, 2]));
    assert_eq!(json["unusedAccountPlayers"], json!(["acc-2", "acc-3", "acc-4"]));
    assert_eq!(json["usedAccountPlayers"], json!(["acc-1"]));
}

#[tokio::test]
async fn test_resume_continues_from_checkpoint() {
    let server = MockServer::start().await;
    mount_example(&server).await;

    let dir = TempDir::new().unwrap();
    let first = run_crawl(
        create_test_config(&server, dir.path(), 2),
        request(Some("acc-1")),
    )
    .await
    .unwrap();
    assert_eq!(first.iterations, 1);

    // The remaining accounts have nothing new to offer
    for account in ["acc-2", "acc-3", "acc-4"] {
        Mock::given(method("GET"))
            .and(path(format!("/lol/match/v4/matchlists/by-account/{}", account)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [{ "gameId": 1, "season": 13 }, { "gameId": 2, "season": 13 }]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    // No seed needed once a checkpoint exists
    let second = run_crawl(create_test_config(&server, dir.path(), 100), request(None))
        .await
        .unwrap();

    assert_eq!(second.reason, CompletionReason::FrontierExhausted);
    assert_eq!(second.iterations, 3);
    assert_eq!(second.state.ranks(), first.state.ranks());
    assert!(second.state.frontier().is_empty());
    assert_eq!(checkpoint_files(dir.path()).len(), 4);

    // Dropping the server verifies every game was fetched exactly once
}

#[tokio::test]
async fn test_fatal_status_aborts_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lol/match/v4/matchlists/by-account/acc-1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = run_crawl(
        create_test_config(&server, dir.path(), 10),
        request(Some("acc-1")),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        RippleError::Gateway(GatewayError::Status { status: 503, .. })
    ));
    assert!(checkpoint_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_missing_seed_fails_before_network() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let err = run_crawl(create_test_config(&server, dir.path(), 10), request(None))
        .await
        .unwrap_err();

    assert!(matches!(err, RippleError::Usage(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_latest_checkpoint() {
    let server = MockServer::start().await;
    mount_example(&server).await;

    let dir = TempDir::new().unwrap();
    run_crawl(
        create_test_config(&server, dir.path(), 2),
        request(Some("acc-1")),
    )
    .await
    .unwrap();

    let store = open_store(dir.path()).unwrap();
    let region = Region::parse("na1").unwrap();
    let (_, state) = load_latest(&store, &region).unwrap().unwrap();

    let db = TempDir::new().unwrap();
    let written = export_rankings(&state, &db.path().join("ranks.db")).unwrap();
    assert_eq!(written, 2);
}
