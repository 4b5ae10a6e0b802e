use std::time::Duration;

use tempfile::tempdir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use upset_scanner::config::Config;
use upset_scanner::harvester::{ApiClient, RateLimiter, RetryPolicy, run_scan};
use upset_scanner::sink::CsvSink;

fn test_client(server_uri: &str) -> ApiClient {
    let config = Config {
        api_token: "test-token".to_string(),
        http_timeout_seconds: 5,
        graphql_url: format!("{server_uri}/gql/alpha"),
        entities_url: server_uri.to_string(),
        ..Config::default()
    };
    ApiClient::new(&config)
        .unwrap()
        .with_limiter(RateLimiter::unlimited())
        .with_retry_policy(RetryPolicy {
            base_delay: Duration::from_millis(1),
            max_attempts: 2,
        })
}

async fn mount_listing(server: &MockServer, nodes: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/gql/alpha"))
        .and(body_string_contains("TournamentsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "tournaments": {
                    "pageInfo": { "totalPages": 1 },
                    "nodes": nodes
                }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scan_records_pronoun_filtered_upset() {
    let server = MockServer::start().await;

    // One completed tournament with a single singles event
    mount_listing(
        &server,
        serde_json::json!([{
            "slug": "tournament/genesis-9",
            "name": "Genesis 9",
            "startAt": 1_700_000_000,
            "events": [{ "id": 42, "name": "Melee Singles" }]
        }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/gql/alpha"))
        .and(body_string_contains("EventGroupsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "event": { "phaseGroups": [{ "id": 201 }] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Entrant 1 resolves from the seed snapshot; entrant 2 has no user link
    // there and must come from the participants roster
    Mock::given(method("GET"))
        .and(path("/phase_group/201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entities": {
                "seeds": [
                    {
                        "entrantId": 1,
                        "entrantName": "Aria",
                        "seedNum": 5,
                        "players": [
                            { "id": 11, "gamerTag": "Aria", "user": { "genderPronoun": "he/him" } }
                        ]
                    },
                    {
                        "entrantId": 2,
                        "entrantName": "Blake",
                        "seedNum": 40,
                        "players": [
                            { "id": 12, "gamerTag": "Blake" }
                        ]
                    }
                ],
                "sets": [
                    {
                        "id": 900,
                        "entrant1Id": 1,
                        "entrant2Id": 2,
                        "entrant1Score": 1,
                        "entrant2Score": 2,
                        "winnerId": 2
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gql/alpha"))
        .and(body_string_contains("EventParticipantsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "event": {
                    "participants": {
                        "pageInfo": { "totalPages": 1 },
                        "nodes": [
                            {
                                "player": {
                                    "id": 12,
                                    "gamerTag": "Blake",
                                    "user": { "genderPronoun": "she/her", "slug": "user/blake" }
                                }
                            }
                        ]
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let dir = tempdir().unwrap();
    let mut sink = CsvSink::create(dir.path()).await.unwrap();

    let summary = run_scan(&client, &mut sink, 1_600_000_000).await.unwrap();
    sink.flush().await.unwrap();

    assert_eq!(summary.tournaments, 1);
    assert_eq!(summary.events, 1);
    assert_eq!(summary.records, 1);
    assert_eq!(summary.skipped_events, 0);

    // Seed 40 (tier 10) beat seed 5 (tier 4): factor 6
    let content = tokio::fs::read_to_string(sink.path()).await.unwrap();
    assert_eq!(
        content,
        "\"Blake\",\"she/her\",40,\"Aria\",\"he/him\",5,6,\"Genesis 9\",\"Melee Singles\",1700000000000\n"
    );
}

#[tokio::test]
async fn test_favorite_win_produces_no_records() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        serde_json::json!([{
            "slug": "tournament/weekly-12",
            "name": "Weekly 12",
            "startAt": 1_700_000_000,
            "events": [{ "id": 43, "name": "Singles" }]
        }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/gql/alpha"))
        .and(body_string_contains("EventGroupsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "event": { "phaseGroups": [{ "id": 301 }] } }
        })))
        .mount(&server)
        .await;

    // Both entrants resolve from the snapshot, so no roster lookup happens
    Mock::given(method("GET"))
        .and(path("/phase_group/301"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entities": {
                "seeds": [
                    {
                        "entrantId": 1,
                        "entrantName": "Aria",
                        "seedNum": 5,
                        "players": [
                            { "id": 11, "gamerTag": "Aria", "user": { "genderPronoun": "she/her" } }
                        ]
                    },
                    {
                        "entrantId": 2,
                        "entrantName": "Blake",
                        "seedNum": 40,
                        "players": [
                            { "id": 12, "gamerTag": "Blake", "user": { "genderPronoun": "she/her" } }
                        ]
                    }
                ],
                "sets": [
                    {
                        "id": 901,
                        "entrant1Id": 1,
                        "entrant2Id": 2,
                        "entrant1Score": 2,
                        "entrant2Score": 0,
                        "winnerId": 1
                    }
                ]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gql/alpha"))
        .and(body_string_contains("EventParticipantsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "event": {
                    "participants": { "pageInfo": { "totalPages": 1 }, "nodes": [] }
                }
            }
        })))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let dir = tempdir().unwrap();
    let mut sink = CsvSink::create(dir.path()).await.unwrap();

    let summary = run_scan(&client, &mut sink, 1_600_000_000).await.unwrap();
    sink.flush().await.unwrap();

    assert_eq!(summary.records, 0);
    let content = tokio::fs::read_to_string(sink.path()).await.unwrap();
    assert!(content.is_empty());
}

#[tokio::test]
async fn test_failing_event_is_skipped_and_scan_continues() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        serde_json::json!([{
            "slug": "tournament/broken-bracket",
            "name": "Broken Bracket",
            "startAt": 1_700_000_000,
            "events": [
                { "id": 44, "name": "Singles" },
                { "id": 45, "name": "Doubles Redemption" }
            ]
        }]),
    )
    .await;

    // Both events hit a permission error on the bracket-group lookup
    Mock::given(method("POST"))
        .and(path("/gql/alpha"))
        .and(body_string_contains("EventGroupsQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [{ "message": "not authorized" }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let dir = tempdir().unwrap();
    let mut sink = CsvSink::create(dir.path()).await.unwrap();

    let summary = run_scan(&client, &mut sink, 1_600_000_000).await.unwrap();

    assert_eq!(summary.tournaments, 1);
    assert_eq!(summary.events, 2);
    assert_eq!(summary.records, 0);
    assert_eq!(summary.skipped_events, 2);
}
