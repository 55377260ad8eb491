//! Integration tests for the Gradia HTTP API.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use base64::Engine;
use gradia::api::{router, AppState};
use gradia_core::completion::{Competition, CompetitionStatus};
use gradia_core::formats::decode_snapshot;
use gradia_core::{CompetitionId, Date, Directory, FieldSignal, FieldValue, MemberId};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn general_profile(member: u64) -> Vec<FieldSignal> {
    [
        ("first_name", "Alice"),
        ("last_name", "Nguyen"),
        ("gender", "female"),
        ("date_of_birth", "1990-04-12"),
        ("postcode", "2000"),
    ]
    .into_iter()
    .map(|(field, value)| FieldSignal::new(MemberId(member), field, FieldValue::text(value)))
    .collect()
}

fn test_server(temp: &TempDir, directory: Directory, api_key: Option<&str>) -> TestServer {
    let db_path = temp.path().join("api.db");
    let state = AppState::new(directory, db_path, api_key.map(str::to_string));
    TestServer::new(router(state)).expect("test server")
}

// =============================================================================
// HEALTH & STATUS
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn status_reports_census() {
    let temp = tempfile::tempdir().unwrap();
    let mut directory = Directory::new();
    directory.ingest_sequence(&general_profile(1));
    let server = test_server(&temp, directory, None);

    let response = server.get("/status").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["member_count"], 1);
    assert_eq!(body["competition_count"], 0);
    assert_eq!(body["members_at_level"], json!([0, 1, 0, 0]));
}

// =============================================================================
// EVALUATION
// =============================================================================

#[tokio::test]
async fn evaluate_posted_record() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    let response = server
        .post("/evaluate")
        .json(&json!({
            "first_name": "Alice",
            "last_name": "Nguyen",
            "gender": "female",
            "date_of_birth": "1990-04-12",
            "postcode": "2000"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["result"]["level"], 2);
    assert_eq!(body["result"]["progress"], 50);
    assert_eq!(body["badge_color"], "blue");
}

#[tokio::test]
async fn evaluate_empty_record_is_level_one() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    let response = server.post("/evaluate").json(&json!({})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["result"]["level"], 1);
    assert_eq!(body["result"]["progress"], 25);
    assert_eq!(body["badge_color"], "gray");
    assert!(body["result"]["warning_message"].is_string());
}

#[tokio::test]
async fn member_tier_for_stored_member() {
    let temp = tempfile::tempdir().unwrap();
    let mut directory = Directory::new();
    directory.ingest_sequence(&general_profile(7));
    let server = test_server(&temp, directory, None);

    let response = server.get("/member/7/tier").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["result"]["level"], 2);
}

#[tokio::test]
async fn member_tier_unknown_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    let response = server.get("/member/99/tier").await;
    response.assert_status_not_found();
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[tokio::test]
async fn signal_requires_api_key() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), Some("secret"));

    let signal = FieldSignal::new(MemberId(1), "first_name", FieldValue::text("Alice"));

    let response = server.post("/signal").json(&signal).await;
    response.assert_status_unauthorized();

    let response = server
        .post("/signal")
        .authorization_bearer("wrong")
        .json(&signal)
        .await;
    response.assert_status_unauthorized();

    let response = server
        .post("/signal")
        .authorization_bearer("secret")
        .json(&signal)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn open_server_accepts_signals_without_key() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    let signal = FieldSignal::new(MemberId(1), "first_name", FieldValue::text("Alice"));
    let response = server.post("/signal").json(&signal).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["member_count"], 1);
}

#[tokio::test]
async fn signal_updates_member_tier() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    for signal in general_profile(1) {
        server.post("/signal").json(&signal).await.assert_status_ok();
    }

    let response = server.get("/member/1/tier").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["result"]["level"], 2);
}

// =============================================================================
// SWEEP & EXPORT
// =============================================================================

#[tokio::test]
async fn sweep_completes_ended_competitions() {
    let temp = tempfile::tempdir().unwrap();
    let mut directory = Directory::new();
    directory.insert_competition(Competition::new(
        CompetitionId(1),
        "spring raffle",
        Date::parse("2026-01-31").unwrap(),
        CompetitionStatus::Active,
    ));
    let server = test_server(&temp, directory, None);

    let response = server
        .post("/sweep")
        .json(&json!({"today": "2026-02-01"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["outcome"]["completed"], json!([1]));
}

#[tokio::test]
async fn sweep_rejects_bad_date() {
    let temp = tempfile::tempdir().unwrap();
    let server = test_server(&temp, Directory::new(), None);

    let response = server
        .post("/sweep")
        .json(&json!({"today": "02/01/2026"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn export_returns_decodable_snapshot() {
    let temp = tempfile::tempdir().unwrap();
    let mut directory = Directory::new();
    directory.ingest_sequence(&general_profile(1));
    let server = test_server(&temp, directory, None);

    let response = server.post("/export").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body["data_base64"].as_str().unwrap())
        .unwrap();
    let decoded = decode_snapshot(&bytes).unwrap();
    assert_eq!(decoded.member_count(), 1);
}
