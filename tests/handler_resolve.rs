mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use common::{InMemoryLinkRepository, create_test_state, test_app, wait_until};
use qrlink::domain::entities::ContentKind;
use qrlink::domain::scan_worker::run_scan_worker;

fn live_until(minutes: i64) -> chrono::DateTime<Utc> {
    Utc::now() + Duration::minutes(minutes)
}

#[tokio::test]
async fn test_resolve_redirects_with_302() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com/target",
        live_until(30),
        true,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    let response = server.get("/go/Ab3dEf9h").await;

    response.assert_status(axum::http::StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");
    assert_eq!(
        response.header("cache-control"),
        "no-store, no-cache, must-revalidate"
    );
}

#[tokio::test]
async fn test_created_link_round_trips_to_its_normalized_url() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    let created = server
        .post("/api/links")
        .add_header("Host", "qr.test")
        .json(&serde_json::json!({ "content": "example.com/some/page", "expires_in_minutes": 60 }))
        .await;
    created.assert_status_ok();

    let body = created.json::<serde_json::Value>();
    let code = body["code"].as_str().unwrap();

    let response = server.get(&format!("/go/{code}")).await;
    response.assert_status(axum::http::StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "https://example.com/some/page"
    );
}

#[tokio::test]
async fn test_resolve_accepts_every_route_prefix_and_fallback() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com",
        live_until(30),
        true,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    for path in [
        "/go/Ab3dEf9h",
        "/share/Ab3dEf9h",
        "/s/Ab3dEf9h",
        "/link/Ab3dEf9h",
        "/v/Ab3dEf9h",
        "/article/Ab3dEf9h",
        "/r/Ab3dEf9h",
        "/Ab3dEf9h",
    ] {
        let response = server.get(path).await;
        response.assert_status(axum::http::StatusCode::FOUND);
    }
}

#[tokio::test]
async fn test_resolve_ignores_trailing_query_string() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com",
        live_until(30),
        true,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    let response = server.get("/go/Ab3dEf9h?from=timeline&isappinstalled=0").await;
    response.assert_status(axum::http::StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_unknown_and_expired_codes_get_the_same_page() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Expired1",
        ContentKind::Url,
        "https://example.com",
        Utc::now() - Duration::minutes(1),
        true,
    );

    let (state, _rx) = create_test_state(repo.clone());
    let server = TestServer::new(test_app(state)).unwrap();

    let unknown = server.get("/go/ZZZZZZZZ").await;
    unknown.assert_status_not_found();

    let expired = server.get("/go/Expired1").await;
    expired.assert_status_not_found();

    // Indistinguishable to the client whether the code never existed.
    assert_eq!(unknown.text(), expired.text());
    assert!(unknown.text().contains("404"));
}

#[tokio::test]
async fn test_expired_entry_is_lazily_deactivated() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Expired1",
        ContentKind::Url,
        "https://example.com",
        Utc::now() - Duration::minutes(1),
        true,
    );

    let (state, _rx) = create_test_state(repo.clone());
    let server = TestServer::new(test_app(state)).unwrap();

    server.get("/go/Expired1").await.assert_status_not_found();

    assert!(!repo.get("Expired1").unwrap().is_active);
}

#[tokio::test]
async fn test_deactivated_code_resolves_not_found_before_expiry() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Gone1234",
        ContentKind::Url,
        "https://example.com",
        live_until(60),
        false,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    server.get("/go/Gone1234").await.assert_status_not_found();
}

#[tokio::test]
async fn test_wechat_agent_gets_interstitial_instead_of_redirect() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com/target",
        live_until(30),
        true,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    let response = server
        .get("/go/Ab3dEf9h")
        .add_header("User-Agent", "Mozilla/5.0 MicroMessenger/8.0.42")
        .await;

    response.assert_status_ok();
    assert!(!response.headers().contains_key("location"));

    let body = response.text();
    assert!(body.contains("https://example.com/target"));
    assert!(body.contains("Copy link"));
}

#[tokio::test]
async fn test_inapp_query_flag_forces_interstitial() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com",
        live_until(30),
        true,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    let response = server.get("/go/Ab3dEf9h?inapp=1").await;

    response.assert_status_ok();
    assert!(response.text().contains("Copy link"));
}

#[tokio::test]
async fn test_text_entry_renders_raw_content() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Texty123",
        ContentKind::Text,
        "remember the milk",
        live_until(30),
        true,
    );

    let (state, _rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    let response = server.get("/v/Texty123").await;

    response.assert_status_ok();
    assert!(response.text().contains("remember the milk"));
}

#[tokio::test]
async fn test_scan_events_carry_client_metadata() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let id = repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com",
        live_until(30),
        true,
    );

    let (state, mut rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    server
        .get("/go/Ab3dEf9h")
        .add_header("User-Agent", "TestBot/1.0")
        .add_header("X-Forwarded-For", "203.0.113.9")
        .await
        .assert_status(axum::http::StatusCode::FOUND);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.link_id, id);
    assert_eq!(event.user_agent.as_deref(), Some("TestBot/1.0"));
    assert_eq!(event.source_address.as_deref(), Some("203.0.113.9"));
    assert!(!event.is_restrictive);
}

#[tokio::test]
async fn test_scan_count_tracks_successful_resolutions() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com",
        live_until(30),
        true,
    );

    let (state, rx) = create_test_state(repo.clone());
    tokio::spawn(run_scan_worker(rx, repo.clone()));

    let server = TestServer::new(test_app(state)).unwrap();

    for _ in 0..3 {
        server
            .get("/go/Ab3dEf9h")
            .await
            .assert_status(axum::http::StatusCode::FOUND);
    }

    let repo_for_wait = repo.clone();
    assert!(wait_until(move || repo_for_wait.scan_count_of("Ab3dEf9h") == 3).await);

    let link = repo.get("Ab3dEf9h").unwrap();
    assert!(link.last_scanned_at.is_some());
    assert_eq!(repo.recorded_scans(), 3);
}

#[tokio::test]
async fn test_no_scan_is_recorded_for_not_found() {
    let repo = Arc::new(InMemoryLinkRepository::new());

    let (state, mut rx) = create_test_state(repo);
    let server = TestServer::new(test_app(state)).unwrap();

    server.get("/go/ZZZZZZZZ").await.assert_status_not_found();

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_failing_scan_store_never_breaks_the_redirect() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.seed(
        "Ab3dEf9h",
        ContentKind::Url,
        "https://example.com",
        live_until(30),
        true,
    );
    repo.fail_scan_writes.store(true, Ordering::SeqCst);

    let (state, rx) = create_test_state(repo.clone());
    tokio::spawn(run_scan_worker(rx, repo.clone()));

    let server = TestServer::new(test_app(state)).unwrap();

    let response = server.get("/go/Ab3dEf9h").await;
    response.assert_status(axum::http::StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com");

    // The counter and the event log stay consistent: neither was applied.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(repo.scan_count_of("Ab3dEf9h"), 0);
    assert_eq!(repo.recorded_scans(), 0);
}
