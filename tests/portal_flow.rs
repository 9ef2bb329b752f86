// tests/portal_flow.rs
use job_portal::core::PollConfig;
use job_portal::types::ai::ResumeIngestPayload;
use job_portal::types::ListQuery;
use job_portal::{EnvironmentConfig, ErrorSource, PortalClient};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn portal(primary: &MockServer, ai: &MockServer) -> PortalClient {
    let config = EnvironmentConfig {
        primary_api_url: format!("{}/", primary.uri()),
        ai_api_url: ai.uri(),
        ..EnvironmentConfig::default()
    }
    .finalize()
    .unwrap();
    PortalClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_token_reaches_both_backends_until_supplier_switches() {
    let primary = MockServer::start().await;
    let ai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1", "email": "a@b.test"})))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/candidates/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "skills": ["rust"]})))
        .expect(1)
        .mount(&ai)
        .await;

    let client = portal(&primary, &ai);
    client.sign_in_with(|| async { Some("abc".to_string()) });

    assert_eq!(client.auth().me().await.unwrap().id, "u1");
    assert_eq!(client.ai_service().candidate_me().await.unwrap().skills, vec!["rust"]);

    // A supplier that has no session leaves requests unauthenticated.
    client.sign_in_with(|| async { None });
    primary.reset().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "UNAUTHORIZED", "message": "Sign in required"}
        })))
        .expect(1)
        .mount(&primary)
        .await;

    let err = client.auth().me().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.source, ErrorSource::Primary);
    assert_eq!(err.message, "Sign in required");

    ai.reset().await;
    Mock::given(method("GET"))
        .and(path("/v1/candidates/me"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&ai)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/candidates/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": {"code": "UNAUTHORIZED", "message": "Not authenticated"}
        })))
        .expect(1)
        .mount(&ai)
        .await;

    let err = client.ai_service().candidate_me().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.source, ErrorSource::Ai);
    assert_eq!(err.message, "Not authenticated");
}

#[tokio::test]
async fn test_each_backend_error_is_attributed_to_its_source() {
    let primary = MockServer::start().await;
    let ai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs/j1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "JOB_NOT_FOUND", "message": "Job not found"}
        })))
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .respond_with(ResponseTemplate::new(429)
            .insert_header("retry-after", "3")
            .set_body_json(json!({"detail": {"code": "RATE_LIMITED", "message": "Slow down"}})))
        .mount(&ai)
        .await;

    let client = portal(&primary, &ai);

    let err = client.jobs().detail("j1").await.unwrap_err();
    assert_eq!(err.source, ErrorSource::Primary);
    assert_eq!(err.code.as_deref(), Some("JOB_NOT_FOUND"));

    let err = client.ai_service().list_jobs().await.unwrap_err();
    assert_eq!(err.source, ErrorSource::Ai);
    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after_ms, Some(3000));
    assert_eq!(err.message, "Slow down");
}

#[tokio::test]
async fn test_bare_array_listing_is_paged() {
    let primary = MockServer::start().await;
    let ai = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "jobId": "j1", "status": 0},
            {"id": "a2", "jobId": "j2", "status": 2}
        ])))
        .mount(&primary)
        .await;

    let page = portal(&primary, &ai)
        .applications()
        .list(&ListQuery::new().page(1, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 2);
}

#[tokio::test]
async fn test_ingest_polls_until_features_exist() {
    let primary = MockServer::start().await;
    let ai = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/resumes/ingest"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"resumeId": "r-7"})))
        .mount(&ai)
        .await;

    // Not ready on the first poll, ready from the second one on.
    let polled_once = Arc::new(AtomicBool::new(false));
    let flag = polled_once.clone();
    Mock::given(method("GET"))
        .and(path("/v1/resumes/r-7/features"))
        .respond_with(move |_: &Request| {
            if flag.swap(true, Ordering::SeqCst) {
                ResponseTemplate::new(200).set_body_json(json!({"skills": ["rust", "sql"]}))
            } else {
                ResponseTemplate::new(200).set_body_json(json!(null))
            }
        })
        .expect(2)
        .mount(&ai)
        .await;

    let poll = PollConfig::default()
        .with_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(5));
    let handle = portal(&primary, &ai)
        .ai_service()
        .ingest_and_wait(
            &ResumeIngestPayload {
                text: Some("Rust and SQL".into()),
                url: None,
            },
            &poll,
        )
        .await
        .unwrap();

    assert_eq!(handle.resource_id, "r-7");
    assert_eq!(handle.result, Some(json!({"skills": ["rust", "sql"]})));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let primary = MockServer::start().await;
    let ai = MockServer::start().await;
    let config = EnvironmentConfig {
        primary_api_url: primary.uri(),
        ai_api_url: "http://127.0.0.1:1".into(),
        timeout_seconds: 2,
        ..EnvironmentConfig::default()
    }
    .finalize()
    .unwrap();
    drop(ai);

    let err = PortalClient::new(&config)
        .unwrap()
        .users()
        .by_email("a@b.test")
        .await
        .unwrap_err();
    assert_eq!(err.source, ErrorSource::Network);
    assert!(err.status.is_none());
}
