// Integration tests for batched delivery against a mock collector.
use std::time::Duration;

use pulse_agent::{AgentSupervisor, BatchTransport, DeliveryError};
use pulse_core::{AgentConfig, ClientSpec, DeliveryMode, Reading};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn spec(endpoint: &str, client_id: &str) -> ClientSpec {
    ClientSpec {
        client_id: client_id.to_string(),
        secret: "token".to_string(),
        cadence: Duration::from_millis(100),
        mode: DeliveryMode::Batched,
        endpoint: url::Url::parse(endpoint).expect("valid endpoint"),
    }
}

#[tokio::test]
async fn delivery_carries_credentials_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(header("Authorization", "Bearer token"))
        .and(header("X-Client-ID", "meter-a"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(serde_json::json!({ "is_valid": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let spec = spec(&format!("{}/ingest", server.uri()), "meter-a");
    let reading = Reading::new(chrono::Utc::now(), 12.5);

    BatchTransport::default()
        .deliver(&spec, &reading)
        .await
        .expect("delivery should succeed");
}

#[tokio::test]
async fn non_success_status_is_a_delivery_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let spec = spec(&server.uri(), "meter-a");
    let reading = Reading::new(chrono::Utc::now(), 12.5);

    let outcome = BatchTransport::default().deliver(&spec, &reading).await;
    assert!(matches!(
        outcome,
        Err(DeliveryError::UnexpectedStatus { status }) if status.as_u16() == 503
    ));
}

#[tokio::test]
async fn consecutive_ticks_never_share_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let raw = format!(
        r#"
api_url: "{}"
clients:
  - client_id: meter-a
    secret: token-a
    interval: 100ms
"#,
        server.uri()
    );
    let config = AgentConfig::from_yaml(&raw).expect("valid config");

    let handle = AgentSupervisor::default()
        .start(&config)
        .expect("runners launched");
    tokio::time::sleep(Duration::from_millis(350)).await;
    handle.shutdown().await;

    // Each tick is one complete request of its own.
    let seen = server.received_requests().await.expect("recording enabled");
    assert!(seen.len() >= 2, "expected several requests, saw {}", seen.len());
}

#[tokio::test]
async fn one_clients_failures_never_perturb_another() {
    let failing = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&failing)
        .await;

    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&healthy)
        .await;

    let raw = format!(
        r#"
api_url: "{healthy}"
clients:
  - client_id: meter-a
    secret: token-a
    interval: 100ms
    endpoint: "{failing}"
  - client_id: meter-b
    secret: token-b
    interval: 100ms
"#,
        healthy = healthy.uri(),
        failing = failing.uri()
    );
    let config = AgentConfig::from_yaml(&raw).expect("valid config");

    let handle = AgentSupervisor::default()
        .start(&config)
        .expect("runners launched");
    tokio::time::sleep(Duration::from_millis(450)).await;
    handle.shutdown().await;

    let healthy_seen = healthy.received_requests().await.expect("recording enabled");
    let failing_seen = failing.received_requests().await.expect("recording enabled");

    // Client B kept its schedule despite A failing every tick...
    assert!(
        healthy_seen.len() >= 3,
        "healthy client should keep ticking, saw {}",
        healthy_seen.len()
    );
    // ...and A itself kept attempting each tick independently.
    assert!(
        failing_seen.len() >= 3,
        "failing client should keep attempting, saw {}",
        failing_seen.len()
    );
}
