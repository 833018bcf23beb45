// Integration tests for the load generator loop
//
// These tests drive the loop against a wiremock endpoint, a closed port and
// scripted clients, and check what gets reported for each iteration.

use async_trait::async_trait;
use penguin_loadtester::{
    ClientError, FeatureRecord, HttpPredictionClient, InMemoryReporter, LoadGenerator, LoopState,
    PredictionClient, PredictionReply, RecordGenerator, RequestOutcome, Species,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn http_client(url: &str) -> Arc<HttpPredictionClient> {
    Arc::new(HttpPredictionClient::new(url, Duration::from_secs(5)).unwrap())
}

fn load_generator(client: Arc<dyn PredictionClient>, reporter: &InMemoryReporter) -> LoadGenerator {
    LoadGenerator::new(
        client,
        Arc::new(reporter.clone()),
        RecordGenerator::from_seed(2024),
        Duration::ZERO,
    )
}

/// URL of a local port with nothing listening on it
fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/predict", addr)
}

async fn gentoo_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": "Gentoo"})))
        .mount(&server)
        .await;
    server
}

/// Alternates between two clients, starting with the first
struct AlternatingClient {
    first: Arc<dyn PredictionClient>,
    second: Arc<dyn PredictionClient>,
    calls: AtomicUsize,
}

#[async_trait]
impl PredictionClient for AlternatingClient {
    async fn predict(&self, record: &FeatureRecord) -> Result<PredictionReply, ClientError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            self.first.predict(record).await
        } else {
            self.second.predict(record).await
        }
    }

    fn target(&self) -> &str {
        self.first.target()
    }
}

/// Answers instantly without any I/O
struct StaticClient;

#[async_trait]
impl PredictionClient for StaticClient {
    async fn predict(&self, _record: &FeatureRecord) -> Result<PredictionReply, ClientError> {
        Ok(PredictionReply {
            status: 200,
            body: json!({"prediction": "Adelie"}),
        })
    }

    fn target(&self) -> &str {
        "http://static/predict"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_constant_success_reports_every_iteration() {
    let server = gentoo_server().await;
    let reporter = InMemoryReporter::new();
    let client = http_client(&format!("{}/predict", server.uri()));
    let mut generator = load_generator(client, &reporter);

    generator.run_iterations(5).await;

    let outcomes = reporter.outcomes().await;
    assert_eq!(outcomes.len(), 5);
    for outcome in &outcomes {
        assert_eq!(outcome.status(), Some(200));
        assert_eq!(outcome.species(), Some(Species::Gentoo));
        assert!(outcome.input().is_valid());

        let line = outcome.to_string();
        assert!(line.starts_with("[200] "));
        assert!(line.contains(r#""prediction":"Gentoo""#));
        assert!(line.ends_with(&format!("| input: {}", outcome.input())));
    }

    // The endpoint saw exactly the records that were reported
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 5);
    for (request, outcome) in received.iter().zip(&outcomes) {
        let sent: FeatureRecord = request.body_json().unwrap();
        assert_eq!(&sent, outcome.input());
    }
}

#[tokio::test]
async fn test_connection_refused_is_reported_and_loop_continues() {
    let reporter = InMemoryReporter::new();
    let mut generator = load_generator(http_client(&refused_url()), &reporter);

    generator.run_iterations(3).await;

    let outcomes = reporter.outcomes().await;
    assert_eq!(outcomes.len(), 3);
    assert_eq!(generator.iterations(), 3);
    assert_eq!(generator.state(), LoopState::Idle);

    for outcome in &outcomes {
        match outcome {
            RequestOutcome::Failed { error, input } => {
                assert!(error.starts_with("connection failed: "));
                assert!(
                    error.to_lowercase().contains("refused"),
                    "cause missing: {}",
                    error
                );
                assert!(input.is_valid());
                assert!(outcome
                    .to_string()
                    .ends_with(&format!("| input: {}", input)));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_alternating_success_and_refusal_stay_in_lockstep() {
    let server = gentoo_server().await;
    let reporter = InMemoryReporter::new();
    let client = Arc::new(AlternatingClient {
        first: http_client(&format!("{}/predict", server.uri())),
        second: http_client(&refused_url()),
        calls: AtomicUsize::new(0),
    });
    let mut generator = load_generator(client, &reporter);

    generator.run_iterations(6).await;

    let kinds: Vec<bool> = reporter
        .outcomes()
        .await
        .iter()
        .map(RequestOutcome::is_response)
        .collect();
    assert_eq!(kinds, vec![true, false, true, false, true, false]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_non_json_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let reporter = InMemoryReporter::new();
    let mut generator = load_generator(http_client(&server.uri()), &reporter);

    let outcome = generator.tick().await;

    match &outcome {
        RequestOutcome::Failed { error, .. } => {
            assert!(error.starts_with("invalid JSON response body (500)"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(reporter.len().await, 1);
}

#[tokio::test]
async fn test_non_success_status_with_json_is_logged_as_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "field required"})),
        )
        .mount(&server)
        .await;

    let reporter = InMemoryReporter::new();
    let mut generator = load_generator(http_client(&server.uri()), &reporter);

    let outcome = generator.tick().await;

    assert_eq!(outcome.status(), Some(422));
    assert_eq!(outcome.species(), None);
    assert!(outcome
        .to_string()
        .starts_with(r#"[422] {"detail":"field required"} | input: "#));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"prediction": "Gentoo"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        Arc::new(HttpPredictionClient::new(server.uri(), Duration::from_millis(200)).unwrap());
    let reporter = InMemoryReporter::new();
    let mut generator = load_generator(client, &reporter);

    let outcome = generator.tick().await;

    match &outcome {
        RequestOutcome::Failed { error, .. } => assert!(error.contains("timed out")),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_forever_keeps_going_until_cancelled() {
    let reporter = InMemoryReporter::new();
    let mut generator = LoadGenerator::new(
        Arc::new(StaticClient),
        Arc::new(reporter.clone()),
        RecordGenerator::from_seed(9),
        Duration::from_secs(1),
    );

    let result = tokio::time::timeout(Duration::from_millis(5_500), generator.run_forever()).await;

    assert!(result.is_err(), "loop must not exit on its own");
    assert!(reporter.len().await >= 5);
    assert!(generator.iterations() >= 5);
}
