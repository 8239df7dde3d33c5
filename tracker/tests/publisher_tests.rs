use exp_tracker::config::PublisherConfig;
use exp_tracker::http::{HttpClient, HttpResponse};
use exp_tracker::publisher::{FailureReason, Outcome, Publisher};
use exp_tracker::{ParseError, Result, TrackerError};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers every GET with the same response and remembers the urls.
#[derive(Clone)]
struct StubClient {
    response: std::result::Result<HttpResponse, String>,
    calls: Arc<Mutex<Vec<Url>>>,
}

impl StubClient {
    fn body(status: u16, body: &str) -> Self {
        Self {
            response: Ok(HttpResponse { status, body: body.to_string() }),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn unreachable() -> Self {
        Self {
            response: Err("connection refused".to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpClient for StubClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.clone());
        self.response.clone().map_err(TrackerError::transport)
    }
}

fn config() -> PublisherConfig {
    PublisherConfig {
        base_url: "http://tracker.test/api/".to_string(),
        ..PublisherConfig::default()
    }
}

fn query_of(url: &Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

async fn run_batch(publisher: &Publisher<StubClient>, input: &str) -> String {
    let mut out = Vec::new();
    publisher.run(input.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_url_carries_exactly_the_record_fields() {
    let publisher = Publisher::new(StubClient::body(200, ""), &config(), 7, false).unwrap();
    let record = publisher.record_for("foo=1 bar=2").unwrap();
    let url = publisher.build_url(&record);

    assert_eq!(url.as_str().split('?').next(), Some("http://tracker.test/api/"));
    let expected: HashMap<String, String> = [("cmd", "data"), ("exp_id", "7"), ("foo", "1"), ("bar", "2")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(query_of(&url), expected);
}

#[test]
fn test_url_percent_encodes_values() {
    let publisher = Publisher::new(StubClient::body(200, ""), &config(), 1, false).unwrap();
    let record = publisher.record_for("path=/tmp/a&b note=50%").unwrap();
    let url = publisher.build_url(&record);
    assert!(url.as_str().contains("path=%2Ftmp%2Fa%26b"));
    assert!(url.as_str().contains("note=50%25"));
    assert_eq!(query_of(&url)["path"], "/tmp/a&b");
}

#[test]
fn test_base_url_without_slash_rejected() {
    let mut cfg = config();
    cfg.base_url = "http://tracker.test/api".to_string();
    assert!(Publisher::new(StubClient::body(200, ""), &cfg, 1, false).is_err());
}

#[tokio::test]
async fn test_debug_mode_prints_url_without_request() {
    let client = StubClient::body(200, "ADDED DATUM");
    let publisher = Publisher::new(client.clone(), &config(), 7, true).unwrap();

    let output = run_batch(&publisher, "foo=1 bar=2\n").await;

    let record = publisher.record_for("foo=1 bar=2").unwrap();
    assert_eq!(output, format!("{}\n", publisher.build_url(&record)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_marker_in_body_is_success() {
    let client = StubClient::body(200, "<html>ADDED DATUM ok</html>");
    let publisher = Publisher::new(client.clone(), &config(), 7, false).unwrap();

    let output = run_batch(&publisher, "foo=1 bar=2\n").await;

    assert_eq!(output, "1: success\n");
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(query_of(&calls[0])["foo"], "1");
}

#[tokio::test]
async fn test_missing_marker_is_failure() {
    let publisher = Publisher::new(StubClient::body(200, "ERROR: bad exp"), &config(), 7, false).unwrap();
    assert_eq!(
        publisher.publish_line("foo=1").await,
        Outcome::Failure(FailureReason::MarkerNotFound)
    );
    assert_eq!(run_batch(&publisher, "foo=1\n").await, "1: failure\n");
}

#[tokio::test]
async fn test_error_status_is_failure_even_with_marker() {
    let publisher = Publisher::new(StubClient::body(500, "ADDED DATUM"), &config(), 7, false).unwrap();
    assert_eq!(
        publisher.publish_line("foo=1").await,
        Outcome::Failure(FailureReason::Status(500))
    );
}

#[tokio::test]
async fn test_transport_error_is_failure() {
    let publisher = Publisher::new(StubClient::unreachable(), &config(), 7, false).unwrap();
    assert!(matches!(
        publisher.publish_line("foo=1").await,
        Outcome::Failure(FailureReason::Transport(_))
    ));
    assert_eq!(run_batch(&publisher, "a=1\nb=2\n").await, "1: failure\n2: failure\n");
}

#[tokio::test]
async fn test_malformed_line_does_not_abort_batch() {
    let client = StubClient::body(200, "ADDED DATUM");
    let publisher = Publisher::new(client.clone(), &config(), 7, false).unwrap();

    let output = run_batch(&publisher, "a=1\nbroken token\nb=2\n").await;

    assert_eq!(output, "1: success\n2: failure\n3: success\n");
    assert_eq!(client.calls().len(), 2);
    assert_eq!(
        publisher.publish_line("broken").await,
        Outcome::Failure(FailureReason::Malformed(ParseError::MissingEquals("broken".to_string())))
    );
}

#[tokio::test]
async fn test_blank_lines_are_skipped() {
    let client = StubClient::body(200, "ADDED DATUM");
    let publisher = Publisher::new(client.clone(), &config(), 7, false).unwrap();

    let mut out = Vec::new();
    let summary = publisher.run("a=1\n   \nb=2\n".as_bytes(), &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "1: success\n2: skipped\n3: success\n");
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(client.calls().len(), 2);
}

#[tokio::test]
async fn test_empty_input_produces_no_output() {
    let client = StubClient::body(200, "ADDED DATUM");
    let publisher = Publisher::new(client.clone(), &config(), 7, false).unwrap();
    assert_eq!(run_batch(&publisher, "").await, "");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_abort_batch() {
    let client = StubClient::body(200, "ADDED DATUM");
    let publisher = Publisher::new(client.clone(), &config(), 7, false).unwrap();

    let mut out = Vec::new();
    let summary = publisher.run(&b"a=1\nb=\xff\nc=3\n"[..], &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "1: success\n2: failure\n3: success\n");
    assert_eq!(summary.failed, 1);
    assert_eq!(client.calls().len(), 2);
}

#[tokio::test]
async fn test_crlf_and_unterminated_last_line() {
    let client = StubClient::body(200, "ADDED DATUM");
    let publisher = Publisher::new(client.clone(), &config(), 7, false).unwrap();

    assert_eq!(run_batch(&publisher, "a=1\r\nb=2").await, "1: success\n2: success\n");
    let calls = client.calls();
    assert_eq!(query_of(&calls[0])["a"], "1");
    assert_eq!(query_of(&calls[1])["b"], "2");
}

#[tokio::test]
async fn test_debug_mode_counts_dry_runs() {
    let publisher = Publisher::new(StubClient::body(200, ""), &config(), 7, true).unwrap();

    let mut out = Vec::new();
    let summary = publisher.run("a=1\n\nb=2\n".as_bytes(), &mut out).await.unwrap();

    assert_eq!(summary.dry_run, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded + summary.failed, 0);
    assert_eq!(summary.total(), 3);
}
