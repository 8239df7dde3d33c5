//! Record publisher: one GET per input line, checked for the success marker

use crate::config::PublisherConfig;
use crate::error::{ParseError, Result, TrackerError};
use crate::http::HttpClient;
use crate::record::Record;
use reqwest::Url;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Malformed(ParseError),
    Transport(String),
    Status(u16),
    MarkerNotFound,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Malformed(e) => write!(f, "malformed record: {}", e),
            FailureReason::Transport(e) => write!(f, "transport: {}", e),
            FailureReason::Status(code) => write!(f, "http status {}", code),
            FailureReason::MarkerNotFound => f.write_str("success marker not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(FailureReason),
    /// Debug mode: the request that would have been sent.
    DryRun(Url),
    /// Blank input line.
    Skipped,
}

impl Outcome {
    /// The stdout line for the `line_no`-th input line (1-indexed).
    pub fn status_line(&self, line_no: usize) -> String {
        match self {
            Outcome::Success => format!("{}: success", line_no),
            Outcome::Failure(_) => format!("{}: failure", line_no),
            Outcome::DryRun(url) => url.to_string(),
            Outcome::Skipped => format!("{}: skipped", line_no),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub dry_run: usize,
}

impl PublishSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Failure(_) => self.failed += 1,
            Outcome::DryRun(_) => self.dry_run += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped + self.dry_run
    }
}

pub struct Publisher<C> {
    client: C,
    base_url: Url,
    success_marker: String,
    exp_id: u64,
    debug: bool,
}

impl<C: HttpClient> Publisher<C> {
    pub fn new(client: C, config: &PublisherConfig, exp_id: u64, debug: bool) -> Result<Self> {
        if !config.base_url.ends_with('/') {
            return Err(TrackerError::config(format!(
                "base url must end with '/': {}",
                config.base_url
            )));
        }
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TrackerError::config(format!("invalid base url {}: {}", config.base_url, e)))?;
        Ok(Self {
            client,
            base_url,
            success_marker: config.success_marker.clone(),
            exp_id,
            debug,
        })
    }

    pub fn record_for(&self, line: &str) -> std::result::Result<Record, ParseError> {
        Record::parse_line(self.exp_id, line)
    }

    /// Base url with the record's fields as a form-encoded query string.
    pub fn build_url(&self, record: &Record) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().clear().extend_pairs(record.iter());
        url
    }

    pub async fn publish_line(&self, line: &str) -> Outcome {
        if line.trim().is_empty() {
            return Outcome::Skipped;
        }
        let record = match self.record_for(line) {
            Ok(record) => record,
            Err(e) => return Outcome::Failure(FailureReason::Malformed(e)),
        };
        let url = self.build_url(&record);
        if self.debug {
            return Outcome::DryRun(url);
        }

        match self.client.get(&url).await {
            Err(e) => Outcome::Failure(FailureReason::Transport(e.to_string())),
            Ok(response) if !response.is_success() => {
                Outcome::Failure(FailureReason::Status(response.status))
            }
            Ok(response) if response.body.contains(&self.success_marker) => Outcome::Success,
            Ok(_) => Outcome::Failure(FailureReason::MarkerNotFound),
        }
    }

    /// Publish every line of `input`, writing one status line per input line
    /// to `output`. Per-record failures are reported, never returned.
    pub async fn run<R, W>(&self, mut input: R, mut output: W) -> Result<PublishSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut summary = PublishSummary::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            line_no += 1;
            let outcome = match line_text(&buf) {
                Ok(line) => self.publish_line(line).await,
                Err(e) => Outcome::Failure(FailureReason::Malformed(e)),
            };
            if let Outcome::Failure(reason) = &outcome {
                warn!("Record {} failed: {}", line_no, reason);
            }
            summary.record(&outcome);
            output
                .write_all(format!("{}\n", outcome.status_line(line_no)).as_bytes())
                .await?;
        }
        output.flush().await?;

        info!(
            "Published {} records: {} succeeded, {} failed, {} skipped, {} dry run",
            summary.total(),
            summary.succeeded,
            summary.failed,
            summary.skipped,
            summary.dry_run
        );
        Ok(summary)
    }
}

/// One input line without its terminator. Invalid UTF-8 only spoils that line.
fn line_text(raw: &[u8]) -> std::result::Result<&str, ParseError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw).map_err(|e| ParseError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })
}
