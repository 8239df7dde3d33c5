//! Process resource collector (rss and cumulative cpu time for one pid)

mod canned;
mod ps;

pub use canned::CannedStats;
pub use ps::PsCommand;

use crate::cputime::parse_cpu_time;
use crate::error::Result;
use crate::sample::{MetricSample, MetricValue};
use tracing::warn;

pub const RSS: &str = "rss";
pub const TIME: &str = "time";

/// Source of raw process-status text for a pid, one `RSS TIME` row per line.
#[async_trait::async_trait]
pub trait ProcessStatsProvider: Send + Sync {
    async fn stats(&self, pid: u32) -> Result<String>;
}

pub struct Collector<P> {
    provider: P,
}

impl<P: ProcessStatsProvider> Collector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Sample `pid`. Never fails: anything missing or unreadable is reported
    /// as zero.
    pub async fn sample(&self, pid: u32) -> MetricSample {
        let output = self.provider.stats(pid).await.unwrap_or_else(|e| {
            warn!("No stats for pid {}: {}", pid, e);
            String::new()
        });
        parse_stats(pid, &output)
    }
}

/// Build a sample from the last non-empty line of status output.
pub fn parse_stats(pid: u32, output: &str) -> MetricSample {
    let line = output.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut columns = line.split_whitespace();

    let rss = match columns.next() {
        Some(raw) => raw.parse::<u64>().unwrap_or_else(|e| {
            warn!("Bad rss column {:?} for pid {}: {}", raw, pid, e);
            0
        }),
        None => {
            warn!("No rss column for pid {}", pid);
            0
        }
    };

    let time = match columns.next() {
        Some(raw) => parse_cpu_time(raw).unwrap_or_else(|e| {
            warn!("Bad time column for pid {}: {}", pid, e);
            0.0
        }),
        None => {
            warn!("No time column for pid {}", pid);
            0.0
        }
    };

    let mut sample = MetricSample::new();
    sample.set(RSS, MetricValue::Int(rss));
    sample.set(TIME, MetricValue::Float(time));
    sample
}
