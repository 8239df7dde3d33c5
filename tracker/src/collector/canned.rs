//! Fixed-output provider for tests and dry runs

use super::ProcessStatsProvider;
use crate::error::{Result, TrackerError};

/// Provider returning fixed text, or a fixed failure.
#[derive(Debug, Clone)]
pub struct CannedStats {
    output: Option<String>,
}

impl CannedStats {
    pub fn new(output: impl Into<String>) -> Self {
        Self { output: Some(output.into()) }
    }

    pub fn failing() -> Self {
        Self { output: None }
    }
}

#[async_trait::async_trait]
impl ProcessStatsProvider for CannedStats {
    async fn stats(&self, pid: u32) -> Result<String> {
        self.output
            .clone()
            .ok_or_else(|| TrackerError::process(format!("canned failure for pid {}", pid)))
    }
}
