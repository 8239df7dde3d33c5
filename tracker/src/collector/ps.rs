//! `ps` backed provider

use super::ProcessStatsProvider;
use crate::config::CollectorConfig;
use crate::error::{Result, TrackerError};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs `ps -o rss= -o time= -p <pid>`.
pub struct PsCommand {
    program: String,
    timeout: Duration,
}

impl PsCommand {
    pub fn new(config: &CollectorConfig) -> Self {
        Self {
            program: config.program.clone(),
            timeout: config.timeout(),
        }
    }
}

impl Default for PsCommand {
    fn default() -> Self {
        Self::new(&CollectorConfig::default())
    }
}

#[async_trait::async_trait]
impl ProcessStatsProvider for PsCommand {
    async fn stats(&self, pid: u32) -> Result<String> {
        let pid_arg = pid.to_string();
        debug!("Running {} for pid {}", self.program, pid);
        let child = Command::new(&self.program)
            .args(["-o", "rss=", "-o", "time=", "-p", &pid_arg])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| TrackerError::process(format!("{} timed out after {:?}", self.program, self.timeout)))?
            .map_err(|e| TrackerError::process(format!("failed to run {}: {}", self.program, e)))?;

        // ps exits non-zero when the pid does not exist
        if !output.status.success() {
            return Err(TrackerError::process(format!(
                "{} exited with {} for pid {}",
                self.program, output.status, pid
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
