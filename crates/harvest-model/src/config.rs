use thiserror::Error;

use crate::{DelayMs, TimeoutMs};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Executor tuning for one batch run.
///
/// `concurrency` is fixed for the lifetime of a run and never adjusted
/// mid-batch. Defaults match the pacing the rate-limited upstream endpoints
/// tolerate well.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Number of workers pulling tasks from the shared queue.
    pub concurrency: usize,
    /// Per-task deadline in milliseconds. `0` disables timeout checking.
    pub task_timeout_ms: TimeoutMs,
    /// Worker pause after a successful task, before claiming the next one.
    pub success_delay_ms: DelayMs,
    /// Worker pause after a failed task, to stay polite with the endpoint.
    pub backoff_delay_ms: DelayMs,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency: 6,
            task_timeout_ms: 20_000,
            success_delay_ms: 25,
            backoff_delay_ms: 100,
        }
    }
}

impl ExecutorConfig {
    /// Checked before any task runs; a bad config fails the whole batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
