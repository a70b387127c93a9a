mod task;
pub use task::Task;

mod outcome;
pub use outcome::{BatchResult, TaskOutcome};

mod config;
pub use config::{ConfigError, ExecutorConfig};

mod source;
pub use source::{SourceError, tasks_from_ids, tasks_from_range};

/// Timeout value in milliseconds. `0` disables the deadline.
pub type TimeoutMs = u64;

/// Pacing delay in milliseconds.
pub type DelayMs = u64;
