use std::time::Duration;

use tracing::{info, warn};

use harvest_core::Observe;
use harvest_model::TaskOutcome;

/// Logs one line per task outcome: id, status, elapsed time.
///
/// The operator-visibility hook for batch runs; attach via
/// `BatchRunner::with_observer`. Observational only.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressLog;

impl<V> Observe<V> for ProgressLog {
    fn on_outcome(&self, id: &str, outcome: &TaskOutcome<V>, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            TaskOutcome::Success { .. } => {
                info!(target: "harvest.progress", id, elapsed_ms, "ok")
            }
            TaskOutcome::Failure { reason } => {
                warn!(target: "harvest.progress", id, elapsed_ms, %reason, "failed")
            }
        }
    }
}
