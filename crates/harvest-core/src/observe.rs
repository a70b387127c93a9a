use std::time::Duration;

use harvest_model::TaskOutcome;

/// Per-outcome progress hook.
///
/// Fired once per recorded outcome with the task's id, its outcome and the
/// wall-clock time the invocation took. Purely observational: hooks run on
/// the worker that produced the outcome and must never affect scheduling.
pub trait Observe<V>: Send + Sync {
    fn on_outcome(&self, id: &str, outcome: &TaskOutcome<V>, elapsed: Duration);
}
