use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use harvest_model::TaskOutcome;

/// Race one task invocation against its deadline.
///
/// The invocation runs as a detached runtime task. When the timer wins, the
/// join handle is dropped: the invocation keeps running in the background
/// and its eventual settlement is discarded, since there is no preemption
/// for arbitrary remote calls. `cancel` is cancelled on expiry so
/// cooperative callees can stop early; nothing here depends on them doing
/// so.
///
/// Spawning also confines panics: a panicking invocation becomes a
/// `Failure` instead of taking a worker down with it.
///
/// `timeout_ms == 0` disables deadline checking entirely (a debugging
/// escape hatch, not a 0ms deadline).
pub async fn race_deadline<V, E, F>(
    invocation: F,
    cancel: CancellationToken,
    timeout_ms: u64,
    tag: &str,
) -> TaskOutcome<V>
where
    V: Send + 'static,
    E: Display + Send + 'static,
    F: Future<Output = Result<V, E>> + Send + 'static,
{
    let handle = tokio::spawn(invocation);

    if timeout_ms == 0 {
        return settle(handle.await);
    }

    match tokio::time::timeout(Duration::from_millis(timeout_ms), handle).await {
        Ok(joined) => settle(joined),
        Err(_) => {
            cancel.cancel();
            TaskOutcome::failure(format!("Timeout after {timeout_ms}ms ({tag})"))
        }
    }
}

fn settle<V, E: Display>(joined: Result<Result<V, E>, JoinError>) -> TaskOutcome<V> {
    match joined {
        Ok(Ok(value)) => TaskOutcome::success(value),
        Ok(Err(e)) => TaskOutcome::failure(e.to_string()),
        Err(join) if join.is_panic() => TaskOutcome::failure(format!("task panicked: {join}")),
        Err(join) => TaskOutcome::failure(join.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn never() -> Result<u32, String> {
        std::future::pending().await
    }

    async fn blows_up() -> Result<u32, String> {
        panic!("decoder blew up")
    }

    #[tokio::test]
    async fn value_wins_the_race() {
        let outcome = race_deadline(
            async { Ok::<_, String>(42u32) },
            CancellationToken::new(),
            1_000,
            "id=1",
        )
        .await;
        assert_eq!(outcome, TaskOutcome::success(42));
    }

    #[tokio::test]
    async fn invocation_error_becomes_failure() {
        let outcome: TaskOutcome<u32> = race_deadline(
            async { Err("no route".to_string()) },
            CancellationToken::new(),
            1_000,
            "id=2",
        )
        .await;
        assert_eq!(outcome, TaskOutcome::failure("no route"));
    }

    #[tokio::test]
    async fn deadline_wins_against_hung_invocation() {
        let cancel = CancellationToken::new();
        let outcome = race_deadline(never(), cancel.clone(), 50, "id=3").await;

        assert_eq!(
            outcome,
            TaskOutcome::failure("Timeout after 50ms (id=3)")
        );
        // cooperative callees get to observe the expiry
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn zero_timeout_disables_the_deadline() {
        let outcome = race_deadline(
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, String>(7u32)
            },
            CancellationToken::new(),
            0,
            "id=4",
        )
        .await;
        assert_eq!(outcome, TaskOutcome::success(7));
    }

    #[tokio::test]
    async fn panic_is_contained_as_failure() {
        let outcome = race_deadline(blows_up(), CancellationToken::new(), 1_000, "id=5").await;
        let reason = outcome.reason().unwrap();
        assert!(reason.contains("panicked"), "unexpected reason: {reason}");
    }
}
