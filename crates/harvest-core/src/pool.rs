use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use harvest_model::{BatchResult, ExecutorConfig, Task, TaskOutcome};

use crate::{SlotBoard, error::BatchError, guard::race_deadline, observe::Observe};

/// Fixed-size worker pool driving one batch run.
///
/// Exactly `concurrency` workers share a claim cursor and a write-once slot
/// board. Each claimed index has a single writer, and each worker holds at
/// most one invocation in flight, so in-flight invocations never exceed the
/// configured concurrency.
pub struct BatchRunner<V> {
    config: ExecutorConfig,
    observers: Vec<Arc<dyn Observe<V>>>,
}

impl<V> std::fmt::Debug for BatchRunner<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<V> BatchRunner<V>
where
    V: Send + Sync + 'static,
{
    /// Validates the config up front; nothing runs on a bad config.
    pub fn new(config: ExecutorConfig) -> Result<Self, BatchError> {
        config.validate()?;
        Ok(Self {
            config,
            observers: Vec::new(),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observe<V>>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run every task and return one outcome per task, in input order.
    ///
    /// Per-task failures (remote errors, deadline expiry, panics) are
    /// recorded as outcomes and never abort the batch. An error from this
    /// function means a configuration problem or a broken executor
    /// invariant, and yields no partial output.
    pub async fn run<I, E, F, Fut>(
        &self,
        tasks: Vec<Task<I>>,
        task_fn: F,
    ) -> Result<BatchResult<V>, BatchError>
    where
        I: Clone + Send + Sync + 'static,
        E: Display + Send + 'static,
        F: Fn(Task<I>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        if tasks.is_empty() {
            return Ok(BatchResult::empty());
        }

        let total = tasks.len();
        let ids: Vec<String> = tasks.iter().map(|task| task.id.clone()).collect();

        let tasks = Arc::new(tasks);
        let task_fn = Arc::new(task_fn);
        let cursor = Arc::new(AtomicUsize::new(0));
        let board = Arc::new(SlotBoard::new(total));

        debug!(
            total,
            concurrency = self.config.concurrency,
            timeout_ms = self.config.task_timeout_ms,
            "starting batch"
        );

        let mut workers = JoinSet::new();
        for worker in 0..self.config.concurrency {
            workers.spawn(worker_loop(
                worker,
                self.config.clone(),
                Arc::clone(&tasks),
                Arc::clone(&task_fn),
                Arc::clone(&cursor),
                Arc::clone(&board),
                self.observers.clone(),
            ));
        }

        let mut first_err: Option<BatchError> = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first_err.get_or_insert(e);
                }
                // a dead worker leaves unclaimed slots; finalize reports them
                Err(e) => warn!("worker aborted: {e}"),
            }
        }
        if let Some(e) = first_err {
            return Err(e);
        }

        let board = match Arc::try_unwrap(board) {
            Ok(board) => board,
            Err(shared) => {
                return Err(BatchError::IncompleteBatch {
                    missing: shared.unset_count(),
                });
            }
        };
        let outcomes = board.finalize()?;

        debug!(total, "batch complete");
        Ok(BatchResult::new(ids.into_iter().zip(outcomes).collect()))
    }
}

/// One worker: claim the next index, run the guarded invocation, record the
/// slot, pace, repeat until the queue is exhausted.
async fn worker_loop<I, V, E, F, Fut>(
    worker: usize,
    config: ExecutorConfig,
    tasks: Arc<Vec<Task<I>>>,
    task_fn: Arc<F>,
    cursor: Arc<AtomicUsize>,
    board: Arc<SlotBoard<V>>,
    observers: Vec<Arc<dyn Observe<V>>>,
) -> Result<(), BatchError>
where
    I: Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Display + Send + 'static,
    F: Fn(Task<I>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
{
    loop {
        // single atomic increment per dispatch: no two workers see the same index
        let index = cursor.fetch_add(1, Ordering::SeqCst);
        if index >= tasks.len() {
            debug!(worker, "queue exhausted");
            return Ok(());
        }

        let task = tasks[index].clone();
        let id = task.id.clone();
        let tag = format!("id={id}");
        let started = Instant::now();

        let cancel = CancellationToken::new();
        let invocation = (task_fn)(task, cancel.child_token());
        let outcome = race_deadline(invocation, cancel, config.task_timeout_ms, &tag).await;

        let elapsed = started.elapsed();
        match &outcome {
            TaskOutcome::Success { .. } => debug!(worker, %id, ?elapsed, "task done"),
            TaskOutcome::Failure { reason } => warn!(worker, %id, ?elapsed, %reason, "task failed"),
        }
        for observer in &observers {
            observer.on_outcome(&id, &outcome, elapsed);
        }

        let delay_ms = if outcome.is_success() {
            config.success_delay_ms
        } else {
            config.backoff_delay_ms
        };
        board.set(index, outcome)?;

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
