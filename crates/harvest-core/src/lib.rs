mod error;
pub use error::BatchError;

mod board;
pub use board::SlotBoard;

mod guard;
pub use guard::race_deadline;

mod observe;
pub use observe::Observe;

mod pool;
pub use pool::BatchRunner;

mod shutdown;
pub use shutdown::{Release, ShutdownError, install_interrupt_hook};

pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::error::BatchError;
    pub use crate::{BatchRunner, CancellationToken, Observe, Release, install_interrupt_hook};
    pub use harvest_model::{BatchResult, ExecutorConfig, Task, TaskOutcome};
}
