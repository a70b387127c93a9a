use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShutdownError {
    #[error("interrupt hook has already been installed")]
    AlreadyInstalled,
}

/// Scoped release of the shared connection resource.
///
/// Invoked from the interrupt path, and normally by the caller once the
/// batch completes. The hook ignores failures; implementations should still
/// report their own.
#[async_trait]
pub trait Release: Send + Sync {
    async fn release(&self) -> anyhow::Result<()>;
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Register the process-level interrupt listener. One hook per run; a second
/// installation is rejected.
///
/// On ctrl-c the run is abandoned wholesale: log, give the resource
/// `grace_ms` to release, then exit with a non-zero status. In-flight tasks
/// are neither cancelled nor awaited, which suits a one-shot batch job but
/// not a long-lived service.
///
/// Must be called from within a tokio runtime.
pub fn install_interrupt_hook(
    resource: Arc<dyn Release>,
    grace_ms: u64,
) -> Result<(), ShutdownError> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(ShutdownError::AlreadyInstalled);
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("interrupt listener unavailable; hook disabled");
            return;
        }
        warn!("interrupt received; abandoning in-flight tasks");

        match tokio::time::timeout(Duration::from_millis(grace_ms), resource.release()).await {
            Ok(Ok(())) => info!("connection released"),
            Ok(Err(e)) => warn!("connection release failed: {e}"),
            Err(_) => warn!("connection release timed out after {grace_ms}ms"),
        }

        std::process::exit(1);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopConnection;

    #[async_trait]
    impl Release for NoopConnection {
        async fn release(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_installation_is_rejected() {
        let conn = Arc::new(NoopConnection);

        assert!(install_interrupt_hook(conn.clone(), 500).is_ok());
        assert_eq!(
            install_interrupt_hook(conn, 500),
            Err(ShutdownError::AlreadyInstalled)
        );
    }
}
