mod args;
mod client;

use std::fs;
use std::sync::Arc;

use tracing::info;

use harvest_core::{BatchRunner, CancellationToken, Release, install_interrupt_hook};
use harvest_model::{ExecutorConfig, Task, tasks_from_range};
use harvest_observe::{LoggerConfig, ProgressLog, logger_init};

use crate::args::Args;
use crate::client::FarmClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    logger_init(&LoggerConfig::default())?;

    // 2) CLI
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(&argv)?;
    info!(
        endpoint = %args.endpoint,
        from = args.from,
        to = args.to,
        concurrency = args.concurrency,
        timeout_ms = args.timeout_ms,
        "starting farm APR fetch"
    );

    // 3) Task range
    let tasks = tasks_from_range(args.from, args.to)?;

    // 4) Remote client; a dead endpoint fails the run before any task starts
    let client = Arc::new(FarmClient::connect(&args.endpoint).await?);
    info!("endpoint ready");

    // 5) Interrupt hook: release the connection, abandon the run
    install_interrupt_hook(client.clone(), 500)?;

    // 6) Batch run
    let config = ExecutorConfig {
        concurrency: args.concurrency,
        task_timeout_ms: args.timeout_ms,
        ..Default::default()
    };
    let runner: BatchRunner<serde_json::Value> =
        BatchRunner::new(config)?.with_observer(Arc::new(ProgressLog));

    let fetch_client = Arc::clone(&client);
    let result = runner
        .run(tasks, move |task: Task<String>, _cancel: CancellationToken| {
            let client = Arc::clone(&fetch_client);
            async move { client.farm_apr(&task.input).await }
        })
        .await?;

    // 7) Report
    let report = result.to_report()?;
    if let Some(parent) = args.out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.out_path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %args.out_path.display(), "report saved");

    let _ = client.release().await;
    Ok(())
}
