mod client;

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tracing::info;

use harvest_core::{BatchRunner, CancellationToken, Release, install_interrupt_hook};
use harvest_model::{ExecutorConfig, Task, tasks_from_ids};
use harvest_observe::{LoggerConfig, ProgressLog, logger_init};

use crate::client::{PriceClient, PriceError};

const DEFAULT_ENDPOINT: &str = "https://prices.example.net/api";

/// The stable quote asset carries 6 decimals; raw amounts are scaled down
/// by this factor to get a price in quote units.
const QUOTE_SCALE: f64 = 1_000_000.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger; stdout stays clean for the report JSON
    logger_init(&LoggerConfig::default())?;

    // 2) CLI
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let endpoint = flag(&argv, "endpoint")
        .unwrap_or(DEFAULT_ENDPOINT)
        .to_string();
    let quote_id = flag(&argv, "quote").unwrap_or("10").to_string();
    let concurrency: usize = parse_flag(&argv, "concurrency", 4)?;
    let timeout_ms: u64 = parse_flag(&argv, "timeout", 20_000)?;

    // 3) Asset list: explicit --assets, or the registry's first 31 ids
    let ids: Vec<String> = match flag(&argv, "assets") {
        Some(raw) => raw.split(',').map(|s| s.trim().to_string()).collect(),
        None => (0..=30).map(|id| id.to_string()).collect(),
    };
    let tasks = tasks_from_ids(ids);
    info!(
        endpoint = %endpoint,
        quote = %quote_id,
        assets = tasks.len(),
        "starting spot price fetch"
    );

    // 4) Remote client; fatal before any task starts
    let client = Arc::new(PriceClient::connect(&endpoint).await?);

    // 5) Interrupt hook
    install_interrupt_hook(client.clone(), 500)?;

    // 6) Batch run
    let config = ExecutorConfig {
        concurrency: concurrency.max(1),
        task_timeout_ms: timeout_ms,
        ..Default::default()
    };
    let runner: BatchRunner<serde_json::Value> =
        BatchRunner::new(config)?.with_observer(Arc::new(ProgressLog));

    let fetch_client = Arc::clone(&client);
    let quote = quote_id.clone();
    let result = runner
        .run(tasks, move |task: Task<String>, _cancel: CancellationToken| {
            let client = Arc::clone(&fetch_client);
            let quote = quote.clone();
            async move {
                if task.id == quote {
                    // selling the quote asset against itself; price is 1 by definition
                    info!(id = %task.id, "quote asset, price pinned to 1");
                    return Ok(json!(1.0));
                }

                let raw = client.spot(&task.input, &quote).await?;
                let price = raw / QUOTE_SCALE;
                if price <= 0.0 {
                    return Err(PriceError::NonPositive {
                        id: task.id.clone(),
                        price,
                    });
                }
                Ok(json!(price))
            }
        })
        .await?;

    // 7) Report JSON on stdout, nothing else
    let report = result.to_report()?;
    println!("{}", serde_json::to_string(&report)?);

    let _ = client.release().await;
    Ok(())
}

fn flag<'a>(argv: &'a [String], name: &str) -> Option<&'a str> {
    argv.iter()
        .position(|a| a.strip_prefix("--") == Some(name))
        .and_then(|i| argv.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(argv: &[String], name: &str, fallback: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match flag(argv, name) {
        Some(raw) => raw.parse().with_context(|| format!("invalid --{name}: {raw}")),
        None => Ok(fallback),
    }
}
