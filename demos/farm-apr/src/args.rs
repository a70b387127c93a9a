use std::path::PathBuf;

use anyhow::{Context, bail};

const DEFAULT_ENDPOINT: &str = "https://farms.example.net/api";

const USAGE: &str = "usage: farm-apr <out.json> \
[--endpoint URL] [--from N] [--to N] [--concurrency N] [--timeout MS]";

/// Batch APR fetch over an inclusive farm-id range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    pub out_path: PathBuf,
    pub endpoint: String,
    pub from: i64,
    pub to: i64,
    pub concurrency: usize,
    pub timeout_ms: u64,
}

impl Args {
    pub fn parse(argv: &[String]) -> anyhow::Result<Self> {
        let Some(out_path) = argv.first().filter(|a| !a.starts_with("--")) else {
            bail!("missing output path\n{USAGE}");
        };

        let concurrency: usize = parse_flag(argv, "concurrency", 6)?;
        let timeout_ms: u64 = parse_flag(argv, "timeout", 20_000)?;

        Ok(Self {
            out_path: PathBuf::from(out_path),
            endpoint: flag(argv, "endpoint")
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            from: parse_flag(argv, "from", 1)?,
            to: parse_flag(argv, "to", 35)?,
            // 5-8 workers is the polite range for the public endpoints
            concurrency: concurrency.max(1),
            timeout_ms: timeout_ms.max(1_000),
        })
    }
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
