use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use feed_aggregator::{
    AggregatorConfig, FeedAggregator, FetchConfig, IngestMode, SourceRegistry, StartupPolicy,
};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Ranked,
    Strict,
}

/// Run one aggregation and print the collections as JSON.
#[derive(Parser, Debug)]
#[command(name = "feed-aggregator", version)]
struct Args {
    /// JSON file with an array of sources; the built-in list when omitted
    #[arg(long)]
    sources: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Mode::Ranked)]
    mode: Mode,

    /// Also list startup entries in the latest collection
    #[arg(long)]
    dual_membership: bool,

    #[arg(long, default_value_t = 12)]
    top: usize,

    /// Per-source timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Prefix for proxied fetches; the feed URL is appended urlencoded
    #[arg(long)]
    proxy: Option<String>,

    #[arg(long)]
    pretty: bool,

    /// Include the per-source run report in the output
    #[arg(long)]
    report: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let registry = match &args.sources {
        Some(path) => SourceRegistry::from_path(path).map_err(|e| {
            error!("Failed to load sources from {}: {}", path.display(), e);
            e
        })?,
        None => SourceRegistry::builtin(),
    };

    let fetch_config = FetchConfig {
        proxy_prefix: args.proxy.clone(),
        ..Default::default()
    };
    let config = AggregatorConfig {
        mode: match args.mode {
            Mode::Ranked => IngestMode::Ranked,
            Mode::Strict => IngestMode::Strict,
        },
        startup_policy: if args.dual_membership {
            StartupPolicy::DualMembership
        } else {
            StartupPolicy::Exclusive
        },
        top_k: args.top,
        source_timeout: Duration::from_secs(args.timeout),
        ..Default::default()
    };

    info!("Starting feed aggregation over {} sources", registry.len());

    let aggregator = FeedAggregator::new(fetch_config, config)?;
    let (output, report) = aggregator.aggregate_with_report(registry.sources()).await?;

    let document = if args.report {
        json!({ "output": output, "report": report })
    } else {
        serde_json::to_value(&output)?
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", rendered);

    Ok(())
}
