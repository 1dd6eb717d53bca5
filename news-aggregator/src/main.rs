use anyhow::{Context, Result};
use clap::Parser;
use news_aggregator::{AggregatorConfig, NewsPipeline};
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "news-aggregator.toml";

#[derive(Parser, Debug)]
#[command(name = "news-aggregator", about = "Topic news aggregation and deduplication")]
struct Args {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run a single cycle, print its report as JSON and exit
    #[arg(long)]
    once: bool,

    /// Print the stored articles as JSON after each cycle
    #[arg(long)]
    dump: bool,

    /// Override the refresh interval from the config
    #[arg(long)]
    interval_hours: Option<u64>,

    /// Log level (info, debug, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = load_config(args.config.as_ref()).await?;
    let pipeline = NewsPipeline::from_config(&config).context("failed to build news pipeline")?;

    if args.once {
        run_and_report(&pipeline, args.dump).await?;
        return Ok(());
    }

    let hours = args.interval_hours.unwrap_or(config.schedule.interval_hours).max(1);
    let period = Duration::from_secs(hours * 3600);
    info!(interval_hours = hours, "starting periodic updates");

    // The first tick fires immediately, giving an initial scrape on startup.
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_and_report(&pipeline, args.dump).await {
                    error!(error = %e, "failed to report cycle");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    Ok(())
}

async fn load_config(path: Option<&PathBuf>) -> Result<AggregatorConfig> {
    let path = match path {
        Some(p) => {
            anyhow::ensure!(p.exists(), "config file not found: {}", p.display());
            Some(p.clone())
        }
        None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
    };

    match path {
        Some(p) => {
            let config = AggregatorConfig::from_file(&p)
                .await
                .with_context(|| format!("failed to load config from {}", p.display()))?;
            info!(path = %p.display(), "configuration loaded");
            Ok(config)
        }
        None => {
            info!("no config file found, using built-in sources");
            Ok(AggregatorConfig::default())
        }
    }
}

async fn run_and_report(pipeline: &NewsPipeline, dump: bool) -> Result<()> {
    let report = pipeline.run_cycle().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let store = pipeline.store();
    let stats = store.stats().await;
    info!(
        total = stats.total_articles,
        categories = ?stats.count_by_category,
        sources = ?stats.count_by_source,
        "store statistics"
    );

    if let Some(digest) = pipeline.digest().await {
        info!(%digest, "latest digest");
    }

    if dump {
        let snapshot = store.snapshot().await;
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    }

    Ok(())
}
