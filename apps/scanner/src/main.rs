//! Spread Scanner
//!
//! Polls centralized exchanges and DEX aggregators for each trading pair and
//! prints the pairs whose cross-venue spread clears a threshold.

mod config;
mod driver;
mod report;

use clap::Parser;
use config::ScannerConfig;
use driver::{resolve_symbols, Driver};
use spread_engine::SpreadAnalyzer;
use spread_feeds::{
    build_client, build_clients, AggregatorClient, FuturesFetcher, VenuePriceFetcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Spread Scanner CLI
#[derive(Parser, Debug)]
#[command(name = "spread-scanner")]
#[command(about = "Cross-venue crypto spread scanner", long_about = None)]
struct Args {
    /// Trading pairs to scan, e.g. BTC/USDT
    symbols: Vec<String>,

    /// Minimum spread in percent
    #[arg(long)]
    threshold: Option<f64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_logging(level: &str) {
    let level = match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // stdout carries the report; logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => ScannerConfig::load(path),
        None => Ok(ScannerConfig::default()),
    };

    let level = args
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.log_level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    init_logging(&level);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    let http = match build_client(config.request_timeout()) {
        Ok(http) => http,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let threshold = args.threshold.unwrap_or(config.threshold_pct);
    let symbols = resolve_symbols(args.symbols, &config.default_symbols);

    info!("Spread scanner starting");
    info!(
        "  Venues: {}",
        config
            .venues
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("  Threshold: {}%", threshold);
    info!("  Trade amount: {}", config.trade_amount);

    let clients = build_clients(&config.venues, &http);
    let spot = Arc::new(VenuePriceFetcher::new(clients.clone()));
    let futures = Arc::new(FuturesFetcher::new(clients));

    let analyzer = config.aggregators.iter().fold(
        SpreadAnalyzer::new(spot, futures).with_trade_amount(config.trade_amount),
        |analyzer, agg| {
            debug!("  Aggregator: {} ({})", agg.name, agg.endpoint);
            analyzer.with_aggregator(Arc::new(AggregatorClient::new(agg.clone(), http.clone())))
        },
    );

    let driver = Driver::new(analyzer, threshold);
    let mut stdout = std::io::stdout();
    if let Err(e) = driver.run(&symbols, &mut stdout).await {
        error!("Failed to write report: {}", e);
    }
}
