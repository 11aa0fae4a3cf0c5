mod chain;
mod cli;
mod directory;
mod report;

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use era_stats::GeoBinDirectory;

use chain::SubxtChain;
use cli::{Cli, FormatArg};
use report::TextReport;

/// Log lines go to stderr so stdout carries only the report.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging();

    let config = cli.pipeline_config();

    let http = directory::http_client(Duration::from_secs(cli.http_timeout_secs))?;
    log::info!("Fetching node directory from {}", cli.directory_url);
    let records = directory::fetch_node_records(&http, &cli.directory_url).await?;
    let geo_bins = GeoBinDirectory::with_filter(&records, cli.status_filter());

    log::info!("Connecting to node at {}...", cli.rpc_url);
    let chain = SubxtChain::connect(&cli.rpc_url, cli.ss58_prefix).await?;
    log::info!("Connected successfully");

    let report = era_stats::pipeline::run(&chain, &geo_bins, &config).await?;

    match cli.format {
        FormatArg::Text => print!("{}", TextReport::new(&report, cli.per_validator)),
        FormatArg::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
