//! politigraph-gen - province vote map data generator
//!
//! Pulls every person and vote event from the politigraph API, rebuilds
//! the four JSON tables from scratch and writes them to the output
//! directory. Exits non-zero if any step fails; no partial output is
//! written in that case.

use anyhow::{Context, Result};
use clap::Parser;
use politigraph_common::config::{ConfigOverrides, ConfigResolver};
use politigraph_gen::RunSummary;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Generate the politigraph province vote map data files
#[derive(Parser, Debug)]
#[command(name = "politigraph-gen")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/politigraph/config.toml if present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// GraphQL endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory receiving the JSON tables
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Four-digit year of the vote events to include
    #[arg(long)]
    year: Option<String>,

    /// Rows requested per page
    #[arg(long)]
    batch_size: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting politigraph-gen v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match generate(args).await {
        Ok(summary) => {
            info!(
                people = summary.people_fetched,
                vote_events = summary.vote_events_fetched,
                "✓ Data generation completed successfully ({} files)",
                summary.files.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Data generation failed: {:#}", e);
            eprintln!("\n✗ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn generate(args: Args) -> Result<RunSummary> {
    let overrides = ConfigOverrides {
        endpoint_url: args.endpoint,
        output_dir: args.output_dir,
        target_year: args.year,
        batch_size: args.batch_size,
    };
    let mut resolver = ConfigResolver::new().with_overrides(overrides);
    if let Some(path) = args.config {
        resolver = resolver.with_config_path(path);
    }
    let config = resolver.resolve().context("Failed to resolve configuration")?;

    info!(
        endpoint = %config.endpoint_url,
        output_dir = %config.output_dir.display(),
        year = %config.target_year,
        "Resolved configuration"
    );

    politigraph_gen::run_remote(&config)
        .await
        .context("Data generation failed")
}
