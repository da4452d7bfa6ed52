//! merge-list CLI

mod cli;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Merge-readiness report for open pull requests
#[derive(Parser, Debug)]
#[command(name = "merge-list", version, about)]
struct Args {
    /// Target GitHub organisation
    #[arg(short, long, default_value = "zephyrproject-rtos")]
    org: String,

    /// Target GitHub repository
    #[arg(short, long, default_value = "zephyr")]
    repo: String,

    /// Comma separated list of milestones to ignore
    #[arg(short = 'i', long)]
    ignore_milestones: Option<String>,

    /// Comma separated list of labels to ignore
    #[arg(short = 'l', long)]
    ignore_labels: Option<String>,

    /// Path of the repository publishing the report
    #[arg(long = "self")]
    self_path: Option<String>,

    /// Config file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub Enterprise host
    #[arg(long)]
    host: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "merge_list=debug"
    } else {
        "merge_list=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = cli::RunOptions {
        owner: args.org,
        repo: args.repo,
        host: args.host,
        config_path: args.config,
        ignore_milestones: args.ignore_milestones,
        ignore_labels: args.ignore_labels,
        repository_path: args.self_path,
    };

    cli::run_report(options)
        .await
        .context("merge-list run failed")
}
