//! The report command

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use crate::cli::summary::print_summary;
use anstream::println;
use chrono::Utc;
use merge_list::error::{Error, Result};
use merge_list::platform::PlatformService;
use merge_list::report::{build_report, write_outputs};
use std::path::PathBuf;
use tracing::{info, warn};

/// Options for a report run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// GitHub Enterprise host
    pub host: Option<String>,
    /// Explicit config file
    pub config_path: Option<PathBuf>,
    /// Comma separated milestones overriding the config
    pub ignore_milestones: Option<String>,
    /// Comma separated labels overriding the config
    pub ignore_labels: Option<String>,
    /// Path of the repository publishing the report
    pub repository_path: Option<String>,
}

async fn log_rate_limit(platform: &dyn PlatformService) {
    match platform.rate_limit().await {
        Ok(rate) => info!(
            limit = rate.limit,
            remaining = rate.remaining,
            reset = %rate.reset,
            "rate limit"
        ),
        Err(e) => warn!(error = %e, "failed to read rate limit"),
    }
}

/// Run the report command
pub async fn run_report(options: RunOptions) -> Result<()> {
    let ctx = CommandContext::new(&options).await?;
    let platform = ctx.platform.as_ref();
    let deadline = ctx.config.run.deadline();

    log_rate_limit(platform).await;

    let progress = CliProgress::new();
    let report = tokio::time::timeout(
        deadline,
        build_report(
            platform,
            &ctx.config,
            options.repository_path.clone(),
            Utc::now(),
            &progress,
        ),
    )
    .await
    .map_err(|_| Error::Deadline(deadline))??;

    print_summary(&report);

    write_outputs(&report, &ctx.templates, &ctx.config.report)?;

    println!(
        "{} {} PR(s) listed, {} failed, written to {}",
        check(),
        report.entries.len().accent(),
        report.failures.len().accent(),
        ctx.config.report.html_out.display().emphasis()
    );

    log_rate_limit(platform).await;
    Ok(())
}
