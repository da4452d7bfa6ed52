//! Main-branch CI aggregation - effectful
//!
//! Fetches the runs for the branch head and, when the test-suite run there
//! was cancelled, walks back a bounded number of first-parent ancestors to
//! find a commit with a usable test-suite result.

use crate::ci::summary::{
    CiRunEntry, CiStatus, RunClass, classify_run, has_named_run, named_run_cancelled,
};
use crate::config::CiConfig;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{CommitInfo, RunFilter, WorkflowRunSummary};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// The run set chosen for reporting
#[derive(Debug, Clone)]
pub struct RunSet {
    /// Commit the runs belong to
    pub commit: String,
    /// Runs of that commit
    pub runs: Vec<WorkflowRunSummary>,
    /// Branch head these runs stand in for, when an ancestor was used
    pub substituted_for: Option<String>,
}

fn main_branch_filter(config: &CiConfig, sha: &str) -> RunFilter {
    RunFilter {
        branch: Some(config.main_branch.clone()),
        event: Some(config.event.clone()),
        head_sha: sha.to_string(),
    }
}

/// Pick the run set to report for `head`.
///
/// If the test-suite run at `head` was cancelled, up to
/// `config.history_depth` first-parent ancestors are tried in order. The
/// first one whose test-suite run exists and was not cancelled is used.
/// Otherwise the head's own runs are kept. Failures while walking end the
/// walk and keep the head's runs.
pub async fn select_run_set(
    platform: &dyn PlatformService,
    head: &CommitInfo,
    config: &CiConfig,
) -> Result<RunSet> {
    let runs = platform
        .list_workflow_runs(&main_branch_filter(config, &head.sha))
        .await?;

    let fallback = RunSet {
        commit: head.sha.clone(),
        runs,
        substituted_for: None,
    };

    if !named_run_cancelled(&fallback.runs, &config.test_run_name) {
        return Ok(fallback);
    }

    info!(commit = %head.sha, run = %config.test_run_name, "test run cancelled, searching history");

    let mut current = head.clone();
    let mut attempts = 0;
    while attempts < config.history_depth {
        attempts += 1;

        let Some(parent) = current.first_parent().map(str::to_string) else {
            info!(commit = %current.sha, "reached root commit");
            break;
        };

        current = match platform.get_commit(&parent).await {
            Ok(commit) => commit,
            Err(e) => {
                warn!(commit = %parent, error = %e, "failed to fetch ancestor, stopping history search");
                break;
            }
        };
        debug!(attempt = attempts, commit = %current.sha, "trying ancestor");

        let candidate = match platform
            .list_workflow_runs(&main_branch_filter(config, &current.sha))
            .await
        {
            Ok(runs) => runs,
            Err(e) => {
                warn!(commit = %current.sha, error = %e, "failed to list runs, stopping history search");
                break;
            }
        };

        if !has_named_run(&candidate, &config.test_run_name)
            || named_run_cancelled(&candidate, &config.test_run_name)
        {
            continue;
        }

        info!(head = %head.sha, using = %current.sha, "substituting ancestor CI runs");
        return Ok(RunSet {
            commit: current.sha,
            runs: candidate,
            substituted_for: Some(head.sha.clone()),
        });
    }

    warn!(
        commit = %head.sha,
        depth = config.history_depth,
        "no usable ancestor found, reporting cancelled runs"
    );
    Ok(fallback)
}

/// Classify a run set into report entries.
///
/// Runs with unreported statuses or conclusions are logged and dropped, as
/// are running runs whose job list cannot be fetched.
pub async fn summarize_runs(
    platform: &dyn PlatformService,
    run_set: RunSet,
    now: DateTime<Utc>,
) -> CiStatus {
    let mut entries = Vec::new();

    for run in &run_set.runs {
        match classify_run(run) {
            RunClass::Terminal(outcome) => entries.push(CiRunEntry::terminal(run, outcome)),
            RunClass::Running => match platform.get_job_progress(run.id).await {
                Ok(jobs) => entries.push(CiRunEntry::running(run, jobs, now)),
                Err(e) => warn!(run = %run.name, error = %e, "failed to fetch jobs, skipping run"),
            },
            RunClass::IgnoredConclusion(conclusion) => {
                warn!(run = %run.name, %conclusion, "ignoring conclusion");
            }
            RunClass::IgnoredStatus(status) => {
                warn!(run = %run.name, %status, "ignoring status");
            }
        }
    }

    CiStatus {
        commit: run_set.commit,
        substituted_for: run_set.substituted_for,
        entries,
    }
}

/// Aggregate the CI state of the main branch
pub async fn aggregate_ci_status(
    platform: &dyn PlatformService,
    config: &CiConfig,
    now: DateTime<Utc>,
) -> Result<CiStatus> {
    let head = platform.get_branch_head(&config.main_branch).await?;
    debug!(branch = %config.main_branch, commit = %head.sha, "resolved branch head");

    let run_set = select_run_set(platform, &head, config).await?;
    Ok(summarize_runs(platform, run_set, now).await)
}
