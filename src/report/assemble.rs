//! Report assembly - runs the whole evaluation for one repository

use crate::ci::{CiStatus, aggregate_ci_status};
use crate::config::Config;
use crate::eligibility::{PrEvaluation, PrFailure, evaluate_pull_request, rank_evaluations};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::release::{FreezeStatus, detect_feature_freeze};
use crate::report::candidates::{CandidateFilter, SkipReason, is_target_branch, search_query};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Callback for evaluation progress
pub trait EvaluationProgress: Send + Sync {
    /// Evaluation of `total` PRs is about to start
    fn on_start(&self, total: usize);
    /// PR `number` is being processed
    fn on_pr(&self, number: u64);
    /// All PRs processed
    fn on_finish(&self);
}

/// Progress callback that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl EvaluationProgress for NoProgress {
    fn on_start(&self, _total: usize) {}
    fn on_pr(&self, _number: u64) {}
    fn on_finish(&self) {}
}

/// Everything the renderer needs
#[derive(Debug, Clone)]
pub struct Report {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Evaluated PRs, ranked
    pub entries: Vec<PrEvaluation>,
    /// PRs that could not be evaluated
    pub failures: Vec<PrFailure>,
    /// Main-branch CI state
    pub ci: CiStatus,
    /// Release freeze state
    pub freeze: FreezeStatus,
    /// Milestones that were skipped
    pub ignored_milestones: Vec<String>,
    /// Labels that were skipped
    pub ignored_labels: Vec<String>,
    /// Path of the repository publishing the report
    pub repository_path: Option<String>,
}

/// Build the report for the platform's repository.
///
/// Freeze detection, CI aggregation and the candidate search must succeed.
/// Failures for individual PRs are collected into `Report::failures`.
pub async fn build_report(
    platform: &dyn PlatformService,
    config: &Config,
    repository_path: Option<String>,
    now: DateTime<Utc>,
    progress: &dyn EvaluationProgress,
) -> Result<Report> {
    let freeze = detect_feature_freeze(platform).await?;

    let ci = aggregate_ci_status(platform, &config.ci, now).await?;
    info!(summary = %ci.summary(), "CI status");

    let query = search_query(platform.config());
    let candidates = platform.search_open_prs(&query).await?;

    let filter = CandidateFilter {
        ignore_milestones: &config.report.ignore_milestones,
        ignore_labels: &config.report.ignore_labels,
        freeze: &freeze,
    };
    let selected: Vec<u64> = candidates
        .iter()
        .filter(|candidate| match filter.check(candidate) {
            Some(reason) => {
                info!(pr_number = candidate.number, %reason, "ignoring");
                false
            }
            None => true,
        })
        .map(|candidate| candidate.number)
        .collect();

    progress.on_start(selected.len());
    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for number in selected {
        progress.on_pr(number);
        match evaluate_candidate(platform, number, config, now).await {
            Ok(Some(evaluation)) => entries.push(evaluation),
            Ok(None) => {}
            Err(e) => {
                warn!(pr_number = number, error = %e, "evaluation failed");
                failures.push(PrFailure {
                    number,
                    message: e.to_string(),
                });
            }
        }
    }
    progress.on_finish();

    rank_evaluations(&mut entries);

    Ok(Report {
        generated_at: now,
        entries,
        failures,
        ci,
        freeze,
        ignored_milestones: config.report.ignore_milestones.clone(),
        ignored_labels: config.report.ignore_labels.clone(),
        repository_path,
    })
}

/// Fetch and evaluate one candidate; `None` when its base branch is skipped
async fn evaluate_candidate(
    platform: &dyn PlatformService,
    number: u64,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Option<PrEvaluation>> {
    info!(pr_number = number, "fetch");
    let snapshot = platform.get_pull_request(number).await?;

    if !is_target_branch(&snapshot.base_ref, &config.ci.main_branch) {
        let reason = SkipReason::BaseBranch(snapshot.base_ref.clone());
        info!(pr_number = number, %reason, "ignoring");
        return Ok(None);
    }

    evaluate_pull_request(platform, snapshot, config, now)
        .await
        .map(Some)
}
