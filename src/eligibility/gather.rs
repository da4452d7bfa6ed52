//! Per-PR gathering - effectful
//!
//! Fetches everything one PR's evaluation needs, then hands off to the pure
//! evaluator. Failures are per PR and never abort the other evaluations.

use crate::ci::check_ci_freshness;
use crate::config::Config;
use crate::eligibility::evaluate::{EvaluationInput, evaluate};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{EligibilityVerdict, PullRequestSnapshot};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// A PR together with its verdict
#[derive(Debug, Clone)]
pub struct PrEvaluation {
    /// PR snapshot, with refreshed merge tri-states
    pub snapshot: PullRequestSnapshot,
    /// Evaluation result
    pub verdict: EligibilityVerdict,
}

/// A PR whose evaluation could not be completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrFailure {
    /// PR number
    pub number: u64,
    /// What went wrong
    pub message: String,
}

impl std::fmt::Display for PrFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PR #{}: {}", self.number, self.message)
    }
}

/// Re-fetch the PR once if a merge tri-state is still unknown.
///
/// A value that is still unknown after the refresh is kept as is.
pub async fn refresh_merge_state(
    platform: &dyn PlatformService,
    mut snapshot: PullRequestSnapshot,
) -> Result<PullRequestSnapshot> {
    if !snapshot.needs_refresh() {
        return Ok(snapshot);
    }

    info!(pr_number = snapshot.number, "re-fetch");
    let refreshed = platform.refresh_pull_request(snapshot.number).await?;
    snapshot.mergeable = refreshed.mergeable;
    snapshot.rebaseable = refreshed.rebaseable;
    Ok(snapshot)
}

/// Gather data for one PR and evaluate it
pub async fn evaluate_pull_request(
    platform: &dyn PlatformService,
    snapshot: PullRequestSnapshot,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<PrEvaluation> {
    debug!(pr_number = snapshot.number, "process");

    let snapshot = refresh_merge_state(platform, snapshot).await?;
    let reviews = platform.list_reviews(snapshot.number).await?;
    let events = platform.list_issue_events(snapshot.number).await?;
    let ci = check_ci_freshness(platform, &snapshot, &config.ci, now).await;

    let verdict = evaluate(
        &EvaluationInput {
            snapshot: &snapshot,
            reviews: &reviews,
            events: &events,
            ci,
        },
        now,
        &config.policy,
    );

    debug!(
        pr_number = snapshot.number,
        assignee_approved = verdict.assignee_approved,
        remaining_hours = verdict.remaining_hours,
        rebaseable = %verdict.rebaseable,
        "evaluated"
    );
    Ok(PrEvaluation { snapshot, verdict })
}
