//! Per-PR test-suite freshness

use crate::config::CiConfig;
use crate::platform::PlatformService;
use crate::types::{PullRequestSnapshot, RunFilter, WorkflowRunSummary};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// How fresh a PR's test-suite run is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CiFreshness {
    /// Age in days, set only when the run is stale
    pub age_days: Option<i64>,
    /// Run is recent, or the PR is too young to check
    pub recent: bool,
}

impl CiFreshness {
    /// Recent enough
    pub const fn recent() -> Self {
        Self {
            age_days: None,
            recent: true,
        }
    }

    /// Stale, with the run's age
    pub const fn stale(age_days: i64) -> Self {
        Self {
            age_days: Some(age_days),
            recent: false,
        }
    }

    /// No run to judge by
    pub const fn unknown() -> Self {
        Self {
            age_days: None,
            recent: false,
        }
    }
}

/// Whether a PR is young enough that its CI is not checked
pub fn skips_ci_check(created_at: DateTime<Utc>, now: DateTime<Utc>, config: &CiConfig) -> bool {
    now - created_at < config.max_age()
}

/// Judge freshness from the runs of a PR's head commit (PURE)
pub fn freshness_from_runs(
    created_at: DateTime<Utc>,
    runs: &[WorkflowRunSummary],
    now: DateTime<Utc>,
    config: &CiConfig,
) -> CiFreshness {
    if skips_ci_check(created_at, now, config) {
        return CiFreshness::recent();
    }

    let Some(run) = runs.iter().find(|r| r.name == config.test_run_name) else {
        return CiFreshness::unknown();
    };
    let Some(started_at) = run.started_at else {
        return CiFreshness::unknown();
    };

    let age = now - started_at;
    if age > config.max_age() {
        CiFreshness::stale(age.num_days())
    } else {
        CiFreshness::recent()
    }
}

/// Check the freshness of a PR's test-suite run.
///
/// Young PRs are not looked up. A failed lookup degrades to
/// [`CiFreshness::unknown`] instead of failing the PR.
pub async fn check_ci_freshness(
    platform: &dyn PlatformService,
    snapshot: &PullRequestSnapshot,
    config: &CiConfig,
    now: DateTime<Utc>,
) -> CiFreshness {
    if skips_ci_check(snapshot.created_at, now, config) {
        debug!(pr_number = snapshot.number, "ci age: skip");
        return CiFreshness::recent();
    }

    match platform
        .list_workflow_runs(&RunFilter::for_commit(&snapshot.head_sha))
        .await
    {
        Ok(runs) => {
            let freshness = freshness_from_runs(snapshot.created_at, &runs, now, config);
            debug!(pr_number = snapshot.number, ?freshness, "ci age");
            freshness
        }
        Err(e) => {
            warn!(pr_number = snapshot.number, error = %e, "failed to list runs for CI age");
            CiFreshness::unknown()
        }
    }
}
