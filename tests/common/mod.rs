//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_platform;

pub use mock_platform::MockPlatformService;

use chrono::{DateTime, Duration, TimeZone, Utc};
use merge_list::eligibility::PrEvaluation;
use merge_list::types::{
    CommitInfo, EligibilityVerdict, IssueEvent, PlatformConfig, PrCandidate,
    PullRequestSnapshot, ReviewRecord, ReviewState, RunConclusion, RunStatus, TriState,
    WorkflowRunSummary,
};
use std::collections::BTreeSet;

/// Name of the test-suite run in the default config
pub const TEST_RUN: &str = "Run tests with twister";

/// Platform config for a GitHub repo
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Fixed "now": Wednesday 2024-03-13 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap()
}

/// UTC timestamp helper
pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Open PR against main with no assignees, labels or reviews
pub fn make_snapshot(number: u64, author: &str, created_at: DateTime<Utc>) -> PullRequestSnapshot {
    PullRequestSnapshot {
        number,
        title: format!("PR {number}"),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        author: author.to_string(),
        assignees: BTreeSet::new(),
        labels: BTreeSet::new(),
        base_ref: "main".to_string(),
        milestone: None,
        mergeable: TriState::True,
        rebaseable: TriState::True,
        created_at,
        head_sha: format!("head{number}"),
    }
}

/// Same as `make_snapshot`, opened `age` before `now()`
pub fn make_snapshot_aged(number: u64, age: Duration) -> PullRequestSnapshot {
    make_snapshot(number, "author", now() - age)
}

/// Add assignees to a snapshot
pub fn with_assignees(mut pr: PullRequestSnapshot, assignees: &[&str]) -> PullRequestSnapshot {
    pr.assignees = assignees.iter().map(ToString::to_string).collect();
    pr
}

/// Add labels to a snapshot
pub fn with_labels(mut pr: PullRequestSnapshot, labels: &[&str]) -> PullRequestSnapshot {
    pr.labels = labels.iter().map(ToString::to_string).collect();
    pr
}

/// Review record
pub fn review(reviewer: &str, state: ReviewState, submitted_at: DateTime<Utc>) -> ReviewRecord {
    ReviewRecord {
        reviewer: reviewer.to_string(),
        state,
        submitted_at: Some(submitted_at),
    }
}

/// `ready_for_review` issue event
pub fn ready_event(created_at: DateTime<Utc>) -> IssueEvent {
    IssueEvent {
        kind: "ready_for_review".to_string(),
        created_at,
    }
}

/// Completed workflow run
pub fn completed_run(id: u64, name: &str, conclusion: &str, sha: &str) -> WorkflowRunSummary {
    WorkflowRunSummary {
        id,
        name: name.to_string(),
        html_url: format!("https://github.com/test/repo/actions/runs/{id}"),
        status: RunStatus::Completed,
        conclusion: Some(RunConclusion::parse(conclusion)),
        started_at: Some(now() - Duration::hours(1)),
        head_sha: sha.to_string(),
    }
}

/// Workflow run that has not finished
pub fn running_run(id: u64, name: &str, status: &str, sha: &str) -> WorkflowRunSummary {
    WorkflowRunSummary {
        id,
        name: name.to_string(),
        html_url: format!("https://github.com/test/repo/actions/runs/{id}"),
        status: RunStatus::parse(status),
        conclusion: None,
        started_at: Some(now() - Duration::minutes(12)),
        head_sha: sha.to_string(),
    }
}

/// Commit with an optional first parent
pub fn commit(sha: &str, parent: Option<&str>) -> CommitInfo {
    CommitInfo {
        sha: sha.to_string(),
        parents: parent.into_iter().map(ToString::to_string).collect(),
    }
}

/// Search result
pub fn candidate(number: u64, milestone: Option<&str>, labels: &[&str]) -> PrCandidate {
    PrCandidate {
        number,
        title: format!("PR {number}"),
        milestone: milestone.map(ToString::to_string),
        labels: labels.iter().map(ToString::to_string).collect(),
    }
}

/// Verdict that is fully eligible or not
pub fn make_verdict(eligible: bool) -> EligibilityVerdict {
    EligibilityVerdict {
        assignee_approved: true,
        time_satisfied: eligible,
        remaining_hours: if eligible { 0 } else { 10 },
        mergeable: TriState::True,
        rebaseable: TriState::True,
        hotfix: false,
        trivial: false,
        do_not_merge: false,
        ci_age_days: None,
        ci_recent: true,
        approvers: Vec::new(),
        elapsed_hours: 0,
        elapsed_business_hours: 0,
    }
}

/// Evaluation for ranking tests
pub fn make_evaluation(number: u64, eligible: bool) -> PrEvaluation {
    PrEvaluation {
        snapshot: make_snapshot(number, "author", now()),
        verdict: make_verdict(eligible),
    }
}
