//! Core types for merge-list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Issue event kind marking a draft PR as ready for review
pub const READY_FOR_REVIEW: &str = "ready_for_review";

/// A boolean the upstream system may not have computed yet
///
/// GitHub computes `mergeable`/`rebaseable` lazily, so a freshly created or
/// updated PR reports neither value until a background job finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    /// Computed and true
    True,
    /// Computed and false
    False,
    /// Not computed yet
    Unknown,
}

impl TriState {
    /// Whether the value has not been computed yet
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether this value does not definitively block a merge
    pub const fn permits(self) -> bool {
        !matches!(self, Self::False)
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::True,
            Some(false) => Self::False,
            None => Self::Unknown,
        }
    }
}

impl std::fmt::Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "yes"),
            Self::False => write!(f, "no"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Read-only view of one pull request at evaluation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Login of the PR author
    pub author: String,
    /// Logins of the assignees
    pub assignees: BTreeSet<String>,
    /// Label names
    pub labels: BTreeSet<String>,
    /// Base branch name
    pub base_ref: String,
    /// Milestone title, if any
    pub milestone: Option<String>,
    /// Whether the PR merges cleanly
    pub mergeable: TriState,
    /// Whether the PR can be rebased onto its base
    pub rebaseable: TriState,
    /// When the PR was opened
    pub created_at: DateTime<Utc>,
    /// Head commit SHA
    pub head_sha: String,
}

impl PullRequestSnapshot {
    /// Whether either merge tri-state still needs computing upstream
    pub const fn needs_refresh(&self) -> bool {
        self.mergeable.is_unknown() || self.rebaseable.is_unknown()
    }
}

/// Review state as far as approval tracking is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Reviewer approved
    Approved,
    /// A previous review was dismissed
    Dismissed,
    /// Reviewer requested changes
    ChangesRequested,
    /// Comment-only, pending, or anything else
    Other,
}

/// One review event on a PR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Reviewer login
    pub reviewer: String,
    /// Review state
    pub state: ReviewState,
    /// When the review was submitted (absent for pending reviews)
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A timeline event on the PR's issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueEvent {
    /// Event kind, e.g. `ready_for_review`
    pub kind: String,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}

impl IssueEvent {
    /// Whether this event marks the PR as ready for review
    pub fn is_ready_for_review(&self) -> bool {
        self.kind == READY_FOR_REVIEW
    }
}

/// Workflow run status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Finished; see the conclusion
    Completed,
    /// Currently executing
    InProgress,
    /// Waiting for a runner
    Queued,
    /// Waiting on an environment protection rule
    Waiting,
    /// Pending concurrency group
    Pending,
    /// Anything else GitHub may report
    Other(String),
}

impl RunStatus {
    /// Parse a status string from the GitHub API
    pub fn parse(value: &str) -> Self {
        match value {
            "completed" => Self::Completed,
            "in_progress" => Self::InProgress,
            "queued" => Self::Queued,
            "waiting" => Self::Waiting,
            "pending" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the run has not finished yet
    pub const fn is_running(&self) -> bool {
        matches!(
            self,
            Self::InProgress | Self::Queued | Self::Waiting | Self::Pending
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Queued => write!(f, "queued"),
            Self::Waiting => write!(f, "waiting"),
            Self::Pending => write!(f, "pending"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Conclusion of a completed workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunConclusion {
    /// All jobs passed
    Success,
    /// At least one job failed
    Failure,
    /// Run was cancelled
    Cancelled,
    /// skipped, neutral, timed_out, ...
    Other(String),
}

impl RunConclusion {
    /// Parse a conclusion string from the GitHub API
    pub fn parse(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RunConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One GitHub Actions workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunSummary {
    /// Run ID
    pub id: u64,
    /// Workflow run name
    pub name: String,
    /// Web URL for the run
    pub html_url: String,
    /// Run status
    pub status: RunStatus,
    /// Conclusion, only present once completed
    pub conclusion: Option<RunConclusion>,
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,
    /// Commit the run was triggered for
    pub head_sha: String,
}

/// Job completion counts for an in-flight run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    /// Jobs with status `completed`
    pub completed: usize,
    /// All jobs of the run
    pub total: usize,
}

/// Filter for listing workflow runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    /// Only runs for this branch
    pub branch: Option<String>,
    /// Only runs triggered by this event (e.g. `push`)
    pub event: Option<String>,
    /// Only runs for this commit
    pub head_sha: String,
}

impl RunFilter {
    /// Runs of any branch and event for a commit
    pub fn for_commit(head_sha: &str) -> Self {
        Self {
            head_sha: head_sha.to_string(),
            ..Self::default()
        }
    }
}

/// A commit with its parent chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit SHA
    pub sha: String,
    /// Parent SHAs, first parent first
    pub parents: Vec<String>,
}

impl CommitInfo {
    /// First parent, if this is not a root commit
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

/// An open PR returned by the candidate search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrCandidate {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Milestone title, if any
    pub milestone: Option<String>,
    /// Label names
    pub labels: Vec<String>,
}

/// API rate limit snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// When the window resets
    pub reset: DateTime<Utc>,
}

/// Repository coordinates the platform service talks to
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Per-PR merge-eligibility verdict
///
/// Built fresh on every run and consumed by the report renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct EligibilityVerdict {
    /// An assignee approved (or no assignee approval is needed)
    pub assignee_approved: bool,
    /// The mandatory wait time has elapsed
    pub time_satisfied: bool,
    /// Hours still to wait; zero or negative when satisfied
    pub remaining_hours: i64,
    /// Mergeable tri-state after at most one refresh
    pub mergeable: TriState,
    /// Rebaseable tri-state after at most one refresh
    pub rebaseable: TriState,
    /// Carries the hotfix label
    pub hotfix: bool,
    /// Carries the trivial label
    pub trivial: bool,
    /// Carries a do-not-merge label
    pub do_not_merge: bool,
    /// Age in days of the test-suite run, when it is stale
    pub ci_age_days: Option<i64>,
    /// Test-suite run is recent enough (or the PR is too young to check)
    pub ci_recent: bool,
    /// Current approvers, sorted
    pub approvers: Vec<String>,
    /// Wall-clock hours since the reference time
    pub elapsed_hours: i64,
    /// Business hours since the reference time
    pub elapsed_business_hours: i64,
}

impl EligibilityVerdict {
    /// Assignee-approved and past the wait time; drives ranking
    pub const fn is_fully_eligible(&self) -> bool {
        self.assignee_approved && self.time_satisfied
    }

    /// Fully eligible and not known to need a rebase; drives row highlighting
    pub const fn is_ready(&self) -> bool {
        self.is_fully_eligible() && self.rebaseable.permits()
    }
}
