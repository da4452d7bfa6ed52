//! Platform service for GitHub
//!
//! Read-only view of the repository that the evaluation engine consumes.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CommitInfo, IssueEvent, JobProgress, PlatformConfig, PrCandidate, PullRequestSnapshot,
    RateLimit, ReviewRecord, RunFilter, WorkflowRunSummary,
};
use async_trait::async_trait;

/// Platform service trait for the read-only fetches a run needs
///
/// One handle is created per run and passed into every component; nothing
/// is shared through globals. Test code provides its own implementation.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Search open PRs matching a search query
    async fn search_open_prs(&self, query: &str) -> Result<Vec<PrCandidate>>;

    /// Fetch a PR snapshot
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestSnapshot>;

    /// Fetch a PR snapshot again to pick up lazily computed merge state.
    ///
    /// Defaults to a second [`get_pull_request`] call, which is what makes
    /// GitHub report a fresh `mergeable`/`rebaseable` value.
    ///
    /// [`get_pull_request`]: Self::get_pull_request
    async fn refresh_pull_request(&self, number: u64) -> Result<PullRequestSnapshot> {
        self.get_pull_request(number).await
    }

    /// List reviews on a PR, oldest first
    async fn list_reviews(&self, number: u64) -> Result<Vec<ReviewRecord>>;

    /// List issue timeline events on a PR, oldest first
    async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>>;

    /// List workflow runs for a commit, optionally narrowed by branch and event
    async fn list_workflow_runs(&self, filter: &RunFilter) -> Result<Vec<WorkflowRunSummary>>;

    /// Count completed and total jobs of a workflow run
    async fn get_job_progress(&self, run_id: u64) -> Result<JobProgress>;

    /// List all tag names
    async fn list_tags(&self) -> Result<Vec<String>>;

    /// Get the head commit of a branch
    async fn get_branch_head(&self, branch: &str) -> Result<CommitInfo>;

    /// Get a commit and its parents
    async fn get_commit(&self, sha: &str) -> Result<CommitInfo>;

    /// Current API rate limit
    async fn rate_limit(&self) -> Result<RateLimit>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
