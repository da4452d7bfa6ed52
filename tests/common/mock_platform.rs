//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use merge_list::error::{Error, Result};
use merge_list::platform::PlatformService;
use merge_list::types::{
    CommitInfo, IssueEvent, JobProgress, PlatformConfig, PrCandidate, PullRequestSnapshot,
    RateLimit, ReviewRecord, RunFilter, WorkflowRunSummary,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Simple mock platform service for testing
///
/// Features:
/// - Canned responses per PR number / commit SHA
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    candidates: Mutex<Vec<PrCandidate>>,
    prs: Mutex<HashMap<u64, PullRequestSnapshot>>,
    refreshed_prs: Mutex<HashMap<u64, PullRequestSnapshot>>,
    reviews: Mutex<HashMap<u64, Vec<ReviewRecord>>>,
    events: Mutex<HashMap<u64, Vec<IssueEvent>>>,
    runs: Mutex<HashMap<String, Vec<WorkflowRunSummary>>>,
    job_progress: Mutex<HashMap<u64, JobProgress>>,
    tags: Mutex<Vec<String>>,
    branch_heads: Mutex<HashMap<String, CommitInfo>>,
    commits: Mutex<HashMap<String, CommitInfo>>,
    // Call tracking
    search_calls: Mutex<Vec<String>>,
    get_pr_calls: Mutex<Vec<u64>>,
    refresh_calls: Mutex<Vec<u64>>,
    list_runs_calls: Mutex<Vec<RunFilter>>,
    get_commit_calls: Mutex<Vec<String>>,
    job_progress_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_get_pr: Mutex<HashSet<u64>>,
    error_on_reviews: Mutex<HashSet<u64>>,
    error_on_runs: Mutex<HashSet<String>>,
    error_on_tags: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            candidates: Mutex::new(Vec::new()),
            prs: Mutex::new(HashMap::new()),
            refreshed_prs: Mutex::new(HashMap::new()),
            reviews: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
            runs: Mutex::new(HashMap::new()),
            job_progress: Mutex::new(HashMap::new()),
            tags: Mutex::new(Vec::new()),
            branch_heads: Mutex::new(HashMap::new()),
            commits: Mutex::new(HashMap::new()),
            search_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            refresh_calls: Mutex::new(Vec::new()),
            list_runs_calls: Mutex::new(Vec::new()),
            get_commit_calls: Mutex::new(Vec::new()),
            job_progress_calls: Mutex::new(Vec::new()),
            error_on_get_pr: Mutex::new(HashSet::new()),
            error_on_reviews: Mutex::new(HashSet::new()),
            error_on_runs: Mutex::new(HashSet::new()),
            error_on_tags: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Set the candidate search results
    pub fn set_candidates(&self, candidates: Vec<PrCandidate>) {
        *self.candidates.lock().unwrap() = candidates;
    }

    /// Set the snapshot returned by `get_pull_request`
    pub fn set_pr(&self, pr: PullRequestSnapshot) {
        self.prs.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the snapshot returned by `refresh_pull_request`
    pub fn set_refreshed_pr(&self, pr: PullRequestSnapshot) {
        self.refreshed_prs.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the reviews of a PR
    pub fn set_reviews(&self, number: u64, reviews: Vec<ReviewRecord>) {
        self.reviews.lock().unwrap().insert(number, reviews);
    }

    /// Set the issue events of a PR
    pub fn set_events(&self, number: u64, events: Vec<IssueEvent>) {
        self.events.lock().unwrap().insert(number, events);
    }

    /// Set the workflow runs of a commit
    pub fn set_runs(&self, sha: &str, runs: Vec<WorkflowRunSummary>) {
        self.runs.lock().unwrap().insert(sha.to_string(), runs);
    }

    /// Set the job progress of a run
    pub fn set_job_progress(&self, run_id: u64, progress: JobProgress) {
        self.job_progress.lock().unwrap().insert(run_id, progress);
    }

    /// Set the tag list
    pub fn set_tags(&self, tags: &[&str]) {
        *self.tags.lock().unwrap() = tags.iter().map(ToString::to_string).collect();
    }

    /// Set a branch head
    pub fn set_branch_head(&self, branch: &str, commit: CommitInfo) {
        self.branch_heads
            .lock()
            .unwrap()
            .insert(branch.to_string(), commit);
    }

    /// Register commits for `get_commit`
    pub fn add_commits(&self, commits: Vec<CommitInfo>) {
        let mut map = self.commits.lock().unwrap();
        for commit in commits {
            map.insert(commit.sha.clone(), commit);
        }
    }

    // === Error injection methods ===

    /// Make `get_pull_request` fail for a PR
    pub fn fail_get_pr(&self, number: u64) {
        self.error_on_get_pr.lock().unwrap().insert(number);
    }

    /// Make `list_reviews` fail for a PR
    pub fn fail_reviews(&self, number: u64) {
        self.error_on_reviews.lock().unwrap().insert(number);
    }

    /// Make `list_workflow_runs` fail for a commit
    pub fn fail_runs(&self, sha: &str) {
        self.error_on_runs.lock().unwrap().insert(sha.to_string());
    }

    /// Make `list_tags` fail
    pub fn fail_tags(&self, msg: &str) {
        *self.error_on_tags.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// All queries passed to `search_open_prs`
    pub fn get_search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// All PR numbers passed to `get_pull_request`
    pub fn get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// All PR numbers passed to `refresh_pull_request`
    pub fn get_refresh_calls(&self) -> Vec<u64> {
        self.refresh_calls.lock().unwrap().clone()
    }

    /// All filters passed to `list_workflow_runs`
    pub fn get_list_runs_calls(&self) -> Vec<RunFilter> {
        self.list_runs_calls.lock().unwrap().clone()
    }

    /// All SHAs passed to `get_commit`
    pub fn get_commit_calls(&self) -> Vec<String> {
        self.get_commit_calls.lock().unwrap().clone()
    }

    /// All run IDs passed to `get_job_progress`
    pub fn get_job_progress_calls(&self) -> Vec<u64> {
        self.job_progress_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn search_open_prs(&self, query: &str) -> Result<Vec<PrCandidate>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        Ok(self.candidates.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestSnapshot> {
        self.get_pr_calls.lock().unwrap().push(number);

        if self.error_on_get_pr.lock().unwrap().contains(&number) {
            return Err(Error::Platform(format!("get_pull_request failed for #{number}")));
        }

        self.prs
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no PR configured for #{number}")))
    }

    async fn refresh_pull_request(&self, number: u64) -> Result<PullRequestSnapshot> {
        self.refresh_calls.lock().unwrap().push(number);

        if let Some(pr) = self.refreshed_prs.lock().unwrap().get(&number) {
            return Ok(pr.clone());
        }
        self.prs
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no PR configured for #{number}")))
    }

    async fn list_reviews(&self, number: u64) -> Result<Vec<ReviewRecord>> {
        if self.error_on_reviews.lock().unwrap().contains(&number) {
            return Err(Error::Platform(format!("list_reviews failed for #{number}")));
        }
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_workflow_runs(&self, filter: &RunFilter) -> Result<Vec<WorkflowRunSummary>> {
        self.list_runs_calls.lock().unwrap().push(filter.clone());

        if self.error_on_runs.lock().unwrap().contains(&filter.head_sha) {
            return Err(Error::Platform(format!(
                "list_workflow_runs failed for {}",
                filter.head_sha
            )));
        }
        Ok(self
            .runs
            .lock()
            .unwrap()
            .get(&filter.head_sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_job_progress(&self, run_id: u64) -> Result<JobProgress> {
        self.job_progress_calls.lock().unwrap().push(run_id);
        self.job_progress
            .lock()
            .unwrap()
            .get(&run_id)
            .copied()
            .ok_or_else(|| Error::Platform(format!("no jobs configured for run {run_id}")))
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        if let Some(msg) = self.error_on_tags.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.tags.lock().unwrap().clone())
    }

    async fn get_branch_head(&self, branch: &str) -> Result<CommitInfo> {
        self.branch_heads
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no head configured for {branch}")))
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
        self.get_commit_calls.lock().unwrap().push(sha.to_string());
        self.commits
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no commit configured for {sha}")))
    }

    async fn rate_limit(&self) -> Result<RateLimit> {
        Ok(RateLimit {
            limit: 5000,
            remaining: 5000,
            reset: Utc::now(),
        })
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
