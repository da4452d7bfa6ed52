//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CommitInfo, IssueEvent, JobProgress, PlatformConfig, PrCandidate, PullRequestSnapshot,
    RateLimit, ReviewRecord, ReviewState, RunConclusion, RunFilter, RunStatus,
    WorkflowRunSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Page size for list endpoints
const PER_PAGE: usize = 100;

/// Upper bound on pages fetched from one raw list endpoint
const MAX_PAGES: usize = 50;

// REST response types for endpoints fetched with raw requests

#[derive(Deserialize)]
struct WorkflowRunsResponse {
    workflow_runs: Vec<RawWorkflowRun>,
}

#[derive(Deserialize)]
struct RawWorkflowRun {
    id: u64,
    name: Option<String>,
    html_url: String,
    status: Option<String>,
    conclusion: Option<String>,
    run_started_at: Option<DateTime<Utc>>,
    head_sha: String,
}

impl From<RawWorkflowRun> for WorkflowRunSummary {
    fn from(run: RawWorkflowRun) -> Self {
        Self {
            id: run.id,
            name: run.name.unwrap_or_default(),
            html_url: run.html_url,
            status: RunStatus::parse(run.status.as_deref().unwrap_or_default()),
            conclusion: run.conclusion.as_deref().map(RunConclusion::parse),
            started_at: run.run_started_at,
            head_sha: run.head_sha,
        }
    }
}

#[derive(Deserialize)]
struct JobsResponse {
    jobs: Vec<RawJob>,
}

#[derive(Deserialize)]
struct RawJob {
    status: String,
}

#[derive(Deserialize)]
struct RawIssueEvent {
    event: String,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
    #[serde(default)]
    parents: Vec<RawParent>,
}

#[derive(Deserialize)]
struct RawParent {
    sha: String,
}

impl From<RawCommit> for CommitInfo {
    fn from(commit: RawCommit) -> Self {
        Self {
            sha: commit.sha,
            parents: commit.parents.into_iter().map(|p| p.sha).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawBranch {
    commit: RawCommit,
}

#[derive(Deserialize)]
struct RateLimitResponse {
    rate: RawRate,
}

#[derive(Deserialize)]
struct RawRate {
    limit: u64,
    remaining: u64,
    reset: i64,
}

/// GitHub service using octocrab, with raw requests for the Actions and
/// timeline endpoints
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API root, always ending in `/`
    api_base: Url,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = host.as_ref().map_or_else(
            || "https://api.github.com/".to_string(),
            |h| format!("https://{h}/api/v3/"),
        );
        Self::with_api_base(
            token,
            PlatformConfig { owner, repo, host },
            &api_base,
        )
    }

    /// Create a service talking to an explicit API root
    pub fn with_api_base(token: &str, config: PlatformConfig, api_base: &str) -> Result<Self> {
        let mut api_base =
            Url::parse(api_base).map_err(|e| Error::GitHubApi(format!("invalid API URL: {e}")))?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("merge-list")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Build an endpoint URL under `repos/{owner}/{repo}/`
    fn repo_url(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(&format!(
                "repos/{}/{}/{path}",
                self.config.owner, self.config.repo
            ))
            .map_err(|e| Error::GitHubApi(format!("invalid endpoint {path}: {e}")))
    }

    /// GET a JSON document
    async fn get_json<T: DeserializeOwned>(&self, mut url: Url, query: &[(&str, String)]) -> Result<T> {
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        debug!(%url, "GET");
        let response = self
            .http_client
            .get(url.clone())
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {}: {e}", url.path())))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "{} returned {}",
                url.path(),
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {}: {e}", url.path())))
    }

    /// GET every page of a list endpoint
    async fn get_pages<R, T, F>(&self, url: &Url, query: &[(&str, String)], items: F) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
        F: Fn(R) -> Vec<T>,
    {
        let mut all = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut paged_query = query.to_vec();
            paged_query.push(("per_page", PER_PAGE.to_string()));
            paged_query.push(("page", page.to_string()));

            let batch = items(self.get_json(url.clone(), &paged_query).await?);
            let done = batch.len() < PER_PAGE;
            all.extend(batch);
            if done {
                break;
            }
        }

        Ok(all)
    }
}

/// Convert an octocrab PR into our snapshot type
fn snapshot_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> Result<PullRequestSnapshot> {
    let created_at = pr
        .created_at
        .ok_or_else(|| Error::GitHubApi(format!("PR #{} missing created_at", pr.number)))?;

    Ok(PullRequestSnapshot {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
        assignees: pr
            .assignees
            .iter()
            .flatten()
            .map(|a| a.login.clone())
            .collect(),
        labels: pr
            .labels
            .iter()
            .flatten()
            .map(|l| l.name.clone())
            .collect(),
        base_ref: pr.base.ref_field.clone(),
        milestone: pr.milestone.as_ref().map(|m| m.title.clone()),
        mergeable: pr.mergeable.into(),
        rebaseable: pr.rebaseable.into(),
        created_at,
        head_sha: pr.head.sha.clone(),
    })
}

/// Map an octocrab review state to the states approval tracking cares about
fn review_state(state: Option<&octocrab::models::pulls::ReviewState>) -> ReviewState {
    use octocrab::models::pulls::ReviewState as Gh;
    match state {
        Some(Gh::Approved) => ReviewState::Approved,
        Some(Gh::Dismissed) => ReviewState::Dismissed,
        Some(Gh::ChangesRequested) => ReviewState::ChangesRequested,
        // ReviewState is non-exhaustive
        Some(_) | None => ReviewState::Other,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn search_open_prs(&self, query: &str) -> Result<Vec<PrCandidate>> {
        debug!(query, "searching PRs");
        let page = self
            .client
            .search()
            .issues_and_pull_requests(query)
            .per_page(100)
            .send()
            .await?;
        let issues = self.client.all_pages(page).await?;

        let result: Vec<PrCandidate> = issues
            .into_iter()
            .map(|issue| PrCandidate {
                number: issue.number,
                title: issue.title,
                milestone: issue.milestone.map(|m| m.title),
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
            })
            .collect();
        debug!(count = result.len(), "search complete");
        Ok(result)
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestSnapshot> {
        debug!(pr_number = number, "fetching PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await?;
        snapshot_from_octocrab(&pr)
    }

    async fn list_reviews(&self, number: u64) -> Result<Vec<ReviewRecord>> {
        debug!(pr_number = number, "listing reviews");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(number)
            .per_page(100)
            .send()
            .await?;
        let reviews = self.client.all_pages(page).await?;

        // Reviews from deleted accounts have no user and cannot be assignees
        let result: Vec<ReviewRecord> = reviews
            .into_iter()
            .filter_map(|r| {
                let user = r.user?;
                Some(ReviewRecord {
                    reviewer: user.login,
                    state: review_state(r.state.as_ref()),
                    submitted_at: r.submitted_at,
                })
            })
            .collect();
        debug!(pr_number = number, count = result.len(), "listed reviews");
        Ok(result)
    }

    async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        debug!(pr_number = number, "listing issue events");
        let url = self.repo_url(&format!("issues/{number}/events"))?;
        let events = self
            .get_pages(&url, &[], |page: Vec<RawIssueEvent>| page)
            .await?;

        Ok(events
            .into_iter()
            .map(|e| IssueEvent {
                kind: e.event,
                created_at: e.created_at,
            })
            .collect())
    }

    async fn list_workflow_runs(&self, filter: &RunFilter) -> Result<Vec<WorkflowRunSummary>> {
        debug!(head_sha = %filter.head_sha, branch = ?filter.branch, event = ?filter.event, "listing workflow runs");
        let url = self.repo_url("actions/runs")?;

        let mut query = vec![("head_sha", filter.head_sha.clone())];
        if let Some(ref branch) = filter.branch {
            query.push(("branch", branch.clone()));
        }
        if let Some(ref event) = filter.event {
            query.push(("event", event.clone()));
        }

        let runs = self
            .get_pages(&url, &query, |page: WorkflowRunsResponse| page.workflow_runs)
            .await?;
        debug!(count = runs.len(), "listed workflow runs");
        Ok(runs.into_iter().map(Into::into).collect())
    }

    async fn get_job_progress(&self, run_id: u64) -> Result<JobProgress> {
        let url = self.repo_url(&format!("actions/runs/{run_id}/jobs"))?;
        let jobs = self
            .get_pages(&url, &[], |page: JobsResponse| page.jobs)
            .await?;

        Ok(JobProgress {
            completed: jobs.iter().filter(|j| j.status == "completed").count(),
            total: jobs.len(),
        })
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        debug!("listing tags");
        let page = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .list_tags()
            .per_page(100)
            .send()
            .await?;
        let tags = self.client.all_pages(page).await?;
        debug!(count = tags.len(), "listed tags");
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    async fn get_branch_head(&self, branch: &str) -> Result<CommitInfo> {
        let url = self.repo_url(&format!("branches/{branch}"))?;
        let branch: RawBranch = self.get_json(url, &[]).await?;
        Ok(branch.commit.into())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
        let url = self.repo_url(&format!("commits/{sha}"))?;
        let commit: RawCommit = self.get_json(url, &[]).await?;
        Ok(commit.into())
    }

    async fn rate_limit(&self) -> Result<RateLimit> {
        let url = self
            .api_base
            .join("rate_limit")
            .map_err(|e| Error::GitHubApi(format!("invalid endpoint rate_limit: {e}")))?;
        let response: RateLimitResponse = self.get_json(url, &[]).await?;

        Ok(RateLimit {
            limit: response.rate.limit,
            remaining: response.rate.remaining,
            reset: DateTime::from_timestamp(response.rate.reset, 0).unwrap_or_default(),
        })
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
