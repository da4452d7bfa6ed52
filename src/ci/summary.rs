//! CI run classification and summary - pure functions

use crate::types::{JobProgress, RunConclusion, RunStatus, WorkflowRunSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker used when no run survives classification
pub const NO_DATA: &str = "no data";

/// Reported state of one workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// Completed successfully
    Pass,
    /// Completed with a failure
    Fail,
    /// Completed by cancellation
    Cancelled,
    /// Not finished yet
    Running,
}

/// What to do with one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunClass {
    /// Report with a terminal outcome
    Terminal(RunOutcome),
    /// Report as running; needs job progress
    Running,
    /// Completed with a conclusion we do not report
    IgnoredConclusion(String),
    /// Status we do not report
    IgnoredStatus(String),
}

/// Classify a workflow run by status and conclusion
pub fn classify_run(run: &WorkflowRunSummary) -> RunClass {
    match &run.status {
        RunStatus::Completed => match &run.conclusion {
            Some(RunConclusion::Success) => RunClass::Terminal(RunOutcome::Pass),
            Some(RunConclusion::Failure) => RunClass::Terminal(RunOutcome::Fail),
            Some(RunConclusion::Cancelled) => RunClass::Terminal(RunOutcome::Cancelled),
            Some(other) => RunClass::IgnoredConclusion(other.to_string()),
            None => RunClass::IgnoredConclusion("none".to_string()),
        },
        status if status.is_running() => RunClass::Running,
        other => RunClass::IgnoredStatus(other.to_string()),
    }
}

/// Whether the named run is among `runs`
pub fn has_named_run(runs: &[WorkflowRunSummary], name: &str) -> bool {
    runs.iter().any(|r| r.name == name)
}

/// Whether any run with this name was cancelled
pub fn named_run_cancelled(runs: &[WorkflowRunSummary], name: &str) -> bool {
    runs.iter()
        .any(|r| r.name == name && r.conclusion == Some(RunConclusion::Cancelled))
}

/// Progress details for a run that has not finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningDetail {
    /// Minutes since the run started
    pub elapsed_minutes: i64,
    /// Completed and total jobs
    pub jobs: JobProgress,
}

/// One reported run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiRunEntry {
    /// Workflow run name
    pub name: String,
    /// Web URL for the run
    pub html_url: String,
    /// Reported outcome
    pub outcome: RunOutcome,
    /// Set for running runs
    pub running: Option<RunningDetail>,
}

impl CiRunEntry {
    /// Entry for a completed run
    pub fn terminal(run: &WorkflowRunSummary, outcome: RunOutcome) -> Self {
        Self {
            name: run.name.clone(),
            html_url: run.html_url.clone(),
            outcome,
            running: None,
        }
    }

    /// Entry for a run still in flight
    pub fn running(run: &WorkflowRunSummary, jobs: JobProgress, now: DateTime<Utc>) -> Self {
        let elapsed_minutes = run
            .started_at
            .map_or(0, |started| (now - started).num_minutes());
        Self {
            name: run.name.clone(),
            html_url: run.html_url.clone(),
            outcome: RunOutcome::Running,
            running: Some(RunningDetail {
                elapsed_minutes,
                jobs,
            }),
        }
    }

    /// Display label, e.g. `Build ✓` or `Tests (? 3/10 12m)`
    pub fn label(&self) -> String {
        match (self.outcome, self.running) {
            (RunOutcome::Pass, _) => format!("{} ✓", self.name),
            (RunOutcome::Fail, _) => format!("{} ✗", self.name),
            (RunOutcome::Cancelled, _) => format!("{} cancelled", self.name),
            (RunOutcome::Running, Some(detail)) => format!(
                "{} (? {}/{} {}m)",
                self.name, detail.jobs.completed, detail.jobs.total, detail.elapsed_minutes
            ),
            (RunOutcome::Running, None) => format!("{} (?)", self.name),
        }
    }
}

/// Record in the machine-readable CI artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiRunRecord {
    /// Workflow run name
    pub name: String,
    /// Reported outcome
    pub status: RunOutcome,
}

/// The machine-readable CI artifact (`ci.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiRunsDocument {
    /// Reported runs in API order
    pub runs: Vec<CiRunRecord>,
}

/// Aggregated CI state of the main branch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiStatus {
    /// Commit whose runs were reported
    pub commit: String,
    /// Branch head the runs were substituted for, when walking back
    pub substituted_for: Option<String>,
    /// Reported runs in API order
    pub entries: Vec<CiRunEntry>,
}

impl CiStatus {
    /// Sorted, joined display summary, or [`NO_DATA`]
    pub fn summary(&self) -> String {
        if self.entries.is_empty() {
            return NO_DATA.to_string();
        }
        let mut labels: Vec<String> = self.entries.iter().map(CiRunEntry::label).collect();
        labels.sort();
        labels.join(" - ")
    }

    /// Structured `{name, status}` list
    pub fn document(&self) -> CiRunsDocument {
        CiRunsDocument {
            runs: self
                .entries
                .iter()
                .map(|e| CiRunRecord {
                    name: e.name.clone(),
                    status: e.outcome,
                })
                .collect(),
        }
    }
}
