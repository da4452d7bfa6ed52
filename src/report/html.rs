//! HTML report and CI artifact output

use crate::ci::{CiRunEntry, CiStatus, NO_DATA, RunOutcome};
use crate::config::ReportConfig;
use crate::eligibility::PrEvaluation;
use crate::error::{Error, Result};
use crate::report::assemble::Report;
use crate::types::TriState;
use askama::Template;
use std::fs;
use std::path::Path;
use tracing::info;

/// Status marker rendered as a styled symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// CSS class of the marker span
    pub class: &'static str,
    /// Symbol shown inside the span
    pub symbol: &'static str,
}

const PASS: Mark = Mark {
    class: "approved",
    symbol: "✓",
};
const FAIL: Mark = Mark {
    class: "blocked",
    symbol: "✕",
};
const CANCELLED: Mark = Mark {
    class: "unknown",
    symbol: "✕",
};
const UNKNOWN: Mark = Mark {
    class: "unknown",
    symbol: "?",
};

/// Report page fragments around the table rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    /// Everything before the rows
    pub pre: String,
    /// Everything after the rows
    pub post: String,
}

impl Templates {
    /// Read both templates
    pub fn load(config: &ReportConfig) -> Result<Self> {
        let read = |path: &Path| {
            fs::read_to_string(path)
                .map_err(|e| Error::Template(format!("failed to read {}: {e}", path.display())))
        };
        Ok(Self {
            pre: read(&config.template_pre)?,
            post: read(&config.template_post)?,
        })
    }
}

const fn tri_state_mark(value: TriState) -> Mark {
    match value {
        TriState::True => PASS,
        TriState::False => FAIL,
        TriState::Unknown => UNKNOWN,
    }
}

/// Tag badge on a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTag {
    /// Suffix of the `tag-*` CSS class
    pub class: &'static str,
    /// Badge text
    pub text: String,
}

/// One report table row
#[derive(Debug, Clone)]
pub struct PrRow {
    /// `draft` for rows that are not ready, empty otherwise
    pub row_class: &'static str,
    /// PR number
    pub number: u64,
    /// Web URL of the PR
    pub url: String,
    /// PR title
    pub title: String,
    /// Policy badges
    pub tags: Vec<RowTag>,
    /// PR author
    pub author: String,
    /// Comma separated assignees
    pub assignees: String,
    /// Comma separated current approvers
    pub approvers: String,
    /// Base branch
    pub base: String,
    /// Milestone title or empty
    pub milestone: String,
    /// Rebaseable marker
    pub rebaseable: Mark,
    /// Assignee approval marker
    pub assignee: Mark,
    /// Wait time marker
    pub time: Mark,
    /// Hours still to wait, when not satisfied
    pub remaining_hours: Option<i64>,
}

impl From<&PrEvaluation> for PrRow {
    fn from(evaluation: &PrEvaluation) -> Self {
        let pr = &evaluation.snapshot;
        let verdict = &evaluation.verdict;

        let mut tags = Vec::new();
        if verdict.hotfix {
            tags.push(RowTag {
                class: "hotfix",
                text: "hotfix".to_string(),
            });
        }
        if verdict.trivial {
            tags.push(RowTag {
                class: "trivial",
                text: "trivial".to_string(),
            });
        }
        if let Some(days) = verdict.ci_age_days {
            tags.push(RowTag {
                class: "oldci",
                text: format!("ci {days}d"),
            });
        }
        if verdict.do_not_merge {
            tags.push(RowTag {
                class: "dnm",
                text: "dnm".to_string(),
            });
        }

        Self {
            row_class: if verdict.is_ready() { "" } else { "draft" },
            number: pr.number,
            url: pr.html_url.clone(),
            title: pr.title.clone(),
            tags,
            author: pr.author.clone(),
            assignees: pr.assignees.iter().cloned().collect::<Vec<_>>().join(", "),
            approvers: verdict.approvers.join(", "),
            base: pr.base_ref.clone(),
            milestone: pr.milestone.clone().unwrap_or_default(),
            rebaseable: tri_state_mark(verdict.rebaseable),
            assignee: if verdict.assignee_approved { PASS } else { FAIL },
            time: if verdict.time_satisfied { PASS } else { FAIL },
            remaining_hours: (!verdict.time_satisfied).then_some(verdict.remaining_hours),
        }
    }
}

/// Table rows plus a comment listing the PRs that failed
#[derive(Template)]
#[template(path = "pr_rows.html")]
pub struct PrRowsView {
    /// Ranked rows
    pub rows: Vec<PrRow>,
    /// Processing errors, already safe inside an HTML comment
    pub failures: Vec<String>,
}

impl PrRowsView {
    /// View over a report's entries and failures
    pub fn new(report: &Report) -> Self {
        Self {
            rows: report.entries.iter().map(PrRow::from).collect(),
            // `--` may not appear inside an HTML comment
            failures: report
                .failures
                .iter()
                .map(|f| f.to_string().replace("--", "- -"))
                .collect(),
        }
    }
}

/// One run on the CI status line
#[derive(Debug, Clone)]
pub struct CiEntryView {
    /// Run name
    pub name: String,
    /// Web URL of the run
    pub url: String,
    /// Outcome marker
    pub mark: Mark,
    /// `completed/total elapsed` for running runs
    pub progress: Option<String>,
}

impl From<&CiRunEntry> for CiEntryView {
    fn from(entry: &CiRunEntry) -> Self {
        let (mark, progress) = match (entry.outcome, entry.running) {
            (RunOutcome::Pass, _) => (PASS, None),
            (RunOutcome::Fail, _) => (FAIL, None),
            (RunOutcome::Cancelled, _) => (CANCELLED, None),
            (RunOutcome::Running, Some(detail)) => (
                UNKNOWN,
                Some(format!(
                    "{}/{} {}m",
                    detail.jobs.completed, detail.jobs.total, detail.elapsed_minutes
                )),
            ),
            (RunOutcome::Running, None) => (UNKNOWN, None),
        };
        Self {
            name: entry.name.clone(),
            url: entry.html_url.clone(),
            mark,
            progress,
        }
    }
}

/// CI status line, entries ordered by display label
#[derive(Template)]
#[template(path = "ci_status.html")]
pub struct CiStatusView {
    /// Entries in display order
    pub entries: Vec<CiEntryView>,
}

impl CiStatusView {
    /// View over the aggregated CI state
    pub fn new(ci: &CiStatus) -> Self {
        let mut entries: Vec<&CiRunEntry> = ci.entries.iter().collect();
        entries.sort_by_key(|e| e.label());
        Self {
            entries: entries.into_iter().map(CiEntryView::from).collect(),
        }
    }
}

/// Plain text made safe for HTML
#[derive(Template)]
#[template(source = "{{ text }}", ext = "html")]
struct EscapedText<'a> {
    text: &'a str,
}

fn render<T: Template>(template: &T) -> Result<String> {
    template
        .render()
        .map_err(|e| Error::Template(format!("failed to render report: {e}")))
}

/// Render the table rows of a report
pub fn render_rows(report: &Report) -> Result<String> {
    render(&PrRowsView::new(report))
}

/// Render the CI status line with links, or [`NO_DATA`]
pub fn render_ci_status(ci: &CiStatus) -> Result<String> {
    if ci.entries.is_empty() {
        return Ok(NO_DATA.to_string());
    }
    Ok(render(&CiStatusView::new(ci))?.trim().to_string())
}

fn list_or_none(items: &[String]) -> Result<String> {
    if items.is_empty() {
        Ok("none".to_string())
    } else {
        render(&EscapedText {
            text: &items.join(", "),
        })
    }
}

/// Render the full page
///
/// The operator-supplied templates are plain HTML with placeholder words,
/// which are replaced after the rows are inserted.
pub fn render_report(report: &Report, templates: &Templates) -> Result<String> {
    let mut html = templates.pre.clone();
    html.push_str(&render_rows(report)?);
    html.push_str(&templates.post);

    let mut html = html
        .replace("UPDATE_TIMESTAMP", &report.generated_at.to_rfc3339())
        .replace("CI_STATUS", &render_ci_status(&report.ci)?)
        .replace("IGNORED_MILESTONES", &list_or_none(&report.ignored_milestones)?)
        .replace("IGNORED_LABELS", &list_or_none(&report.ignored_labels)?)
        .replace("RELEASE_PHASE", &report.freeze.phase_text());

    if let Some(ref path) = report.repository_path {
        html = html.replace("REPOSITORY_PATH", &render(&EscapedText { text: path })?);
    }

    Ok(html)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, content)?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

/// Write the CI artifact and the HTML report
pub fn write_outputs(report: &Report, templates: &Templates, config: &ReportConfig) -> Result<()> {
    let ci_json = serde_json::to_string_pretty(&report.ci.document())?;
    let html = render_report(report, templates)?;

    write_file(&config.ci_json_out, &ci_json)?;
    write_file(&config.html_out, &html)
}
