//! Configuration loaded from `config.toml`.
//!
//! Every field has a default, so an empty (or absent) file yields the stock
//! merge policy.

use crate::error::{Error, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the user config dir.
const CONFIG_DIR: &str = "merge-list";

/// Upper bound for configured wait times (ten years).
const MAX_WAIT_HOURS: i64 = 10 * 366 * 24;

/// Filename of the config file.
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Merge policy knobs
    pub policy: PolicyConfig,
    /// CI aggregation knobs
    pub ci: CiConfig,
    /// Report inputs and outputs
    pub report: ReportConfig,
    /// Run-level limits
    pub run: RunConfig,
}

/// Label names and wait times of the merge policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Label that removes the wait time and assignee requirement
    pub hotfix_label: String,
    /// Label that shortens the wait time
    pub trivial_label: String,
    /// Substring marking a do-not-merge label
    pub dnm_marker: String,
    /// Business hours a regular PR must stay open
    pub review_wait_business_hours: i64,
    /// Wall-clock hours a trivial PR must stay open
    pub trivial_wait_hours: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            hotfix_label: "Hotfix".to_string(),
            trivial_label: "Trivial".to_string(),
            dnm_marker: "DNM".to_string(),
            review_wait_business_hours: 48,
            trivial_wait_hours: 4,
        }
    }
}

/// Which CI runs to look at and how far back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CiConfig {
    /// Branch whose head is summarized
    pub main_branch: String,
    /// Name of the test-suite workflow run
    pub test_run_name: String,
    /// Age after which a PR's test-suite run counts as stale
    pub max_age_days: i64,
    /// Ancestor commits to try when the head run was cancelled
    pub history_depth: usize,
    /// Trigger event for main-branch runs
    pub event: String,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            main_branch: "main".to_string(),
            test_run_name: "Run tests with twister".to_string(),
            max_age_days: 31,
            history_depth: 10,
            event: "push".to_string(),
        }
    }
}

impl CiConfig {
    /// Age limit as a `TimeDelta`; saturates for out-of-range values
    pub fn max_age(&self) -> TimeDelta {
        TimeDelta::try_days(self.max_age_days).unwrap_or(TimeDelta::MAX)
    }
}

impl Config {
    /// Reject values the evaluation cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.ci.max_age_days < 0 || TimeDelta::try_days(self.ci.max_age_days).is_none() {
            return Err(Error::Config(format!(
                "ci.max_age_days out of range: {}",
                self.ci.max_age_days
            )));
        }
        for (name, hours) in [
            ("policy.review_wait_business_hours", self.policy.review_wait_business_hours),
            ("policy.trivial_wait_hours", self.policy.trivial_wait_hours),
        ] {
            if !(0..=MAX_WAIT_HOURS).contains(&hours) {
                return Err(Error::Config(format!("{name} out of range: {hours}")));
            }
        }
        Ok(())
    }
}

/// Report templates, outputs and candidate filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// HTML emitted before the table rows
    pub template_pre: PathBuf,
    /// HTML emitted after the table rows
    pub template_post: PathBuf,
    /// Rendered report
    pub html_out: PathBuf,
    /// Machine-readable CI summary
    pub ci_json_out: PathBuf,
    /// Milestones whose PRs are skipped
    pub ignore_milestones: Vec<String>,
    /// Labels whose PRs are skipped
    pub ignore_labels: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            template_pre: PathBuf::from("index.html.pre"),
            template_post: PathBuf::from("index.html.post"),
            html_out: PathBuf::from("public/index.html"),
            ci_json_out: PathBuf::from("public/ci.json"),
            ignore_milestones: vec!["future".to_string()],
            ignore_labels: Vec::new(),
        }
    }
}

/// Run-level limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Overall deadline for one run, in seconds
    pub deadline_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 1800,
        }
    }
}

impl RunConfig {
    /// Deadline as a `Duration`
    pub const fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Default config path under the user config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// if present, otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    parse_config(&content)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

/// Split a comma separated CLI list, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
