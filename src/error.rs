//! Error types for merge-list

use std::time::Duration;
use thiserror::Error;

/// Errors produced while building a merge-readiness report
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned something we could not use
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error bubbled up from octocrab
    #[error("GitHub client error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Raw HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Report template missing, unreadable or failing to render
    #[error("template error: {0}")]
    Template(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The run exceeded its overall deadline
    #[error("run exceeded deadline of {}s", .0.as_secs())]
    Deadline(Duration),

    /// Platform-level failure not covered by the variants above
    #[error("platform error: {0}")]
    Platform(String),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
