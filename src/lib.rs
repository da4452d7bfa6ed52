//! merge-list: merge-readiness report for open pull requests
//!
//! Evaluates open PRs against a merge policy (assignee approval, wait time,
//! rebase state) and summarizes the main branch's CI health.

pub mod auth;
pub mod ci;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod platform;
pub mod release;
pub mod report;
pub mod types;
