//! CI health aggregation
//!
//! Two entry points:
//! 1. Branch status - summarize the main branch head, walking back past
//!    cancelled test runs (`aggregate`)
//! 2. PR freshness - how old a PR's test-suite run is (`staleness`)
//!
//! Classification and summary text live in `summary` and are pure.

mod aggregate;
mod staleness;
mod summary;

pub use aggregate::{RunSet, aggregate_ci_status, select_run_set, summarize_runs};
pub use staleness::{CiFreshness, check_ci_freshness, freshness_from_runs, skips_ci_check};
pub use summary::{
    CiRunEntry, CiRunRecord, CiRunsDocument, CiStatus, NO_DATA, RunClass, RunOutcome,
    RunningDetail, classify_run, has_named_run, named_run_cancelled,
};
