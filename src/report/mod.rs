//! Report assembly and rendering
//!
//! 1. Candidates - search and filter open PRs before evaluation
//! 2. Assemble - freeze detection, CI aggregation, per-PR evaluation, ranking
//! 3. Render - HTML page from templates plus the `ci.json` artifact

mod assemble;
mod candidates;
mod html;

pub use assemble::{EvaluationProgress, NoProgress, Report, build_report};
pub use candidates::{CandidateFilter, SkipReason, is_target_branch, search_query};
pub use html::{
    CiEntryView, CiStatusView, Mark, PrRow, PrRowsView, RowTag, Templates, render_ci_status,
    render_report, render_rows, write_outputs,
};
