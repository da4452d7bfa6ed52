//! Merge-eligibility engine
//!
//! Same three-phase shape for every PR:
//! 1. Gather - fetch reviews, events, refreshed merge state, CI age (effectful)
//! 2. Evaluate - apply the merge policy (pure, testable)
//! 3. Rank - order verdicts for the report

mod evaluate;
mod gather;
mod hours;
mod rank;

pub use evaluate::{
    EvaluationInput, LabelFlags, assignee_approved, classify_labels, current_approvers,
    evaluate, reference_time, remaining_wait_hours,
};
pub use gather::{PrEvaluation, PrFailure, evaluate_pull_request, refresh_merge_state};
pub use hours::{business_hours, whole_hours};
pub use rank::{rank_evaluations, ranking_key};
