//! Report ordering

use crate::eligibility::gather::PrEvaluation;
use crate::types::EligibilityVerdict;
use std::cmp::Reverse;

/// Sort key: fully eligible first, then higher PR numbers first
pub const fn ranking_key(number: u64, verdict: &EligibilityVerdict) -> Reverse<(bool, u64)> {
    Reverse((verdict.is_fully_eligible(), number))
}

/// Rank evaluations for the report
pub fn rank_evaluations(evaluations: &mut [PrEvaluation]) {
    evaluations.sort_by_key(|e| ranking_key(e.snapshot.number, &e.verdict));
}
