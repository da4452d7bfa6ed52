//! Eligibility evaluation - pure functions
//!
//! Everything here works on data fetched beforehand, so the whole policy
//! can be unit tested without a platform.

use crate::ci::CiFreshness;
use crate::config::PolicyConfig;
use crate::eligibility::hours::{business_hours, whole_hours};
use crate::types::{
    EligibilityVerdict, IssueEvent, PullRequestSnapshot, ReviewRecord, ReviewState,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Policy overrides derived from a PR's labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelFlags {
    /// Hotfix label present
    pub hotfix: bool,
    /// Trivial label present
    pub trivial: bool,
    /// Some label contains the do-not-merge marker
    pub do_not_merge: bool,
}

/// Classify a label set against the policy's label names
pub fn classify_labels<'a, I>(labels: I, policy: &PolicyConfig) -> LabelFlags
where
    I: IntoIterator<Item = &'a String>,
{
    labels
        .into_iter()
        .fold(LabelFlags::default(), |mut flags, label| {
            flags.hotfix |= *label == policy.hotfix_label;
            flags.trivial |= *label == policy.trivial_label;
            flags.do_not_merge |= label.contains(&policy.dnm_marker);
            flags
        })
}

/// Replay reviews oldest-first into the set of current approvers.
///
/// `approved` adds the reviewer, `dismissed` and `changes_requested` remove
/// them, anything else leaves the set alone.
pub fn current_approvers(reviews: &[ReviewRecord]) -> BTreeSet<String> {
    let mut ordered: Vec<&ReviewRecord> = reviews.iter().collect();
    ordered.sort_by_key(|r| r.submitted_at);

    ordered
        .into_iter()
        .fold(BTreeSet::new(), |mut approvers, review| {
            match review.state {
                ReviewState::Approved => {
                    approvers.insert(review.reviewer.clone());
                }
                ReviewState::Dismissed | ReviewState::ChangesRequested => {
                    approvers.remove(&review.reviewer);
                }
                ReviewState::Other => {}
            }
            approvers
        })
}

/// Whether the assignee requirement is met
pub fn assignee_approved(
    snapshot: &PullRequestSnapshot,
    approvers: &BTreeSet<String>,
    hotfix: bool,
) -> bool {
    hotfix
        || snapshot.assignees.is_empty()
        || snapshot.assignees.contains(&snapshot.author)
        || approvers.iter().any(|a| snapshot.assignees.contains(a))
}

/// Start of the wait period: creation, or the last time the PR left draft
pub fn reference_time(created_at: DateTime<Utc>, events: &[IssueEvent]) -> DateTime<Utc> {
    events
        .iter()
        .rev()
        .find(|e| e.is_ready_for_review())
        .map_or(created_at, |e| e.created_at)
}

/// Hours still to wait under the time policy
///
/// Hotfixes wait zero hours, trivial PRs a number of wall-clock hours,
/// everything else a number of business hours.
pub const fn remaining_wait_hours(
    flags: LabelFlags,
    elapsed_hours: i64,
    elapsed_business_hours: i64,
    policy: &PolicyConfig,
) -> i64 {
    if flags.hotfix {
        0
    } else if flags.trivial {
        policy.trivial_wait_hours - elapsed_hours
    } else {
        policy.review_wait_business_hours - elapsed_business_hours
    }
}

/// Data gathered for one PR
#[derive(Debug, Clone)]
pub struct EvaluationInput<'a> {
    /// PR snapshot, with merge tri-states already refreshed if needed
    pub snapshot: &'a PullRequestSnapshot,
    /// Reviews on the PR
    pub reviews: &'a [ReviewRecord],
    /// Issue timeline events on the PR
    pub events: &'a [IssueEvent],
    /// Freshness of the PR's test-suite run
    pub ci: CiFreshness,
}

/// Evaluate one PR against the merge policy (PURE - no I/O)
pub fn evaluate(
    input: &EvaluationInput<'_>,
    now: DateTime<Utc>,
    policy: &PolicyConfig,
) -> EligibilityVerdict {
    let snapshot = input.snapshot;
    let flags = classify_labels(&snapshot.labels, policy);

    let approvers = current_approvers(input.reviews);
    let assignee_ok = assignee_approved(snapshot, &approvers, flags.hotfix);

    let reference = reference_time(snapshot.created_at, input.events);
    let elapsed = now - reference;
    let elapsed_hours = whole_hours(elapsed);
    let elapsed_business_hours = business_hours(reference, elapsed);

    let remaining_hours =
        remaining_wait_hours(flags, elapsed_hours, elapsed_business_hours, policy);

    EligibilityVerdict {
        assignee_approved: assignee_ok,
        time_satisfied: remaining_hours <= 0,
        remaining_hours,
        mergeable: snapshot.mergeable,
        rebaseable: snapshot.rebaseable,
        hotfix: flags.hotfix,
        trivial: flags.trivial,
        do_not_merge: flags.do_not_merge,
        ci_age_days: input.ci.age_days,
        ci_recent: input.ci.recent,
        approvers: approvers.into_iter().collect(),
        elapsed_hours,
        elapsed_business_hours,
    }
}
