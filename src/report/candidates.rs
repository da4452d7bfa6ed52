//! Candidate selection - which open PRs get evaluated at all

use crate::release::FreezeStatus;
use crate::types::{PlatformConfig, PrCandidate};

/// Search query for open, approved, green, non-draft PRs without a DNM label
pub fn search_query(config: &PlatformConfig) -> String {
    format!(
        "is:pr is:open repo:{}/{} review:approved status:success -label:DNM draft:false",
        config.owner, config.repo
    )
}

/// Why a candidate was left out of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Milestone is on the ignore list
    IgnoredMilestone(String),
    /// Milestone is beyond the release being frozen
    FrozenMilestone {
        /// PR milestone
        milestone: String,
        /// Latest release tag
        latest_tag: String,
    },
    /// A label is on the ignore list
    IgnoredLabel(String),
    /// Base branch is neither main nor a release branch
    BaseBranch(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IgnoredMilestone(m) => write!(f, "milestone={m}"),
            Self::FrozenMilestone {
                milestone,
                latest_tag,
            } => write!(f, "milestone={milestone} > {latest_tag}"),
            Self::IgnoredLabel(l) => write!(f, "label={l}"),
            Self::BaseBranch(b) => write!(f, "ref={b}"),
        }
    }
}

/// Filters applied to search results before any PR is fetched
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter<'a> {
    /// Milestones to skip
    pub ignore_milestones: &'a [String],
    /// Labels to skip
    pub ignore_labels: &'a [String],
    /// Release freeze state
    pub freeze: &'a FreezeStatus,
}

impl CandidateFilter<'_> {
    /// Reason to skip this candidate, if any
    pub fn check(&self, candidate: &PrCandidate) -> Option<SkipReason> {
        if let Some(ref milestone) = candidate.milestone {
            if self.ignore_milestones.contains(milestone) {
                return Some(SkipReason::IgnoredMilestone(milestone.clone()));
            }
            if self.freeze.excludes_milestone(milestone) {
                return Some(SkipReason::FrozenMilestone {
                    milestone: milestone.clone(),
                    latest_tag: self.freeze.latest_tag.clone(),
                });
            }
        }

        candidate
            .labels
            .iter()
            .find(|label| self.ignore_labels.contains(label))
            .map(|label| SkipReason::IgnoredLabel(label.clone()))
    }
}

/// Whether PRs against `base_ref` are merged by this process
///
/// That is the main branch and release branches named `v*-branch`.
pub fn is_target_branch(base_ref: &str, main_branch: &str) -> bool {
    base_ref == main_branch || (base_ref.starts_with('v') && base_ref.ends_with("-branch"))
}
