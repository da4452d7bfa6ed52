//! Release-freeze detection from repository tags
//!
//! The highest `vX.Y.Z` version among the tags is the latest version. When
//! no tag named exactly `vX.Y.Z` exists for it (only e.g. `vX.Y.Z-rc1`), the
//! release is still being stabilized and the repository is in freeze mode.

use crate::error::Result;
use crate::platform::PlatformService;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::info;

/// Tag prefix pattern; anything after the patch number is ignored
static VERSION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v([0-9]+)\.([0-9]+)\.([0-9]+)").expect("version tag pattern is valid")
});

/// `(major, minor, patch)`
pub type Version = (u64, u64, u64);

/// Parse the version prefix of a tag name
///
/// Returns `None` for names that do not start with `v<major>.<minor>.<patch>`
/// or whose components overflow.
pub fn parse_tag_version(name: &str) -> Option<Version> {
    let caps = VERSION_TAG.captures(name)?;
    let component = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();
    Some((component(1)?, component(2)?, component(3)?))
}

/// Freeze state of the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeStatus {
    /// Latest version has not been tagged exactly yet
    pub freeze_mode: bool,
    /// `v<major>.<minor>.<patch>` of the latest version
    pub latest_tag: String,
}

impl FreezeStatus {
    /// Whether a PR with this milestone is held back by the freeze
    ///
    /// Milestones compare as plain strings against the latest tag.
    pub fn excludes_milestone(&self, milestone: &str) -> bool {
        self.freeze_mode && milestone > self.latest_tag.as_str()
    }

    /// Release phase description for the report
    pub fn phase_text(&self) -> String {
        if self.freeze_mode {
            format!("feature freeze (next: {})", self.latest_tag)
        } else {
            format!("integration (latest: {})", self.latest_tag)
        }
    }
}

/// Detect freeze mode from a list of tag names
///
/// Names without a version prefix are skipped.
pub fn detect_freeze<I, S>(tags: I) -> FreezeStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut latest: Version = (0, 0, 0);
    let mut versioned = HashSet::new();

    for tag in tags {
        let name = tag.as_ref();
        let Some(version) = parse_tag_version(name) else {
            continue;
        };
        versioned.insert(name.to_string());
        latest = latest.max(version);
    }

    let latest_tag = format!("v{}.{}.{}", latest.0, latest.1, latest.2);
    FreezeStatus {
        freeze_mode: !versioned.contains(&latest_tag),
        latest_tag,
    }
}

/// Fetch tags and detect freeze mode
pub async fn detect_feature_freeze(platform: &dyn PlatformService) -> Result<FreezeStatus> {
    let tags = platform.list_tags().await?;
    let status = detect_freeze(&tags);
    info!(latest_tag = %status.latest_tag, freeze_mode = status.freeze_mode, "release phase");
    Ok(status)
}
