use crate::domain::version::Version;
use crate::error::{RelsyncError, Result};

/// Release tag rendering and uniqueness selection.
///
/// A version renders into two tag forms: the short form `v<M>.<N>.<P>` and
/// the full form carrying the tweak. The short form is preferred; when it is
/// already taken the full form must be unique instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
}

impl ReleaseTag {
    /// Short tag without the tweak segment, e.g. "v1.2.3"
    pub fn short(version: &Version) -> String {
        format!("v{}", version.triple())
    }

    /// Full tag including the tweak, e.g. "v1.2.3-rc.3+ab12cd" or
    /// "v1.2.3+ab12cd" for a metadata-only tweak
    pub fn full(version: &Version) -> String {
        format!("v{}", version)
    }

    /// Pick a unique tag name for `version` among `existing` tags.
    ///
    /// The short form wins when free. When taken, the full form is required
    /// to be distinct from the short form and itself unused.
    pub fn select_unique(version: &Version, existing: &[String]) -> Result<ReleaseTag> {
        let short = Self::short(version);
        if !existing.iter().any(|t| t == &short) {
            return Ok(ReleaseTag { name: short });
        }

        let full = Self::full(version);
        if full == short {
            return Err(RelsyncError::tag(format!(
                "tag '{}' already exists and no tweak is set to disambiguate",
                short
            )));
        }
        if existing.iter().any(|t| t == &full) {
            return Err(RelsyncError::tag(format!(
                "both '{}' and '{}' already exist",
                short, full
            )));
        }

        Ok(ReleaseTag { name: full })
    }
}
