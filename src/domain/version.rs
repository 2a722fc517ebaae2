use crate::domain::tweak::Tweak;
use crate::error::{RelsyncError, Result};
use std::fmt;

/// Semantic version with the optional tweak segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub tweak: Option<Tweak>,
}

impl Version {
    /// Create a new version without a tweak
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            tweak: None,
        }
    }

    /// Attach a tweak segment
    pub fn with_tweak(mut self, tweak: Option<Tweak>) -> Self {
        self.tweak = tweak;
        self
    }

    /// Parse a version string such as "1.2.3", "1.2.3-rc.3+ab12cd" or
    /// "1.2.3+ab12cd" (metadata-only tweak).
    pub fn parse(s: &str, labels: &[String]) -> Result<Self> {
        let s = s.trim().trim_start_matches('v').trim_start_matches('V');

        let (triple, tweak) = if let Some((triple, rest)) = s.split_once('-') {
            (triple, Some(Tweak::parse(rest, labels)?))
        } else if let Some((triple, hash)) = s.split_once('+') {
            (triple, Some(Tweak::parse(&format!("+{}", hash), labels)?))
        } else {
            (s, None)
        };

        let parts: Vec<&str> = triple.split('.').collect();
        if parts.len() != 3 {
            return Err(RelsyncError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                s
            )));
        }

        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| RelsyncError::version(format!("Invalid major version: {}", parts[0])))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| RelsyncError::version(format!("Invalid minor version: {}", parts[1])))?;
        let patch = parts[2]
            .parse::<u32>()
            .map_err(|_| RelsyncError::version(format!("Invalid patch version: {}", parts[2])))?;

        Ok(Version {
            major,
            minor,
            patch,
            tweak,
        })
    }

    /// Bump the triple according to bump type, dropping nothing else:
    /// the tweak is left untouched so the caller can negotiate it separately.
    pub fn bump(&self, bump_type: &VersionBump) -> Result<Self> {
        let (major, minor, patch) = match bump_type {
            VersionBump::Major => (bump_part(self.major, "major")?, 0, 0),
            VersionBump::Minor => (self.major, bump_part(self.minor, "minor")?, 0),
            VersionBump::Patch => (self.major, self.minor, bump_part(self.patch, "patch")?),
        };
        Ok(Version {
            major,
            minor,
            patch,
            tweak: self.tweak.clone(),
        })
    }

    /// The bare triple as a string, without tweak
    pub fn triple(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        match &self.tweak {
            Some(tweak) if tweak.is_metadata_only() => write!(f, "{}", tweak),
            Some(tweak) => write!(f, "-{}", tweak),
            None => Ok(()),
        }
    }
}

fn bump_part(value: u32, field: &str) -> Result<u32> {
    value.checked_add(1).ok_or_else(|| {
        RelsyncError::version(format!("{} version {} cannot be incremented", field, value))
    })
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}
