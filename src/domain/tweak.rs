//! Pre-release "tweak" segment handling
//!
//! A tweak is the pre-release/build-metadata part of a version: an optional
//! lifecycle label, an optional numeric counter and an optional short commit
//! hash, in the shape `label[.counter][+hash]`. At least one part must be
//! present for a tweak to be valid.

use crate::error::{RelsyncError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Release-lifecycle vocabulary accepted for tweak labels.
pub const DEFAULT_LABELS: &[&str] = &[
    "dev", "pre", "nightly", "alpha", "beta", "rc", "stable", "release", "lts", "eol",
];

/// Older five-entry vocabulary, kept for repositories that still use it.
pub const LEGACY_LABELS: &[&str] = &["pre", "alpha", "beta", "rc", "eol"];

/// Default vocabulary as owned strings, usable as a config default.
pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Decomposed tweak segment of a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweak {
    /// Lifecycle label, member of the configured vocabulary
    pub label: Option<String>,
    /// Numeric counter (plain iteration count or a YYYYMMDD date)
    pub counter: Option<u64>,
    /// Short commit hash suffix (lowercase hex)
    pub hash: Option<String>,
}

impl Tweak {
    /// Parse a tweak string against a label vocabulary.
    ///
    /// Accepted shapes: `rc`, `rc.3`, `rc.3+ab12cd34ef`, `rc+ab12cd34ef`,
    /// `20260830`, `+ab12cd34ef`. Label comparison is case-sensitive exact
    /// match against `labels`.
    pub fn parse(s: &str, labels: &[String]) -> Result<Self> {
        if s.is_empty() {
            return Err(RelsyncError::version("empty tweak"));
        }

        let (head, hash) = match s.split_once('+') {
            Some((head, hash)) => (head, Some(hash)),
            None => (s, None),
        };

        if let Some(h) = hash {
            let is_hex = !h.is_empty()
                && h.chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
            if !is_hex {
                return Err(RelsyncError::version(format!(
                    "invalid commit hash suffix '{}' in tweak '{}'",
                    h, s
                )));
            }
        }

        let (label, counter) = if head.is_empty() {
            (None, None)
        } else if head.chars().all(|c| c.is_ascii_digit()) {
            let counter = head.parse::<u64>().map_err(|_| {
                RelsyncError::version(format!("invalid tweak counter '{}'", head))
            })?;
            (None, Some(counter))
        } else {
            let (label, counter_part) = match head.split_once('.') {
                Some((label, counter)) => (label, Some(counter)),
                None => (head, None),
            };

            if !labels.iter().any(|known| known == label) {
                return Err(RelsyncError::version(format!(
                    "unknown pre-release label '{}' (expected one of: {})",
                    label,
                    labels.join(", ")
                )));
            }

            let counter = match counter_part {
                Some(c) => Some(c.parse::<u64>().map_err(|_| {
                    RelsyncError::version(format!("invalid tweak counter '{}'", c))
                })?),
                None => None,
            };

            (Some(label.to_string()), counter)
        };

        if label.is_none() && counter.is_none() && hash.is_none() {
            return Err(RelsyncError::version(format!("unparsable tweak '{}'", s)));
        }

        Ok(Tweak {
            label,
            counter,
            hash: hash.map(|h| h.to_string()),
        })
    }

    /// A tweak carrying only a commit hash is build metadata, not a
    /// pre-release: it renders with `+` and no leading hyphen.
    pub fn is_metadata_only(&self) -> bool {
        self.label.is_none() && self.counter.is_none() && self.hash.is_some()
    }

    /// Interpret an 8-digit counter as a calendar date, if it is one.
    pub fn date_counter(&self) -> Option<NaiveDate> {
        let counter = self.counter?;
        if !(10_000_000..=99_999_999).contains(&counter) {
            return None;
        }
        let year = (counter / 10_000) as i32;
        let month = ((counter / 100) % 100) as u32;
        let day = (counter % 100) as u32;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Advance the counter for the next release: date counters move to
    /// `today`, plain counters increment, absent counters stay absent.
    /// The hash is cleared; the caller decides which hash to attach.
    pub fn advanced(&self, today: NaiveDate) -> Result<Tweak> {
        let counter = match self.counter {
            Some(_) if self.date_counter().is_some() => Some(
                today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64,
            ),
            Some(n) => Some(n.checked_add(1).ok_or_else(|| {
                RelsyncError::version(format!("tweak counter {} cannot be incremented", n))
            })?),
            None => None,
        };

        Ok(Tweak {
            label: self.label.clone(),
            counter,
            hash: None,
        })
    }

    /// True if label or counter differ from `other` (the hash does not count
    /// as a change; it is derived metadata).
    pub fn differs_from(&self, other: &Tweak) -> bool {
        self.label != other.label || self.counter != other.counter
    }
}

impl fmt::Display for Tweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, self.counter) {
            (Some(label), Some(counter)) => write!(f, "{}.{}", label, counter)?,
            (Some(label), None) => write!(f, "{}", label)?,
            (None, Some(counter)) => write!(f, "{}", counter)?,
            (None, None) => {}
        }
        if let Some(hash) = &self.hash {
            write!(f, "+{}", hash)?;
        }
        Ok(())
    }
}
