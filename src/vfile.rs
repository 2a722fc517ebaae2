//! Anchored version-file editing.
//!
//! The tracked file is tokenized once into a sequence of literal lines and
//! tracked-field lines. Each tracked field is located by its configured
//! anchor: the literal text immediately preceding the value. The value token
//! is the quoted span after the anchor, or the run up to the next whitespace
//! or delimiter when unquoted. Mutation touches only the value token; all
//! surrounding text and quoting survive re-serialization byte for byte.

use crate::error::{RelsyncError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Line {
    Literal(String),
    Field {
        name: String,
        lead: String,
        value: String,
        trail: String,
    },
}

/// In-memory field map over an anchored text file
#[derive(Debug)]
pub struct VersionFile {
    path: PathBuf,
    lines: Vec<Line>,
    dirty: Vec<String>,
}

impl VersionFile {
    /// Load a file and bind each anchor to the first line it appears on.
    ///
    /// Anchors that match no line simply produce no field; the caller decides
    /// which fields are mandatory.
    pub fn load(path: &Path, anchors: &BTreeMap<String, String>) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            RelsyncError::vfile(format!("cannot read '{}': {}", path.display(), e))
        })?;

        let mut unbound: BTreeMap<&str, &str> = anchors
            .iter()
            .map(|(name, anchor)| (name.as_str(), anchor.as_str()))
            .collect();

        let mut lines = Vec::new();
        for raw in text.split_inclusive('\n') {
            let mut parsed = None;
            for (&name, &anchor) in unbound.iter() {
                if let Some((lead, value, trail)) = split_at_anchor(raw, anchor) {
                    parsed = Some((name.to_string(), lead, value, trail));
                    break;
                }
            }
            match parsed {
                Some((name, lead, value, trail)) => {
                    unbound.remove(name.as_str());
                    lines.push(Line::Field {
                        name,
                        lead,
                        value,
                        trail,
                    });
                }
                None => lines.push(Line::Literal(raw.to_string())),
            }
        }

        Ok(VersionFile {
            path: path.to_path_buf(),
            lines,
            dirty: Vec::new(),
        })
    }

    /// Current value of a tracked field, if its anchor was found
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Field {
                name: field, value, ..
            } if field == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Like [get], but a missing field is a hard error naming the field
    pub fn get_required(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| {
            RelsyncError::vfile(format!(
                "required field '{}' not found in '{}'",
                name,
                self.path.display()
            ))
        })
    }

    /// Replace the value of a tracked field. Marks the file dirty only when
    /// the value actually changes.
    pub fn set(&mut self, name: &str, new_value: &str) -> Result<()> {
        for line in &mut self.lines {
            if let Line::Field {
                name: field, value, ..
            } = line
            {
                if field == name {
                    if value != new_value {
                        *value = new_value.to_string();
                        if !self.dirty.iter().any(|n| n == name) {
                            self.dirty.push(name.to_string());
                        }
                    }
                    return Ok(());
                }
            }
        }
        Err(RelsyncError::vfile(format!(
            "no tracked field named '{}' in '{}'",
            name,
            self.path.display()
        )))
    }

    /// Whether any tracked value differs from what was loaded
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Names of the tracked fields changed since load, in change order
    pub fn dirty_fields(&self) -> Vec<&str> {
        self.dirty.iter().map(String::as_str).collect()
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Literal(text) => out.push_str(text),
                Line::Field {
                    lead, value, trail, ..
                } => {
                    out.push_str(lead);
                    out.push_str(value);
                    out.push_str(trail);
                }
            }
        }
        out
    }

    /// Write the file back if dirty: rename the original to a backup, write
    /// the new content, then discard the backup. Returns whether a write
    /// happened.
    pub fn save(&mut self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }

        let backup = backup_path(&self.path);
        fs::rename(&self.path, &backup)?;
        match fs::write(&self.path, self.serialize()) {
            Ok(()) => {
                let _ = fs::remove_file(&backup);
                self.dirty.clear();
                Ok(true)
            }
            Err(e) => {
                // Put the original back so a failed write loses nothing
                let _ = fs::rename(&backup, &self.path);
                Err(e.into())
            }
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Split one line at an anchor into (lead, value, trail).
///
/// The lead includes the anchor, the whitespace after it and an opening
/// quote when present; the trail starts at the closing quote or the first
/// delimiter after the value.
fn split_at_anchor(line: &str, anchor: &str) -> Option<(String, String, String)> {
    if anchor.is_empty() {
        return None;
    }
    let start = line.find(anchor)?;
    let after_anchor = start + anchor.len();
    let rest = &line[after_anchor..];
    let ws = rest.len() - rest.trim_start().len();
    let value_start = after_anchor + ws;
    let rest = &line[value_start..];

    if let Some(quoted) = rest.strip_prefix('"') {
        let close = quoted.find('"')?;
        Some((
            line[..value_start + 1].to_string(),
            quoted[..close].to_string(),
            line[value_start + 1 + close..].to_string(),
        ))
    } else {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == ';' || c == ',')
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        Some((
            line[..value_start].to_string(),
            rest[..end].to_string(),
            line[value_start + end..].to_string(),
        ))
    }
}
