use regex::Regex;

/// Commit types recognized by the message grammar.
///
/// Matching is case-sensitive exact; `WIP` is deliberately uppercase.
pub const COMMIT_TYPES: &[&str] = &[
    "fix", "feat", "break", "ci", "docs", "test", "build", "perf", "style", "chore", "revert",
    "refactor", "WIP",
];

/// Parsed representation of a conventional commit message.
///
/// This is the lenient parse used for history analysis: anything that does
/// not look conventional degrades to a `chore` instead of failing, because a
/// repository's past cannot be rejected. Strict validation of new messages
/// lives in the lint module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message according to conventional commits spec
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text
    pub fn parse(message: &str) -> Self {
        let has_breaking_marker = message.contains("BREAKING CHANGE:")
            || message.contains("BREAKING-CHANGE:")
            || message.contains("[BREAKING CHANGES");

        // Try format: type(scope)!: description
        if let Some(captures) = Regex::new(r"^([A-Za-z]+)\(([^)]+)\)(!?):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let scope = captures.get(2).map(|m| m.as_str().to_string());
            let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");
            let description = captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            let is_breaking =
                has_exclamation || has_breaking_marker || r#type == "break";

            return ParsedCommit {
                r#type,
                scope,
                description,
                is_breaking_change: is_breaking,
            };
        }

        // Try format: type!: description or type: description
        if let Some(captures) = Regex::new(r"^([A-Za-z]+)(!?):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let has_exclamation = captures.get(2).map(|m| m.as_str()) == Some("!");
            let description = captures
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            let is_breaking =
                has_exclamation || has_breaking_marker || r#type == "break";

            return ParsedCommit {
                r#type,
                scope: None,
                description,
                is_breaking_change: is_breaking,
            };
        }

        // Default: non-conventional commit
        ParsedCommit {
            r#type: "chore".to_string(),
            scope: None,
            description: message.lines().next().unwrap_or("").to_string(),
            is_breaking_change: has_breaking_marker,
        }
    }
}
