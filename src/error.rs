use thiserror::Error;

/// Unified error type for relsync operations
#[derive(Error, Debug)]
pub enum RelsyncError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Version file error: {0}")]
    VersionFile(String),

    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in relsync
pub type Result<T> = std::result::Result<T, RelsyncError>;

impl RelsyncError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RelsyncError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        RelsyncError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        RelsyncError::Tag(msg.into())
    }

    /// Create a version-file error with context
    pub fn vfile(msg: impl Into<String>) -> Self {
        RelsyncError::VersionFile(msg.into())
    }

    /// Create an abort error for a declined confirmation
    pub fn aborted(msg: impl Into<String>) -> Self {
        RelsyncError::Aborted(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelsyncError::config("missing relsync.toml");
        assert_eq!(err.to_string(), "Configuration error: missing relsync.toml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelsyncError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(RelsyncError::version("test")
            .to_string()
            .contains("Version"));
        assert!(RelsyncError::tag("test").to_string().contains("Tag"));
        assert!(RelsyncError::vfile("test")
            .to_string()
            .contains("Version file"));
        assert!(RelsyncError::aborted("declined")
            .to_string()
            .starts_with("Aborted"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (RelsyncError::config("x"), "Configuration error"),
            (RelsyncError::version("x"), "Version parsing error"),
            (RelsyncError::tag("x"), "Tag error"),
            (RelsyncError::aborted("x"), "Aborted"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
