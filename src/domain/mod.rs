//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod tag;
pub mod tweak;
pub mod version;

pub use commit::{ParsedCommit, COMMIT_TYPES};
pub use tag::ReleaseTag;
pub use tweak::Tweak;
pub use version::{Version, VersionBump};
