pub mod changelog;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod lint;
pub mod prompt;
pub mod sync;
pub mod ui;
pub mod vfile;

pub use error::{RelsyncError, Result};
