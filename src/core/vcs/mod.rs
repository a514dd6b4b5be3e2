//! Version-control seam for release cutting
//!
//! The orchestrator only talks to [`ReleaseVcs`]; [`SystemGit`] is the production
//! backend. Every call blocks until git exits and is attempted exactly once.

pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::RelResult;
use std::path::PathBuf;

/// Operations `cut` needs from the version-control subsystem
pub trait ReleaseVcs {
  /// Whether `refs/tags/<tag>` exists (explicit query, not attempt-and-catch)
  fn tag_exists(&self, tag: &str) -> RelResult<bool>;

  /// Stage the given repository-relative paths
  fn stage(&self, paths: &[PathBuf]) -> RelResult<()>;

  /// Paths currently staged in the index
  fn staged_files(&self) -> RelResult<Vec<String>>;

  /// Commit the index with `message`
  fn commit(&self, message: &str) -> RelResult<()>;

  /// Create an annotated tag at HEAD
  fn create_annotated_tag(&self, tag: &str, message: &str) -> RelResult<()>;

  /// Push the current branch (`HEAD`) to `remote`
  fn push_head(&self, remote: &str) -> RelResult<()>;

  /// Push a single tag to `remote`
  fn push_tag(&self, remote: &str, tag: &str) -> RelResult<()>;
}
