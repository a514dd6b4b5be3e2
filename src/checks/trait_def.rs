//! Invariant trait abstraction for release metadata rules
//!
//! Version consistency is handled by the validator itself. Everything else a
//! release needs from the tree (CI triggers, updater packaging) is an
//! [`Invariant`]: something that can be evaluated into issues and forced back
//! into shape by `fix`.

use crate::core::context::ReleaseContext;
use crate::core::error::RelResult;
use serde::Serialize;
use std::fmt;

/// A single human-readable consistency problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
  /// Name of the rule that produced the issue (kebab-case)
  pub check: &'static str,
  /// Message shown to the user
  pub message: String,
}

impl Issue {
  pub fn new(check: &'static str, message: impl Into<String>) -> Self {
    Self {
      check,
      message: message.into(),
    }
  }
}

impl fmt::Display for Issue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

/// Release invariant trait
///
/// `evaluate` never mutates the tree. `fix` must be idempotent: running it on
/// an already-fixed tree leaves every byte unchanged, and after `fix` the same
/// invariant evaluates to no issues unless the file lacks the anchors the fix
/// relies on.
///
/// # Example
///
/// ```rust,ignore
/// struct ReadmeBadge;
///
/// impl Invariant for ReadmeBadge {
///   fn name(&self) -> &'static str {
///     "readme-badge"
///   }
///
///   fn description(&self) -> &'static str {
///     "README shows the release badge"
///   }
///
///   fn evaluate(&self, ctx: &ReleaseContext) -> RelResult<Vec<Issue>> {
///     let text = read_text(&ctx.path(Path::new("README.md")))?;
///     Ok(if text.contains("release-badge") { vec![] } else { vec![Issue::new(self.name(), "README is missing the release badge")] })
///   }
///
///   fn fix(&self, _ctx: &ReleaseContext) -> RelResult<()> {
///     Ok(())
///   }
/// }
/// ```
pub trait Invariant {
  /// Unique name for this invariant (kebab-case)
  fn name(&self) -> &'static str;

  /// Human-readable description of the rule
  fn description(&self) -> &'static str;

  /// Inspect the tree and report every violation
  fn evaluate(&self, ctx: &ReleaseContext) -> RelResult<Vec<Issue>>;

  /// Rewrite the tree so the rule holds
  fn fix(&self, ctx: &ReleaseContext) -> RelResult<()>;
}
