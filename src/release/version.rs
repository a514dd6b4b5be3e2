//! Release version and tag values
//!
//! Versions follow `MAJOR.MINOR.PATCH[-PRERELEASE]` with no leading `v`; the tag
//! is always `v` + version. Both are validated once at the boundary and are
//! immutable afterwards.

use crate::core::error::{RelError, RelResult, ReleaseError};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static SEMVER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+(?:-[0-9A-Za-z.-]+)?$").expect("static semver pattern"));

/// A validated release version such as `1.2.3` or `1.2.3-beta.1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
  /// Parse user input or a version read from the tree
  pub fn parse(input: &str) -> RelResult<Self> {
    let reject = |reason: &str| {
      Err(RelError::Release(ReleaseError::InvalidVersion {
        input: input.to_string(),
        reason: reason.to_string(),
      }))
    };

    if input.is_empty() {
      return reject("Missing version (example: 0.1.0)");
    }
    if input.starts_with('v') || input.starts_with('V') {
      return reject("Use bare version without 'v'");
    }
    if !SEMVER.is_match(input) {
      return reject("Invalid semver");
    }

    Ok(Self(input.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The release tag for this version
  pub fn tag(&self) -> ReleaseTag {
    ReleaseTag(format!("v{}", self.0))
  }
}

impl fmt::Display for ReleaseVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// `v` + version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReleaseTag(String);

impl ReleaseTag {
  /// Tag required for a raw version string (used when the version comes from the tree)
  pub fn for_raw(version: &str) -> Self {
    Self(format!("v{}", version))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Whether a user-supplied tag names this tag (surrounding whitespace ignored)
  pub fn matches(&self, candidate: &str) -> bool {
    candidate.trim() == self.0
  }
}

impl fmt::Display for ReleaseTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
