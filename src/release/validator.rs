//! Consistency validation
//!
//! Reads every resolved location, compares the observed versions with each other
//! and with the expected version and tag, then evaluates the release invariants.
//! Data problems become [`Issue`]s so a single run reports all of them; only
//! structural adapter failures are returned as errors.

use super::locations::VersionLocationRegistry;
use super::version::{ReleaseTag, ReleaseVersion};
use crate::checks::{Invariant, Issue, default_invariants};
use crate::core::context::ReleaseContext;
use crate::core::error::{RelError, RelResult, ReleaseError};
use serde::Serialize;

/// One location's observed version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
  pub label: String,
  /// `None` when a keyed record is absent from an existing lock file
  pub version: Option<String>,
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
  pub issues: Vec<Issue>,
  pub snapshot: Vec<SnapshotEntry>,
}

impl CheckReport {
  pub fn passed(&self) -> bool {
    self.issues.is_empty()
  }

  /// Fail with [`ReleaseError::ChecksFailed`] unless the report is clean
  pub fn ensure_passed(self) -> RelResult<Self> {
    if self.passed() {
      Ok(self)
    } else {
      Err(RelError::Release(ReleaseError::ChecksFailed {
        issues: self.issues.iter().map(|i| i.message.clone()).collect(),
      }))
    }
  }
}

pub struct ConsistencyValidator<'a> {
  ctx: &'a ReleaseContext,
  registry: &'a VersionLocationRegistry,
  invariants: Vec<Box<dyn Invariant>>,
}

impl<'a> ConsistencyValidator<'a> {
  pub fn new(ctx: &'a ReleaseContext, registry: &'a VersionLocationRegistry) -> Self {
    Self {
      ctx,
      registry,
      invariants: default_invariants(),
    }
  }

  pub fn validate(&self, expected_version: Option<&ReleaseVersion>, expected_tag: Option<&str>) -> RelResult<CheckReport> {
    let mut snapshot = Vec::with_capacity(self.registry.len());
    let mut canonical_value = None;
    for location in self.registry.iter() {
      let version = location.read()?;
      if std::ptr::eq(location, self.registry.canonical()) {
        canonical_value = version.clone();
      }
      snapshot.push(SnapshotEntry {
        label: location.label().to_string(),
        version,
      });
    }

    let mut issues = Vec::new();

    for (location, entry) in self.registry.iter().zip(&snapshot) {
      if entry.version.is_none() && location.is_required() {
        issues.push(Issue::new(
          "missing-version",
          format!("{} does not declare a version", entry.label),
        ));
      }
    }

    let observed: Vec<(&str, &str)> = snapshot
      .iter()
      .filter_map(|e| e.version.as_deref().map(|v| (e.label.as_str(), v)))
      .collect();

    let first = observed.first().map(|(_, v)| *v);
    if observed.iter().any(|(_, v)| Some(*v) != first) {
      let listing: Vec<String> = observed.iter().map(|(label, v)| format!("{}={}", label, v)).collect();
      issues.push(Issue::new(
        "version-mismatch",
        format!("Version mismatch across files: {}", listing.join(", ")),
      ));
    }

    if let Some(expected) = expected_version {
      for (label, version) in &observed {
        if *version != expected.as_str() {
          issues.push(Issue::new(
            "expected-version",
            format!("Expected {} to be {}, got {}", label, expected, version),
          ));
        }
      }
    }

    if let Some(tag) = expected_tag {
      let required = match (expected_version, canonical_value.as_deref()) {
        (Some(version), _) => Some(version.tag()),
        (None, Some(raw)) => Some(ReleaseTag::for_raw(raw)),
        (None, None) => None,
      };
      if let Some(required) = required
        && !required.matches(tag)
      {
        issues.push(Issue::new(
          "tag-mismatch",
          format!("Tag mismatch: expected {}, got {}", required, tag.trim()),
        ));
      }
    }

    for invariant in &self.invariants {
      let found = invariant.evaluate(self.ctx)?;
      tracing::debug!(
        invariant = invariant.name(),
        rule = invariant.description(),
        issues = found.len(),
        "evaluated invariant"
      );
      issues.extend(found);
    }

    Ok(CheckReport { issues, snapshot })
  }
}
