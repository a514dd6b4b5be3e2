//! Version location registry
//!
//! Resolves the configured `[[locations]]` against the repository once per
//! invocation. Optional locations whose file is missing are dropped here, so
//! everything downstream can treat the set as "files that exist".

use crate::adapters::{FormatAdapter, adapter_for};
use crate::core::config::{FormatKind, LocationConfig};
use crate::core::context::ReleaseContext;
use crate::core::error::{AdapterError, RelError, RelResult};
use std::path::{Path, PathBuf};

/// A resolved place where the project version is stored
pub struct VersionLocation {
  label: String,
  rel_path: PathBuf,
  abs_path: PathBuf,
  required: bool,
  adapter: Box<dyn FormatAdapter>,
}

impl VersionLocation {
  fn resolve(ctx: &ReleaseContext, config: &LocationConfig) -> Self {
    Self {
      label: config.label(),
      rel_path: config.path.clone(),
      abs_path: ctx.path(&config.path),
      required: config.is_required(),
      adapter: adapter_for(config),
    }
  }

  /// `path` or `path (record)`
  pub fn label(&self) -> &str {
    &self.label
  }

  /// Path relative to the repository root
  pub fn path(&self) -> &Path {
    &self.rel_path
  }

  pub fn kind(&self) -> FormatKind {
    self.adapter.kind()
  }

  pub fn is_required(&self) -> bool {
    self.required
  }

  /// Current version, `None` when a keyed record is absent
  pub fn read(&self) -> RelResult<Option<String>> {
    self.adapter.read(&self.abs_path)
  }

  pub fn write(&self, version: &str) -> RelResult<()> {
    self.adapter.write(&self.abs_path, version)
  }
}

/// Ordered set of version locations; the canonical one is always present
pub struct VersionLocationRegistry {
  locations: Vec<VersionLocation>,
  canonical: usize,
}

impl VersionLocationRegistry {
  /// Resolve every configured location against `ctx.root`
  pub fn resolve(ctx: &ReleaseContext) -> RelResult<Self> {
    let canonical_label = ctx.config.canonical_label();
    let mut locations = Vec::with_capacity(ctx.config.locations.len());
    let mut canonical = None;

    for config in &ctx.config.locations {
      if !ctx.exists(&config.path) {
        if config.is_required() {
          return Err(RelError::Adapter(AdapterError::MissingFile {
            path: config.path.clone(),
          }));
        }
        tracing::debug!(location = %config.label(), "optional file not present, skipping");
        continue;
      }

      if config.label() == canonical_label {
        canonical = Some(locations.len());
      }
      let location = VersionLocation::resolve(ctx, config);
      tracing::debug!(location = %location.label(), kind = ?location.kind(), required = location.is_required(), "resolved");
      locations.push(location);
    }

    // Config validation guarantees the canonical location is required, so it
    // either resolved above or the missing file already failed.
    let canonical = canonical.ok_or_else(|| {
      RelError::message(format!("canonical location '{}' is not configured", canonical_label))
    })?;

    tracing::debug!(count = locations.len(), canonical = %canonical_label, "resolved version locations");
    Ok(Self { locations, canonical })
  }

  pub fn iter(&self) -> impl Iterator<Item = &VersionLocation> {
    self.locations.iter()
  }

  pub fn len(&self) -> usize {
    self.locations.len()
  }

  /// The location the canonical version is read from
  pub fn canonical(&self) -> &VersionLocation {
    &self.locations[self.canonical]
  }

  /// Distinct repository-relative files, in registry order
  pub fn files(&self) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for location in &self.locations {
      if !files.iter().any(|f| f == location.path()) {
        files.push(location.path().to_path_buf());
      }
    }
    files
  }
}
