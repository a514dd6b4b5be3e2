//! Format adapters: read and write a version value inside one file format
//!
//! Each adapter only knows how to find and splice the version in a document's
//! text. Everything else in the file is left byte-for-byte alone, except for
//! object-field documents which are re-serialized (key order preserved).
//!
//! Currently supports:
//! - object-field: a string field in a JSON document (`package.json`, `tauri.conf.json`)
//! - section-field: `version = "..."` inside a manifest section (`Cargo.toml` `[package]`)
//! - keyed-record: `version = "..."` inside a named repeated record (`Cargo.lock` `[[package]]`)

use crate::core::config::{FormatKind, LocationConfig};
use crate::core::error::RelResult;
use crate::utils::{read_text, write_text};
use std::path::Path;

pub mod json;
pub mod record;
pub mod section;

pub use json::ObjectFieldAdapter;
pub use record::KeyedRecordAdapter;
pub use section::SectionFieldAdapter;

/// Format adapter trait
///
/// Implementations provide the pure text operations; file I/O is shared.
/// `path` is only used to name the file in errors.
pub trait FormatAdapter {
  /// Which format this adapter handles
  fn kind(&self) -> FormatKind;

  /// Extract the version from `content`
  ///
  /// `Ok(None)` means the value is legitimately absent (keyed records only).
  fn extract(&self, path: &Path, content: &str) -> RelResult<Option<String>>;

  /// Return `content` with the version replaced by `version`
  ///
  /// `Ok(None)` means there was nothing to replace and the file must be left as is.
  fn replace(&self, path: &Path, content: &str, version: &str) -> RelResult<Option<String>>;

  /// Read the version stored in `path`
  fn read(&self, path: &Path) -> RelResult<Option<String>> {
    let content = read_text(path)?;
    self.extract(path, &content)
  }

  /// Write `version` into `path`
  ///
  /// Succeeds without touching the file when the anchor was found but the bytes
  /// would not change.
  fn write(&self, path: &Path, version: &str) -> RelResult<()> {
    let content = read_text(path)?;
    match self.replace(path, &content, version)? {
      Some(updated) if updated != content => write_text(path, &updated),
      Some(_) => Ok(()),
      None => {
        tracing::debug!(path = %path.display(), "record not present, leaving file untouched");
        Ok(())
      }
    }
  }
}

/// Build the adapter for a configured location
pub fn adapter_for(location: &LocationConfig) -> Box<dyn FormatAdapter> {
  match location.format {
    FormatKind::ObjectField => Box::new(ObjectFieldAdapter::new(&location.field)),
    FormatKind::SectionField => Box::new(SectionFieldAdapter::new(
      location.section.as_deref().unwrap_or(section::DEFAULT_SECTION),
      &location.field,
    )),
    FormatKind::KeyedRecord => Box::new(KeyedRecordAdapter::new(
      location.marker.as_deref().unwrap_or(record::DEFAULT_MARKER),
      location.record.as_deref().unwrap_or_default(),
      &location.field,
    )),
  }
}
