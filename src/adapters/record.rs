//! Keyed-record adapter for lock files
//!
//! A lock file is a sequence of records, each starting at a marker line
//! (`[[package]]`) and carrying a `name = "..."` line followed later by the
//! value line (`version = "..."`). Lock files are regenerated by other tools and
//! may lack any given record, so a missing record reads as absent and writes
//! as a no-op.

use super::FormatAdapter;
use super::section::{field_pattern, is_header, marker_text, top_level_lines};
use crate::core::config::FormatKind;
use crate::core::error::RelResult;
use std::ops::Range;
use std::path::Path;

/// Record marker used when a location does not name one
pub const DEFAULT_MARKER: &str = "[[package]]";

pub struct KeyedRecordAdapter {
  marker: String,
  record: String,
  field: String,
}

/// Where the scan is relative to the wanted record
enum Position {
  Outside,
  /// Inside a record whose name line has not been seen yet
  Unnamed,
  Matched,
}

impl KeyedRecordAdapter {
  pub fn new(marker: &str, record: &str, field: &str) -> Self {
    Self {
      marker: marker.to_string(),
      record: record.to_string(),
      field: field.to_string(),
    }
  }

  /// Byte range of the record's quoted value, if the record exists
  fn locate(&self, content: &str) -> RelResult<Option<Range<usize>>> {
    let name = field_pattern("name")?;
    let value = field_pattern(&self.field)?;
    let mut position = Position::Outside;

    for (offset, line) in top_level_lines(content) {
      if is_header(line) {
        // The first record with the wanted name decides
        if matches!(position, Position::Matched) {
          return Ok(None);
        }
        position = if marker_text(line) == self.marker {
          Position::Unnamed
        } else {
          Position::Outside
        };
        continue;
      }

      match position {
        Position::Outside => {}
        Position::Unnamed => {
          if let Some(key) = name.captures(line).and_then(|caps| caps.get(1)) {
            position = if key.as_str() == self.record {
              Position::Matched
            } else {
              Position::Outside
            };
          }
        }
        Position::Matched => {
          if let Some(found) = value.captures(line).and_then(|caps| caps.get(1)) {
            return Ok(Some(offset + found.start()..offset + found.end()));
          }
        }
      }
    }

    Ok(None)
  }
}

impl FormatAdapter for KeyedRecordAdapter {
  fn kind(&self) -> FormatKind {
    FormatKind::KeyedRecord
  }

  fn extract(&self, _path: &Path, content: &str) -> RelResult<Option<String>> {
    Ok(self.locate(content)?.map(|range| content[range].to_string()))
  }

  fn replace(&self, _path: &Path, content: &str, version: &str) -> RelResult<Option<String>> {
    let Some(range) = self.locate(content)? else {
      return Ok(None);
    };
    let mut updated = String::with_capacity(content.len() + version.len());
    updated.push_str(&content[..range.start]);
    updated.push_str(version);
    updated.push_str(&content[range.end..]);
    Ok(Some(updated))
  }
}
