//! Section-field adapter for semi-structured manifests
//!
//! Finds the first `field = "value"` line inside a section (between the section
//! marker line and the next `[` header line) and splices only the quoted value.
//! Quoting, spacing, comments and every other byte are left untouched. Lines
//! inside multi-line strings and arrays are never taken for headers or fields.

use super::FormatAdapter;
use crate::core::config::FormatKind;
use crate::core::error::{AdapterError, RelError, RelResult};
use regex::Regex;
use std::ops::Range;
use std::path::Path;

/// Section used when a location does not name one
pub const DEFAULT_SECTION: &str = "[package]";

pub struct SectionFieldAdapter {
  section: String,
  field: String,
}

impl SectionFieldAdapter {
  pub fn new(section: &str, field: &str) -> Self {
    Self {
      section: section.to_string(),
      field: field.to_string(),
    }
  }

  /// Byte range of the quoted value, without the quotes
  fn locate(&self, path: &Path, content: &str) -> RelResult<Range<usize>> {
    let assignment = field_pattern(&self.field)?;
    let mut in_section = false;

    for (offset, line) in top_level_lines(content) {
      if is_header(line) {
        if in_section {
          break;
        }
        in_section = marker_text(line) == self.section;
        continue;
      }
      if in_section && let Some(value) = assignment.captures(line).and_then(|caps| caps.get(1)) {
        return Ok(offset + value.start()..offset + value.end());
      }
    }

    Err(self.not_found(path))
  }

  fn not_found(&self, path: &Path) -> RelError {
    RelError::Adapter(AdapterError::PatternNotFound {
      path: path.to_path_buf(),
      pattern: format!("{}.{}", self.section, self.field),
    })
  }
}

impl FormatAdapter for SectionFieldAdapter {
  fn kind(&self) -> FormatKind {
    FormatKind::SectionField
  }

  fn extract(&self, path: &Path, content: &str) -> RelResult<Option<String>> {
    let range = self.locate(path, content)?;
    Ok(Some(content[range].to_string()))
  }

  fn replace(&self, path: &Path, content: &str, version: &str) -> RelResult<Option<String>> {
    let range = self.locate(path, content)?;
    let mut updated = String::with_capacity(content.len() + version.len());
    updated.push_str(&content[..range.start]);
    updated.push_str(version);
    updated.push_str(&content[range.end..]);
    Ok(Some(updated))
  }
}

/// `[table]` or `[[array]]` header line
pub(crate) fn is_header(line: &str) -> bool {
  line.trim_start().starts_with('[')
}

/// Header line without its trailing comment and whitespace
pub(crate) fn marker_text(line: &str) -> &str {
  line.split_once('#').map_or(line, |(head, _)| head).trim()
}

/// Lines of `text` that begin outside any multi-line string or array, with their byte offsets
pub(crate) fn top_level_lines(text: &str) -> Vec<(usize, &str)> {
  let mut lines = Vec::new();
  let mut nesting = Nesting::default();
  let mut offset = 0;

  for line in text.split_inclusive('\n') {
    if nesting.is_top_level() {
      lines.push((offset, line));
      // Header brackets are not arrays
      if !is_header(line) {
        nesting.scan(line);
      }
    } else {
      nesting.scan(line);
    }
    offset += line.len();
  }

  lines
}

/// Open multi-line constructs carried from one line to the next
#[derive(Default)]
struct Nesting {
  /// Closing delimiter of an open `"""` or `'''` string
  string: Option<&'static [u8]>,
  arrays: usize,
}

impl Nesting {
  fn is_top_level(&self) -> bool {
    self.string.is_none() && self.arrays == 0
  }

  fn scan(&mut self, line: &str) {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
      if let Some(close) = self.string {
        if close == b"\"\"\"" && bytes[i] == b'\\' {
          i += 2;
        } else if bytes[i..].starts_with(close) {
          self.string = None;
          i += close.len();
        } else {
          i += 1;
        }
        continue;
      }

      match bytes[i] {
        b'#' => return,
        b'"' if bytes[i..].starts_with(b"\"\"\"") => {
          self.string = Some(b"\"\"\"");
          i += 3;
        }
        b'\'' if bytes[i..].starts_with(b"'''") => {
          self.string = Some(b"'''");
          i += 3;
        }
        quote @ (b'"' | b'\'') => {
          i += 1;
          while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
            if quote == b'"' && bytes[i] == b'\\' {
              i += 1;
            }
            i += 1;
          }
          i += 1;
        }
        b'[' => {
          self.arrays += 1;
          i += 1;
        }
        b']' => {
          self.arrays = self.arrays.saturating_sub(1);
          i += 1;
        }
        _ => i += 1,
      }
    }
  }
}

/// `field = "value"` at the start of a line, capturing the value
pub(crate) fn field_pattern(field: &str) -> RelResult<Regex> {
  Regex::new(&format!(r#"^[ \t]*{}[ \t]*=[ \t]*"([^"\n]*)""#, regex::escape(field)))
    .map_err(|e| RelError::message(format!("Invalid field name '{}': {}", field, e)))
}
