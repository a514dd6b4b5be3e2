//! Object-field adapter for JSON documents
//!
//! The version is a top-level string field. Writing re-serializes the whole
//! document with 2-space indentation, keeping key order, plus a trailing newline.

use super::FormatAdapter;
use crate::core::config::FormatKind;
use crate::core::error::{AdapterError, RelError, RelResult};
use serde_json::Value;
use std::path::Path;

pub struct ObjectFieldAdapter {
  field: String,
}

impl ObjectFieldAdapter {
  pub fn new(field: &str) -> Self {
    Self {
      field: field.to_string(),
    }
  }

  fn missing_field(&self, path: &Path) -> RelError {
    RelError::Adapter(AdapterError::MissingField {
      path: path.to_path_buf(),
      field: self.field.clone(),
    })
  }
}

impl FormatAdapter for ObjectFieldAdapter {
  fn kind(&self) -> FormatKind {
    FormatKind::ObjectField
  }

  fn extract(&self, path: &Path, content: &str) -> RelResult<Option<String>> {
    let doc = parse_document(path, content)?;
    match doc.get(&self.field).and_then(Value::as_str) {
      Some(version) => Ok(Some(version.to_string())),
      None => Err(self.missing_field(path)),
    }
  }

  fn replace(&self, path: &Path, content: &str, version: &str) -> RelResult<Option<String>> {
    let mut doc = parse_document(path, content)?;
    // Already aligned: keep the file's own formatting
    if doc.get(&self.field).and_then(Value::as_str) == Some(version) {
      return Ok(Some(content.to_string()));
    }
    match doc.get_mut(&self.field) {
      Some(slot) if slot.is_string() => *slot = Value::String(version.to_string()),
      _ => return Err(self.missing_field(path)),
    }
    Ok(Some(render_document(&doc)?))
  }
}

/// Parse a JSON document, naming the file on failure
pub fn parse_document(path: &Path, content: &str) -> RelResult<Value> {
  serde_json::from_str(content).map_err(|e| {
    RelError::Adapter(AdapterError::Parse {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })
  })
}

/// Render a JSON document the way it is stored on disk
pub fn render_document(doc: &Value) -> RelResult<String> {
  let mut rendered = serde_json::to_string_pretty(doc)?;
  rendered.push('\n');
  Ok(rendered)
}
