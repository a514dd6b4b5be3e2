//! Utility functions for cross-platform path handling

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Read a repository file, naming it in the error
pub fn read_text(path: &Path) -> crate::core::error::RelResult<String> {
  use crate::core::error::ResultExt;
  std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write a repository file, naming it in the error
pub fn write_text(path: &Path, content: &str) -> crate::core::error::RelResult<()> {
  use crate::core::error::ResultExt;
  tracing::debug!(path = %path.display(), bytes = content.len(), "writing file");
  std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
