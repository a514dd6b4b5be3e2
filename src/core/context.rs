//! Repository context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ReleaseContext::build() -> &ReleaseContext
//!   |
//!   v
//! validator / aligner / orchestrator:
//!   fn run(ctx: &ReleaseContext)
//! ```
//!
//! Every file path in relsync is resolved against `ctx.root`; nothing reads the
//! process working directory after `main`.

use crate::core::config::RelsyncConfig;
use crate::core::error::RelResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Repository root plus the loaded relsync configuration.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Repository root directory
  pub root: PathBuf,

  /// Parsed relsync.toml
  pub config: Arc<RelsyncConfig>,
}

impl ReleaseContext {
  /// Build context from a root directory, loading relsync.toml.
  pub fn build(root: &Path) -> RelResult<Self> {
    let config = RelsyncConfig::load(root)?;
    Ok(Self::with_config(root, config))
  }

  /// Build context from an already-parsed config
  pub fn with_config(root: &Path, config: RelsyncConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      config: Arc::new(config),
    }
  }

  /// Absolute path of a repository-relative file
  pub fn path(&self, rel: &Path) -> PathBuf {
    self.root.join(rel)
  }

  /// Whether a repository-relative file exists
  pub fn exists(&self, rel: &Path) -> bool {
    self.path(rel).is_file()
  }
}
