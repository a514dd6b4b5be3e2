//! CLI commands for relsync
//!
//! - **check**: validate release metadata, optionally aligning it first
//! - **prepare**: align everything to a new version and require a clean check
//! - **cut**: prepare, then commit, tag and optionally push the release
//!
//! All commands accept `&ReleaseContext` so the config is loaded once in `main`.

pub mod check;
pub mod cut;
pub mod prepare;

pub use check::run_check;
pub use cut::run_cut;
pub use prepare::run_prepare;

use crate::release::validator::SnapshotEntry;

/// `label: version` lines for every resolved location
fn print_snapshot(snapshot: &[SnapshotEntry]) {
  for entry in snapshot {
    println!("{}: {}", entry.label, entry.version.as_deref().unwrap_or("(absent)"));
  }
}
