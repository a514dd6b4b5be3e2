//! `relsync prepare <x.y.z>` - Align every version location and invariant to a new release

use super::print_snapshot;
use crate::core::context::ReleaseContext;
use crate::core::error::RelResult;
use crate::release::{ReleaseOrchestrator, ReleaseVersion};

/// Run the prepare command
pub fn run_prepare(ctx: &ReleaseContext, version: &str) -> RelResult<()> {
  let version = ReleaseVersion::parse(version)?;
  let report = ReleaseOrchestrator::new(ctx).prepare(&version)?;

  println!("Release metadata check passed.");
  print_snapshot(&report.snapshot);
  println!();
  println!("Prepared release {}.", version);
  println!("Next steps:");
  println!("  1. Review the changes: git diff");
  println!("  2. Commit and tag: relsync cut {} [--push]", version);

  Ok(())
}
