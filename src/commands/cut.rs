//! `relsync cut <x.y.z>` - Prepare, commit and tag a release
//!
//! Pushing is opt-in (`--push`); without it the tag stays local and the exact
//! push commands are printed.

use super::print_snapshot;
use crate::core::context::ReleaseContext;
use crate::core::error::RelResult;
use crate::core::vcs::SystemGit;
use crate::release::{ReleaseOrchestrator, ReleaseVersion};

/// Run the cut command
pub fn run_cut(ctx: &ReleaseContext, version: &str, push: bool) -> RelResult<()> {
  let version = ReleaseVersion::parse(version)?;
  let git = SystemGit::open(&ctx.root)?;
  tracing::debug!(work_tree = %git.work_tree().display(), "opened repository");

  let outcome = ReleaseOrchestrator::new(ctx).cut(&git, &version, push)?;
  tracing::debug!(files = ?outcome.staged, "release commit created");

  println!("Release metadata check passed.");
  print_snapshot(&outcome.report.snapshot);
  println!();
  println!("Committed release version files and created tag {}.", outcome.tag);

  match &outcome.pushed_to {
    Some(remote) => println!("Pushed commit and tag {} to {}.", outcome.tag, remote),
    None => {
      let remote = &ctx.config.git.remote;
      println!("Tag {} is local only. Push when ready:", outcome.tag);
      println!("  git push {} HEAD && git push {} {}", remote, remote, outcome.tag);
    }
  }

  Ok(())
}
