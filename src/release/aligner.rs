//! Alignment: rewrite every location and invariant to canonical values
//!
//! Never creates files. Running it twice with the same version leaves every
//! byte as the first run left it.

use super::locations::VersionLocationRegistry;
use super::version::ReleaseVersion;
use crate::checks::{Invariant, default_invariants};
use crate::core::context::ReleaseContext;
use crate::core::error::RelResult;

pub struct Aligner<'a> {
  ctx: &'a ReleaseContext,
  registry: &'a VersionLocationRegistry,
  invariants: Vec<Box<dyn Invariant>>,
}

impl<'a> Aligner<'a> {
  pub fn new(ctx: &'a ReleaseContext, registry: &'a VersionLocationRegistry) -> Self {
    Self {
      ctx,
      registry,
      invariants: default_invariants(),
    }
  }

  /// Write `version` to every resolved location, then fix every invariant
  pub fn fix_to_version(&self, version: &ReleaseVersion) -> RelResult<()> {
    tracing::info!(version = %version, "aligning release metadata");

    for location in self.registry.iter() {
      location.write(version.as_str())?;
    }

    for invariant in &self.invariants {
      tracing::debug!(invariant = invariant.name(), "fixing invariant");
      invariant.fix(self.ctx)?;
    }

    Ok(())
  }
}
