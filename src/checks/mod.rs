//! Release invariants beyond version equality
//!
//! All invariants implement the [`Invariant`] trait. The validator evaluates them
//! after the version rules; the aligner calls `fix` on each in registry order.
//!
//! # Built-in Invariants
//!
//! - **workflow**: `v*.*.*` tag trigger, non-draft publishing, gated metadata validation step
//! - **packaging**: updater artifact flag and the single canonical update endpoint

mod packaging;
mod trait_def;
mod workflow;

pub use packaging::PackagingInvariants;
pub use trait_def::{Invariant, Issue};
pub use workflow::WorkflowInvariants;

/// Invariants in evaluation and fix order
pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
  vec![Box::new(WorkflowInvariants), Box::new(PackagingInvariants)]
}
