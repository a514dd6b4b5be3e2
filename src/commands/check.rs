//! `relsync check` - Validate release metadata
//!
//! Supports:
//! - `--version <x.y.z>` to require every location to carry that version
//! - `--tag <vx.y.z>` to require the tag to match the (expected or canonical) version
//! - `--fix` to align the tree first (to `--version`, or the canonical location's value)
//! - `--json` for machine-readable output

use super::print_snapshot;
use crate::checks::Issue;
use crate::core::context::ReleaseContext;
use crate::core::error::{RelError, RelResult};
use crate::release::{CheckOptions, CheckReport, ReleaseOrchestrator, ReleaseVersion};
use serde::Serialize;
use serde_json::{Map, Value};

/// `--json` output
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
  passed: bool,
  issues: &'a [Issue],
  versions: Map<String, Value>,
}

impl<'a> JsonReport<'a> {
  fn from_report(report: &'a CheckReport) -> Self {
    let versions = report
      .snapshot
      .iter()
      .map(|e| {
        let version = e.version.clone().map(Value::String).unwrap_or(Value::Null);
        (e.label.clone(), version)
      })
      .collect();

    Self {
      passed: report.passed(),
      issues: &report.issues,
      versions,
    }
  }
}

/// Run the check command
pub fn run_check(
  ctx: &ReleaseContext,
  version: Option<String>,
  tag: Option<String>,
  fix: bool,
  json: bool,
) -> RelResult<()> {
  let version = version.as_deref().map(ReleaseVersion::parse).transpose()?;
  let options = CheckOptions { fix, version, tag };

  let report = ReleaseOrchestrator::new(ctx).check(&options)?;

  if json {
    let rendered = serde_json::to_string_pretty(&JsonReport::from_report(&report))
      .map_err(|e| RelError::message(format!("Serialization error: {}", e)))?;
    println!("{}", rendered);
  } else if report.passed() {
    println!("Release metadata check passed.");
    print_snapshot(&report.snapshot);
  } else {
    println!("Observed versions:");
    print_snapshot(&report.snapshot);
  }

  report.ensure_passed().map(|_| ())
}
