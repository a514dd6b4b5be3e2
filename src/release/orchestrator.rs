//! Release state machine: check, prepare, cut
//!
//! ```text
//! check:   Idle -> Validating -> (Fixing -> Validating) -> Pass | Fail
//! prepare: check { fix, version, tag: v<version> }, Fail is an error
//! cut:     prepare -> tag pre-flight -> stage -> commit -> tag -> (push)
//! ```
//!
//! Every step is attempted once and the first failure stops the pipeline.
//! Nothing is rolled back: files edited by `prepare` stay edited, and a release
//! commit stays in place if tagging or pushing fails afterwards.

use super::aligner::Aligner;
use super::locations::VersionLocationRegistry;
use super::validator::{CheckReport, ConsistencyValidator};
use super::version::{ReleaseTag, ReleaseVersion};
use crate::core::context::ReleaseContext;
use crate::core::error::{RelError, RelResult, ReleaseError};
use crate::core::vcs::ReleaseVcs;
use std::path::PathBuf;

/// Flags accepted by `check`
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
  /// Align the tree before validating
  pub fix: bool,
  /// Expected version (with `fix`: the version to align to)
  pub version: Option<ReleaseVersion>,
  /// Expected tag, compared after trimming
  pub tag: Option<String>,
}

/// What `cut` did
#[derive(Debug)]
pub struct CutOutcome {
  pub tag: ReleaseTag,
  pub report: CheckReport,
  /// Files handed to the index
  pub staged: Vec<PathBuf>,
  /// Remote the commit and tag were pushed to, if pushed
  pub pushed_to: Option<String>,
}

pub struct ReleaseOrchestrator<'a> {
  ctx: &'a ReleaseContext,
}

impl<'a> ReleaseOrchestrator<'a> {
  pub fn new(ctx: &'a ReleaseContext) -> Self {
    Self { ctx }
  }

  /// Validate (and optionally align) the tree
  ///
  /// A failing report is returned as `Ok`; the caller decides how to surface it.
  pub fn check(&self, options: &CheckOptions) -> RelResult<CheckReport> {
    let registry = VersionLocationRegistry::resolve(self.ctx)?;
    self.check_with(&registry, options)
  }

  /// Align the tree to `version` and require a clean check against `v<version>`
  pub fn prepare(&self, version: &ReleaseVersion) -> RelResult<CheckReport> {
    let registry = VersionLocationRegistry::resolve(self.ctx)?;
    self.prepare_with(&registry, version)
  }

  /// Prepare, then commit and tag the release (and push when asked)
  pub fn cut(&self, vcs: &dyn ReleaseVcs, version: &ReleaseVersion, push: bool) -> RelResult<CutOutcome> {
    let registry = VersionLocationRegistry::resolve(self.ctx)?;
    let report = self.prepare_with(&registry, version)?;
    let tag = version.tag();

    if vcs.tag_exists(tag.as_str())? {
      return Err(RelError::Release(ReleaseError::TagAlreadyExists {
        tag: tag.to_string(),
      }));
    }

    let staged = registry.files();
    tracing::info!(files = staged.len(), "staging release files");
    vcs.stage(&staged)?;

    if vcs.staged_files()?.is_empty() {
      return Err(RelError::Release(ReleaseError::NoStagedChanges));
    }

    tracing::info!(%tag, "committing release");
    vcs.commit(&commit_message(version))?;

    tracing::info!(%tag, "creating annotated tag");
    vcs
      .create_annotated_tag(tag.as_str(), &tag_message(&tag))
      .map_err(|e| tag_failed(e, &tag))?;

    let mut pushed_to = None;
    if push {
      let remote = &self.ctx.config.git.remote;
      tracing::info!(%remote, %tag, "pushing release");
      vcs
        .push_head(remote)
        .and_then(|_| vcs.push_tag(remote, tag.as_str()))
        .map_err(|e| push_failed(e, &tag, remote))?;
      pushed_to = Some(remote.clone());
    }

    Ok(CutOutcome {
      tag,
      report,
      staged,
      pushed_to,
    })
  }

  fn check_with(&self, registry: &VersionLocationRegistry, options: &CheckOptions) -> RelResult<CheckReport> {
    let mut expected = options.version.clone();

    if options.fix {
      let canonical = match &options.version {
        Some(version) => version.clone(),
        None => self.observed_canonical(registry)?,
      };
      tracing::info!(version = %canonical, "fixing");
      Aligner::new(self.ctx, registry).fix_to_version(&canonical)?;
      expected = Some(canonical);
    }

    tracing::info!("validating");
    let report = ConsistencyValidator::new(self.ctx, registry).validate(expected.as_ref(), options.tag.as_deref())?;
    tracing::info!(passed = report.passed(), issues = report.issues.len(), "validation finished");
    Ok(report)
  }

  fn prepare_with(&self, registry: &VersionLocationRegistry, version: &ReleaseVersion) -> RelResult<CheckReport> {
    let options = CheckOptions {
      fix: true,
      version: Some(version.clone()),
      tag: Some(version.tag().to_string()),
    };
    self.check_with(registry, &options)?.ensure_passed()
  }

  /// The canonical location's current value, validated before anything is written
  fn observed_canonical(&self, registry: &VersionLocationRegistry) -> RelResult<ReleaseVersion> {
    let canonical = registry.canonical();
    let raw = canonical.read()?.ok_or_else(|| {
      RelError::message(format!("{} does not declare a version", canonical.label()))
    })?;
    ReleaseVersion::parse(&raw).map_err(|e| {
      RelError::with_help(
        format!("{} (read from {})", e, canonical.label()),
        "Pass the version to align to explicitly: relsync check --fix --version <x.y.z>",
      )
    })
  }
}

/// Commit message for a release
pub fn commit_message(version: &ReleaseVersion) -> String {
  format!("chore(release): {}", version.tag())
}

/// Annotated tag message for a release
pub fn tag_message(tag: &ReleaseTag) -> String {
  format!("Release {}", tag)
}

/// Tagging failed after the release commit was created
fn tag_failed(err: RelError, tag: &ReleaseTag) -> RelError {
  RelError::with_help(
    err.to_string(),
    format!(
      "The release commit exists and was not rolled back. Tag it by hand: git tag -a {} -m \"{}\"",
      tag,
      tag_message(tag)
    ),
  )
}

/// Pushing failed after the release commit and tag were created
fn push_failed(err: RelError, tag: &ReleaseTag, remote: &str) -> RelError {
  let help = err.help_message().unwrap_or_default();
  RelError::with_help(
    err.to_string(),
    format!(
      "The release commit and tag {} exist locally. Push them when ready: git push {} HEAD && git push {} {}\n{}",
      tag, remote, remote, tag, help
    )
    .trim_end()
    .to_string(),
  )
}
