//! Integration tests for `relsync check`

use crate::helpers::{TestRepo, manifest, run_relsync, run_relsync_raw, stderr, stdout};
use anyhow::Result;

#[test]
fn test_check_reports_unconfigured_workflow_and_packaging() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_relsync_raw(&repo.path, &["check"])?;
  assert_eq!(output.status.code(), Some(1));

  let err = stderr(&output);
  assert!(err.contains("Release check failed:"), "stderr: {}", err);
  assert!(err.contains("- .github/workflows/release.yml must use push.tags = \"v*.*.*\""));
  assert!(err.contains("- .github/workflows/release.yml must set releaseDraft: false"));
  assert!(err.contains("- src-tauri/tauri.conf.json missing bundle.createUpdaterArtifacts=v1Compatible"));
  assert!(err.contains("relsync check --fix --version <x.y.z> --tag v<x.y.z>"));
  assert!(err.contains("relsync prepare <x.y.z>"));

  // The snapshot is still printed
  assert!(stdout(&output).contains("package.json: 1.0.0"));
  Ok(())
}

#[test]
fn test_check_fix_aligns_to_canonical_version() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("src-tauri/Cargo.toml", &manifest("app", "0.9.0"))?;

  let output = run_relsync(&repo.path, &["check", "--fix"])?;
  let out = stdout(&output);
  assert!(out.starts_with("Release metadata check passed.\n"), "stdout: {}", out);
  assert!(out.contains("src-tauri/Cargo.toml: 1.0.0"));
  assert!(out.contains("src-tauri/Cargo.lock (app): 1.0.0"));
  assert_eq!(repo.read_file("src-tauri/Cargo.toml")?, manifest("app", "1.0.0"));

  // Fixed tree now passes without --fix
  run_relsync(&repo.path, &["check", "--version", "1.0.0", "--tag", "v1.0.0"])?;
  Ok(())
}

#[test]
fn test_check_fix_is_idempotent() -> Result<()> {
  let repo = TestRepo::new()?;

  run_relsync(&repo.path, &["check", "--fix"])?;
  let first = repo.tree_contents()?;
  run_relsync(&repo.path, &["check", "--fix"])?;
  assert_eq!(repo.tree_contents()?, first);
  Ok(())
}

#[test]
fn test_check_mismatch_names_every_location() -> Result<()> {
  let repo = TestRepo::new()?;
  run_relsync(&repo.path, &["check", "--fix"])?;
  repo.write("src-core/Cargo.toml", &manifest("app_core", "1.0.1"))?;

  let output = run_relsync_raw(&repo.path, &["check"])?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(
    err.contains("- Version mismatch across files: package.json=1.0.0, src-core/Cargo.toml=1.0.1, src-core/Cargo.lock (app_core)=1.0.0"),
    "stderr: {}",
    err
  );
  assert_eq!(err.matches("Version mismatch").count(), 1);
  Ok(())
}

#[test]
fn test_check_tag_rule() -> Result<()> {
  let repo = TestRepo::new()?;
  run_relsync(&repo.path, &["check", "--fix", "--version", "2.3.0"])?;

  run_relsync(&repo.path, &["check", "--version", "2.3.0", "--tag", "v2.3.0"])?;

  let output = run_relsync_raw(&repo.path, &["check", "--version", "2.3.0", "--tag", "v2.3.1"])?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("- Tag mismatch: expected v2.3.0, got v2.3.1"), "stderr: {}", err);
  assert_eq!(err.matches("\n- ").count(), 1);
  Ok(())
}

#[test]
fn test_check_json_output() -> Result<()> {
  let repo = TestRepo::new()?;
  run_relsync(&repo.path, &["check", "--fix"])?;

  let output = run_relsync(&repo.path, &["check", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["passed"], true);
  assert_eq!(report["issues"].as_array().map(Vec::len), Some(0));
  assert_eq!(report["versions"]["src-tauri/tauri.conf.json"], "1.0.0");

  repo.write("package.json", "{\n  \"name\": \"app\",\n  \"version\": \"1.1.0\"\n}\n")?;
  let output = run_relsync_raw(&repo.path, &["check", "--json"])?;
  assert_eq!(output.status.code(), Some(1));
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["passed"], false);
  assert_eq!(report["issues"][0]["check"], "version-mismatch");
  Ok(())
}

#[test]
fn test_check_structural_failure() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("src-core/Cargo.toml", "[package]\nname = \"app_core\"\nversion.workspace = true\n")?;

  let output = run_relsync_raw(&repo.path, &["check", "--fix", "--version", "1.1.0"])?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Could not locate [package].version in"), "stderr: {}", err);
  assert!(err.contains("src-core/Cargo.toml"));
  Ok(())
}

#[test]
fn test_check_without_config() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::remove_file(repo.path.join("relsync.toml"))?;

  let output = run_relsync_raw(&repo.path, &["check"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("relsync.toml"));
  Ok(())
}

#[test]
fn test_root_flag() -> Result<()> {
  let repo = TestRepo::new()?;
  let elsewhere = tempfile::TempDir::new()?;
  let root = repo.path.to_string_lossy().to_string();

  let output = run_relsync(elsewhere.path(), &["--root", &root, "check", "--fix"])?;
  assert!(stdout(&output).contains("Release metadata check passed."));
  Ok(())
}
