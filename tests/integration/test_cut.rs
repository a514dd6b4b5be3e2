//! Integration tests for `relsync cut`

use crate::helpers::{TestRepo, git, run_relsync, run_relsync_env, run_relsync_raw, stderr, stdout};
use anyhow::Result;

#[test]
fn test_cut_commits_and_tags_locally() -> Result<()> {
  let repo = TestRepo::new()?;
  let before = repo.head()?;

  let output = run_relsync(&repo.path, &["cut", "1.1.0"])?;
  let out = stdout(&output);
  assert!(out.contains("Committed release version files and created tag v1.1.0."), "stdout: {}", out);
  assert!(out.contains("Tag v1.1.0 is local only. Push when ready:"));
  assert!(out.contains("git push origin HEAD && git push origin v1.1.0"));

  assert_ne!(repo.head()?, before);
  assert_eq!(repo.head_subject()?, "chore(release): v1.1.0");
  assert_eq!(repo.tags()?, vec!["v1.1.0"]);
  assert!(repo.staged_files()?.is_empty());

  // Annotated, with the fixed message
  let tag_type = git(&repo.path, &["cat-file", "-t", "v1.1.0"])?;
  assert_eq!(String::from_utf8_lossy(&tag_type.stdout).trim(), "tag");
  let message = git(&repo.path, &["tag", "-l", "--format=%(contents:subject)", "v1.1.0"])?;
  assert_eq!(String::from_utf8_lossy(&message.stdout).trim(), "Release v1.1.0");

  // The commit holds exactly the version files
  let changed = git(&repo.path, &["show", "--name-only", "--format=", "HEAD"])?;
  let mut changed: Vec<String> = String::from_utf8_lossy(&changed.stdout).lines().map(String::from).collect();
  changed.sort();
  assert_eq!(
    changed,
    vec![
      "package.json",
      "src-core/Cargo.lock",
      "src-core/Cargo.toml",
      "src-tauri/Cargo.lock",
      "src-tauri/Cargo.toml",
      "src-tauri/tauri.conf.json",
    ]
  );
  Ok(())
}

#[test]
fn test_cut_leaves_workflow_fix_unstaged() -> Result<()> {
  let repo = TestRepo::new()?;
  run_relsync(&repo.path, &["cut", "1.1.0"])?;

  // Only version locations are staged; the workflow edit waits in the work tree
  let status = git(&repo.path, &["status", "--porcelain"])?;
  assert_eq!(String::from_utf8_lossy(&status.stdout).trim(), "M .github/workflows/release.yml");
  Ok(())
}

#[test]
fn test_cut_push_updates_origin() -> Result<()> {
  let repo = TestRepo::with_origin()?;
  let origin = repo.origin.clone().ok_or_else(|| anyhow::anyhow!("origin not set"))?;

  let output = run_relsync(&repo.path, &["cut", "1.1.0", "--push"])?;
  assert!(stdout(&output).contains("Pushed commit and tag v1.1.0 to origin."));

  let head = repo.head()?;
  let remote_main = git(&origin, &["rev-parse", "refs/heads/main"])?;
  assert_eq!(String::from_utf8_lossy(&remote_main.stdout).trim(), head);
  git(&origin, &["rev-parse", "-q", "--verify", "refs/tags/v1.1.0"])?;
  Ok(())
}

#[test]
fn test_cut_rejects_existing_tag() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["tag", "-a", "v1.2.3", "-m", "older release"])?;
  let before = repo.head()?;

  let output = run_relsync_raw(&repo.path, &["cut", "1.2.3"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Tag already exists: v1.2.3"), "stderr: {}", stderr(&output));

  assert_eq!(repo.head()?, before);
  assert!(repo.staged_files()?.is_empty());
  Ok(())
}

#[test]
fn test_cut_twice_does_not_duplicate_commit() -> Result<()> {
  let repo = TestRepo::new()?;
  run_relsync(&repo.path, &["cut", "1.1.0"])?;
  let released = repo.head()?;

  // Immediate re-run: the tag pre-flight stops it
  let output = run_relsync_raw(&repo.path, &["cut", "1.1.0"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Tag already exists: v1.1.0"));

  // With the tag gone the index stays empty, so there is nothing to commit
  git(&repo.path, &["tag", "-d", "v1.1.0"])?;
  let output = run_relsync_raw(&repo.path, &["cut", "1.1.0"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr(&output).contains("No staged release version changes found."),
    "stderr: {}",
    stderr(&output)
  );

  assert_eq!(repo.head()?, released);
  Ok(())
}

#[test]
fn test_cut_rejects_malformed_version() -> Result<()> {
  let repo = TestRepo::new()?;
  let before = repo.tree_contents()?;

  let output = run_relsync_raw(&repo.path, &["cut", "v1.2.3"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Use bare version without 'v'"));
  assert_eq!(repo.tree_contents()?, before);
  assert!(repo.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_cut_push_failure_keeps_local_release() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["remote", "add", "origin", "/nonexistent/relsync-origin.git"])?;

  let output = run_relsync_raw(&repo.path, &["cut", "1.1.0", "--push"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("exist locally"), "stderr: {}", stderr(&output));

  assert_eq!(repo.head_subject()?, "chore(release): v1.1.0");
  assert_eq!(repo.tags()?, vec!["v1.1.0"]);
  Ok(())
}

#[test]
fn test_cut_takes_identity_from_environment() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["config", "--unset", "user.name"])?;
  git(&repo.path, &["config", "--unset", "user.email"])?;
  // No guessing from the host name; identity must come from somewhere explicit
  git(&repo.path, &["config", "user.useConfigOnly", "true"])?;

  let home_dir = tempfile::TempDir::new()?;
  let home = home_dir.path().to_string_lossy().to_string();
  let output = run_relsync_env(
    &repo.path,
    &["cut", "1.1.0"],
    &[
      ("HOME", &home),
      ("XDG_CONFIG_HOME", &home),
      ("GIT_CONFIG_NOSYSTEM", "1"),
      ("GIT_AUTHOR_NAME", "Release Bot"),
      ("GIT_AUTHOR_EMAIL", "release-bot@example.com"),
      ("GIT_COMMITTER_NAME", "Release Bot"),
      ("GIT_COMMITTER_EMAIL", "release-bot@example.com"),
    ],
  )?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let author = git(&repo.path, &["log", "-1", "--format=%an <%ae>"])?;
  assert_eq!(String::from_utf8_lossy(&author.stdout).trim(), "Release Bot <release-bot@example.com>");
  let tagger = git(&repo.path, &["tag", "-l", "--format=%(taggername)", "v1.1.0"])?;
  assert_eq!(String::from_utf8_lossy(&tagger.stdout).trim(), "Release Bot");
  Ok(())
}

#[test]
fn test_cut_usage_errors_exit_one() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_relsync_raw(dir.path(), &["cut"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("<X.Y.Z>"), "stderr: {}", stderr(&output));

  let output = run_relsync_raw(dir.path(), &["cut", "--help"])?;
  assert_eq!(output.status.code(), Some(0));
  assert!(stdout(&output).contains("--push"));
  Ok(())
}
