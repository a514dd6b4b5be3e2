//! Release operations for SystemGit (stage, commit, tag, push)

use super::ReleaseVcs;
use super::system_git::SystemGit;
use crate::core::error::{GitError, RelError, RelResult};
use crate::utils::path_to_git_format;
use std::path::PathBuf;

impl ReleaseVcs for SystemGit {
  fn tag_exists(&self, tag: &str) -> RelResult<bool> {
    let refname = format!("refs/tags/{}", tag);
    let output = self.run(&["rev-parse", "-q", "--verify", &refname])?;

    if output.status.success() {
      return Ok(true);
    }

    // `-q --verify` exits 1 silently for a missing ref; anything else is a real failure
    let stderr = String::from_utf8_lossy(&output.stderr);
    if output.status.code() == Some(1) && stderr.trim().is_empty() {
      return Ok(false);
    }

    Err(RelError::Git(GitError::CommandFailed {
      command: format!("git rev-parse -q --verify {}", refname),
      stderr: stderr.to_string(),
    }))
  }

  fn stage(&self, paths: &[PathBuf]) -> RelResult<()> {
    if paths.is_empty() {
      return Ok(());
    }

    let paths: Vec<String> = paths.iter().map(|p| path_to_git_format(p)).collect();
    let mut args = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));

    self.run_checked(&args)?;
    Ok(())
  }

  fn staged_files(&self) -> RelResult<Vec<String>> {
    let output = self.run_checked(&["diff", "--cached", "--name-only"])?;

    let files = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();

    Ok(files)
  }

  fn commit(&self, message: &str) -> RelResult<()> {
    self.run_checked(&["commit", "-m", message])?;
    Ok(())
  }

  fn create_annotated_tag(&self, tag: &str, message: &str) -> RelResult<()> {
    self.run_checked(&["tag", "-a", tag, "-m", message])?;
    Ok(())
  }

  fn push_head(&self, remote: &str) -> RelResult<()> {
    push(self, remote, "HEAD")
  }

  fn push_tag(&self, remote: &str, tag: &str) -> RelResult<()> {
    push(self, remote, &format!("refs/tags/{}", tag))
  }
}

fn push(git: &SystemGit, remote: &str, refspec: &str) -> RelResult<()> {
  let output = git.run(&["push", remote, refspec])?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(RelError::Git(GitError::PushFailed {
      remote: remote.to_string(),
      refspec: refspec.to_string(),
      reason: stderr.to_string(),
    }));
  }

  tracing::debug!(remote, refspec, "pushed");
  Ok(())
}
