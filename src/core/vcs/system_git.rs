//! System git backend - shells out to the `git` binary
//!
//! Commands run with a filtered environment and a fixed set of `-c` overrides
//! so user configuration cannot change the output we parse. Identity,
//! credential and `GIT_CONFIG_*` variables are passed through.

use crate::core::error::{GitError, RelError, RelResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables passed through to git; everything else is cleared
const ENV_WHITELIST: &[&str] = &[
  "PATH",
  "HOME",
  "USERPROFILE",
  "XDG_CONFIG_HOME",
  "SSH_AUTH_SOCK",
  "GIT_SSH",
  "GIT_SSH_COMMAND",
  "GNUPGHOME",
  // Commit and tag identity
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
  "EMAIL",
  // Push credentials
  "GIT_ASKPASS",
  "SSH_ASKPASS",
  "GIT_TERMINAL_PROMPT",
  "GCM_INTERACTIVE",
];

/// Prefixes passed through as a family (`GIT_CONFIG_COUNT`, `GIT_CONFIG_KEY_0`, ...)
const ENV_PREFIX_WHITELIST: &[&str] = &["GIT_CONFIG_"];

fn passes_through(key: &str) -> bool {
  ENV_WHITELIST.contains(&key) || ENV_PREFIX_WHITELIST.iter().any(|prefix| key.starts_with(prefix))
}

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> RelResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(RelError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(RelError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root as reported by git
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables except identity, credential and config ones
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    cmd.envs(std::env::vars_os().filter(|(key, _)| key.to_str().is_some_and(passes_through)));

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }

  /// Run `git <args>` and fail with the verbatim stderr on a non-zero exit
  pub(crate) fn run_checked(&self, args: &[&str]) -> RelResult<Output> {
    let output = self.run(args)?;

    if !output.status.success() {
      return Err(RelError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(output)
  }

  /// Run `git <args>` and hand back the raw output
  pub(crate) fn run(&self, args: &[&str]) -> RelResult<Output> {
    tracing::debug!(command = %format!("git {}", args.join(" ")), "running git");

    self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.first().copied().unwrap_or_default()))
  }
}
