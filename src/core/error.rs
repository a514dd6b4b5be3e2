//! Error types for relsync with contextual messages
//!
//! Structural problems (a manifest without the field we expect, a section that
//! cannot be found) abort the whole operation. Consistency problems are not
//! errors at this layer: they are collected as issues by the validator and only
//! become a [`ReleaseError::ChecksFailed`] once a command decides to fail on them.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Process exit code used for every failure
pub const EXIT_FAILURE: i32 = 1;

/// Main error type for relsync
#[derive(Debug)]
pub enum RelError {
  /// Configuration errors (relsync.toml)
  Config(ConfigError),

  /// Format adapter failures (structurally broken files)
  Adapter(AdapterError),

  /// Release state machine failures
  Release(ReleaseError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RelError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RelError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RelError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Categorized errors keep their variant so callers can still match on them;
  /// only free-form messages and raw I/O errors absorb the context.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RelError::Message { message, context, help } => RelError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      RelError::Io(err) => RelError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RelError::Config(e) => e.help_message(),
      RelError::Adapter(e) => e.help_message(),
      RelError::Release(e) => e.help_message(),
      RelError::Git(e) => e.help_message(),
      RelError::Message { help, .. } => help.clone(),
      RelError::Io(_) => None,
    }
  }
}

impl fmt::Display for RelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RelError::Config(e) => write!(f, "{}", e),
      RelError::Adapter(e) => write!(f, "{}", e),
      RelError::Release(e) => write!(f, "{}", e),
      RelError::Git(e) => write!(f, "{}", e),
      RelError::Io(e) => write!(f, "I/O error: {}", e),
      RelError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RelError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RelError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for RelError {
  fn from(err: io::Error) -> Self {
    RelError::Io(err)
  }
}

impl From<String> for RelError {
  fn from(msg: String) -> Self {
    RelError::message(msg)
  }
}

impl From<&str> for RelError {
  fn from(msg: &str) -> Self {
    RelError::message(msg)
  }
}

impl From<toml_edit::de::Error> for RelError {
  fn from(err: toml_edit::de::Error) -> Self {
    RelError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RelError {
  fn from(err: serde_json::Error) -> Self {
    RelError::message(format!("JSON error: {}", err))
  }
}

impl From<ConfigError> for RelError {
  fn from(err: ConfigError) -> Self {
    RelError::Config(err)
  }
}

impl From<AdapterError> for RelError {
  fn from(err: AdapterError) -> Self {
    RelError::Adapter(err)
  }
}

impl From<ReleaseError> for RelError {
  fn from(err: ReleaseError) -> Self {
    RelError::Release(err)
  }
}

impl From<GitError> for RelError {
  fn from(err: GitError) -> Self {
    RelError::Git(err)
  }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// No relsync.toml in any search location
  NotFound { root: PathBuf },

  /// Config parsed but violates a structural rule
  Invalid { path: PathBuf, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some(
        "Create relsync.toml at the repository root with a [packaging] section and at least one [[locations]] entry."
          .to_string(),
      ),
      ConfigError::Invalid { path, .. } => Some(format!("Fix the configuration in {}", path.display())),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => write!(
        f,
        "No relsync configuration found.\nSearched: {root}/relsync.toml, {root}/.relsync.toml, {root}/.config/relsync.toml",
        root = root.display()
      ),
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
    }
  }
}

/// Format adapter errors
///
/// These indicate a structurally broken repository and are never swallowed.
#[derive(Debug)]
pub enum AdapterError {
  /// Structured document lacks the field, or the field has the wrong type
  MissingField { path: PathBuf, field: String },

  /// Anchored text pattern could not be located
  PatternNotFound { path: PathBuf, pattern: String },

  /// A required version file does not exist
  MissingFile { path: PathBuf },

  /// Structured document could not be parsed
  Parse { path: PathBuf, reason: String },
}

impl AdapterError {
  fn help_message(&self) -> Option<String> {
    match self {
      AdapterError::PatternNotFound { path, .. } => Some(format!(
        "Make sure {} still declares its version inline (workspace-inherited versions are not supported).",
        path.display()
      )),
      AdapterError::MissingFile { .. } => {
        Some("Mark the location `required = false` in relsync.toml if the file is optional.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for AdapterError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AdapterError::MissingField { path, field } => {
        write!(f, "{} has no string field '{}'", path.display(), field)
      }
      AdapterError::PatternNotFound { path, pattern } => {
        write!(f, "Could not locate {} in {}", pattern, path.display())
      }
      AdapterError::MissingFile { path } => write!(f, "Required version file not found: {}", path.display()),
      AdapterError::Parse { path, reason } => write!(f, "Failed to parse {}: {}", path.display(), reason),
    }
  }
}

/// Release orchestration errors
#[derive(Debug)]
pub enum ReleaseError {
  /// User supplied a version outside the release grammar
  InvalidVersion { input: String, reason: String },

  /// The release tag is already present in the tag namespace
  TagAlreadyExists { tag: String },

  /// Nothing staged after adding the version files
  NoStagedChanges,

  /// Validation produced issues
  ChecksFailed { issues: Vec<String> },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::InvalidVersion { .. } => Some("Use a bare version such as 1.2.3 or 1.2.3-beta.1".to_string()),
      ReleaseError::TagAlreadyExists { tag } => Some(format!(
        "Pick a new version, or delete the stale tag with `git tag -d {}` if it was never pushed.",
        tag
      )),
      ReleaseError::NoStagedChanges => {
        Some("The version files already match this release. Was it cut already? Check `git log -1`.".to_string())
      }
      ReleaseError::ChecksFailed { .. } => Some(
        "\nAuto-fix command:\n  relsync check --fix --version <x.y.z> --tag v<x.y.z>\nQuick path:\n  relsync prepare <x.y.z>"
          .to_string(),
      ),
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::InvalidVersion { input, reason } => write!(f, "{}: {}", reason, input),
      ReleaseError::TagAlreadyExists { tag } => write!(f, "Tag already exists: {}", tag),
      ReleaseError::NoStagedChanges => write!(f, "No staged release version changes found."),
      ReleaseError::ChecksFailed { issues } => {
        write!(f, "Release check failed:")?;
        for issue in issues {
          write!(f, "\n- {}", issue)?;
        }
        Ok(())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull and rebase, then push the commit and tag again.".to_string())
        } else if reason.contains("Permission denied") || reason.contains("403") {
          Some("Check your SSH key or token permissions for the remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run relsync from inside a git work tree or pass --root: {}",
        path.display()
      )),
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason.trim_end())
      }
    }
  }
}

/// Result type alias for relsync
pub type RelResult<T> = Result<T, RelError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RelResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RelResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RelError>,
{
  fn context(self, ctx: impl Into<String>) -> RelResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RelResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with its help text
pub fn print_error(error: &RelError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
