use crate::core::error::{ConfigError, RelError, RelResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for relsync
/// Searched in order: relsync.toml, .relsync.toml, .config/relsync.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelsyncConfig {
  /// Label of the location holding the canonical version (default: first location)
  #[serde(default)]
  pub canonical: Option<String>,
  #[serde(default)]
  pub git: GitConfig,
  #[serde(default)]
  pub workflow: WorkflowConfig,
  pub packaging: PackagingConfig,
  #[serde(default)]
  pub locations: Vec<LocationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
  /// Remote that `cut --push` pushes to
  #[serde(default = "default_remote")]
  pub remote: String,
}

fn default_remote() -> String {
  "origin".to_string()
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      remote: default_remote(),
    }
  }
}

/// CI release workflow settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
  #[serde(default = "default_workflow_path")]
  pub path: PathBuf,

  /// Command the workflow must run to validate release metadata on tag builds
  #[serde(default = "default_validate_command")]
  pub validate_command: String,

  /// Name of the step the validation step is inserted after
  #[serde(default = "default_anchor_step")]
  pub anchor_step: String,
}

fn default_workflow_path() -> PathBuf {
  PathBuf::from(".github/workflows/release.yml")
}

fn default_validate_command() -> String {
  r#"relsync check --tag "${{ github.ref_name }}""#.to_string()
}

fn default_anchor_step() -> String {
  "Checkout repository".to_string()
}

impl Default for WorkflowConfig {
  fn default() -> Self {
    Self {
      path: default_workflow_path(),
      validate_command: default_validate_command(),
      anchor_step: default_anchor_step(),
    }
  }
}

/// Application packaging config (bundler + auto-updater)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingConfig {
  #[serde(default = "default_packaging_path")]
  pub path: PathBuf,

  /// The one endpoint the auto-updater is allowed to poll
  pub updater_endpoint: String,
}

fn default_packaging_path() -> PathBuf {
  PathBuf::from("src-tauri/tauri.conf.json")
}

/// How a location stores its version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
  /// Named string field in a JSON document (package.json, tauri.conf.json)
  ObjectField,
  /// `name = "value"` inside a section of a manifest (Cargo.toml `[package]`)
  SectionField,
  /// One of many repeated records keyed by name (Cargo.lock `[[package]]`)
  KeyedRecord,
}

/// One `[[locations]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
  /// Path relative to the repository root
  pub path: PathBuf,

  pub format: FormatKind,

  #[serde(default = "default_field")]
  pub field: String,

  /// Section marker for section-field locations (default: `[package]`)
  #[serde(default)]
  pub section: Option<String>,

  /// Record name for keyed-record locations
  #[serde(default)]
  pub record: Option<String>,

  /// Record marker for keyed-record locations (default: `[[package]]`)
  #[serde(default)]
  pub marker: Option<String>,

  /// Whether the file must exist (default: false for keyed-record, true otherwise)
  #[serde(default)]
  pub required: Option<bool>,
}

fn default_field() -> String {
  "version".to_string()
}

impl LocationConfig {
  /// Label used in reports: `path` or `path (record)`
  pub fn label(&self) -> String {
    let path = self.path.to_string_lossy().replace('\\', "/");
    match &self.record {
      Some(record) => format!("{} ({})", path, record),
      None => path,
    }
  }

  pub fn is_required(&self) -> bool {
    self.required.unwrap_or(self.format != FormatKind::KeyedRecord)
  }

  fn validate(&self) -> Result<(), String> {
    if self.field.trim().is_empty() {
      return Err(format!("location '{}' has an empty field name", self.label()));
    }
    match self.format {
      FormatKind::KeyedRecord => {
        if self.record.as_deref().is_none_or(|r| r.trim().is_empty()) {
          return Err(format!(
            "keyed-record location '{}' needs a `record` name",
            self.path.display()
          ));
        }
        if self.section.is_some() {
          return Err(format!("`section` is only valid on section-field locations ({})", self.label()));
        }
      }
      FormatKind::SectionField => {
        if self.record.is_some() || self.marker.is_some() {
          return Err(format!(
            "`record`/`marker` are only valid on keyed-record locations ({})",
            self.label()
          ));
        }
      }
      FormatKind::ObjectField => {
        if self.record.is_some() || self.marker.is_some() || self.section.is_some() {
          return Err(format!(
            "object-field location '{}' takes only `field` and `required`",
            self.label()
          ));
        }
      }
    }
    Ok(())
  }
}

impl RelsyncConfig {
  /// Find config file in search order: relsync.toml, .relsync.toml, .config/relsync.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [
      root.join("relsync.toml"),
      root.join(".relsync.toml"),
      root.join(".config").join("relsync.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load and validate config (searches multiple locations)
  pub fn load(root: &Path) -> RelResult<Self> {
    let config_path = Self::find_config_path(root).ok_or_else(|| {
      RelError::Config(ConfigError::NotFound {
        root: root.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content, &config_path)?;
    tracing::debug!(path = %config_path.display(), locations = config.locations.len(), "loaded config");
    Ok(config)
  }

  /// Parse and validate config text; `origin` is only used for messages
  pub fn parse(content: &str, origin: &Path) -> RelResult<Self> {
    let config: RelsyncConfig = toml_edit::de::from_str(content)
      .with_context(|| format!("Failed to parse config from {}", origin.display()))?;

    config.validate().map_err(|reason| {
      RelError::Config(ConfigError::Invalid {
        path: origin.to_path_buf(),
        reason,
      })
    })?;

    Ok(config)
  }

  /// Label of the canonical location
  pub fn canonical_label(&self) -> String {
    match &self.canonical {
      Some(label) => label.clone(),
      None => self.locations.first().map(|l| l.label()).unwrap_or_default(),
    }
  }

  fn validate(&self) -> Result<(), String> {
    if self.locations.is_empty() {
      return Err("at least one [[locations]] entry is required".to_string());
    }

    let mut seen = HashSet::new();
    for location in &self.locations {
      location.validate()?;
      if !seen.insert((location.path.clone(), location.record.clone())) {
        return Err(format!("location '{}' is listed twice", location.label()));
      }
    }

    let canonical = self.canonical_label();
    let Some(location) = self.locations.iter().find(|l| l.label() == canonical) else {
      return Err(format!("canonical location '{}' is not listed under [[locations]]", canonical));
    };
    if location.format == FormatKind::KeyedRecord || !location.is_required() {
      return Err(format!(
        "canonical location '{}' must be a required manifest, not a lock record",
        canonical
      ));
    }

    if self.packaging.updater_endpoint.trim().is_empty() {
      return Err("[packaging] updater_endpoint must not be empty".to_string());
    }
    if self.workflow.validate_command.trim().is_empty() {
      return Err("[workflow] validate_command must not be empty".to_string());
    }

    Ok(())
  }
}
