//! Fixture repository and a recording VCS for release tests

use crate::core::context::ReleaseContext;
use crate::core::error::{GitError, RelError, RelResult};
use crate::core::vcs::ReleaseVcs;
use crate::utils::path_to_git_format;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ENDPOINT: &str = "https://releases.example.com/app/latest.json";

pub const CONFIG: &str = r#"
[workflow]
path = ".github/workflows/release.yml"

[packaging]
path = "src-tauri/tauri.conf.json"
updater_endpoint = "https://releases.example.com/app/latest.json"

[[locations]]
path = "package.json"
format = "object-field"

[[locations]]
path = "src-core/Cargo.toml"
format = "section-field"

[[locations]]
path = "src-core/Cargo.lock"
format = "keyed-record"
record = "app_core"

[[locations]]
path = "src-server/Cargo.toml"
format = "section-field"

[[locations]]
path = "src-server/Cargo.lock"
format = "keyed-record"
record = "app-server"

[[locations]]
path = "src-tauri/Cargo.toml"
format = "section-field"

[[locations]]
path = "src-tauri/Cargo.lock"
format = "keyed-record"
record = "app"

[[locations]]
path = "src-tauri/Cargo.lock"
format = "keyed-record"
record = "app_core"

[[locations]]
path = "src-tauri/tauri.conf.json"
format = "object-field"
"#;

pub fn package_json(version: &str) -> String {
  format!(
    "{{\n  \"name\": \"app\",\n  \"private\": true,\n  \"version\": \"{}\",\n  \"type\": \"module\",\n  \"scripts\": {{\n    \"build\": \"vite build\"\n  }}\n}}\n",
    version
  )
}

pub fn manifest(name: &str, version: &str) -> String {
  format!(
    "[package]\nname = \"{}\"\nversion = \"{}\"\nedition = \"2021\"\n\n[dependencies]\nserde = {{ version = \"1.0\", features = [\"derive\"] }}\n",
    name, version
  )
}

pub fn lock(records: &[(&str, &str)]) -> String {
  let mut out = String::from("# This file is automatically @generated by Cargo.\n# It is not intended for manual editing.\nversion = 4\n");
  for (name, version) in records {
    out.push_str(&format!("\n[[package]]\nname = \"{}\"\nversion = \"{}\"\n", name, version));
  }
  out.push_str("\n[[package]]\nname = \"serde\"\nversion = \"1.0.219\"\nsource = \"registry+https://github.com/rust-lang/crates.io-index\"\n");
  out
}

pub fn tauri_conf(version: &str) -> String {
  format!(
    r#"{{
  "productName": "app",
  "version": "{}",
  "identifier": "com.example.app",
  "bundle": {{
    "active": true,
    "createUpdaterArtifacts": "v1Compatible"
  }},
  "plugins": {{
    "updater": {{
      "pubkey": "dW50cnVzdGVkIGNvbW1lbnQ=",
      "endpoints": [
        "{}"
      ]
    }}
  }}
}}
"#,
    version, ENDPOINT
  )
}

pub const WORKFLOW: &str = r#"name: Release

on:
  push:
    tags:
      - "v*.*.*"
  workflow_dispatch:

jobs:
  release:
    runs-on: ubuntu-latest
    steps:
      - name: Checkout repository
        uses: actions/checkout@v4

      - name: Validate release metadata
        if: startsWith(github.ref, 'refs/tags/')
        run: relsync check --tag "${{ github.ref_name }}"

      - name: Build and publish
        uses: tauri-apps/tauri-action@v0
        with:
          tagName: ${{ github.ref_name }}
          releaseDraft: false
"#;

/// Workflow as a fresh project might have it: broad trigger, draft releases, no validation
pub const WORKFLOW_UNCONFIGURED: &str = r#"name: Release

on:
  push:
    tags:
      - "v*"

jobs:
  release:
    runs-on: ubuntu-latest
    steps:
      - name: Checkout repository
        uses: actions/checkout@v4
      - name: Build and publish
        uses: tauri-apps/tauri-action@v0
        with:
          releaseDraft: true
"#;

/// A consistent tree at 1.0.0 with every invariant satisfied
pub struct Fixture {
  dir: TempDir,
}

impl Fixture {
  pub fn new() -> Self {
    let fixture = Self {
      dir: TempDir::new().unwrap(),
    };
    fixture.set_all("1.0.0");
    fixture.write("relsync.toml", CONFIG);
    fixture.write(".github/workflows/release.yml", WORKFLOW);
    fixture
  }

  pub fn root(&self) -> &Path {
    self.dir.path()
  }

  pub fn ctx(&self) -> ReleaseContext {
    ReleaseContext::build(self.root()).unwrap()
  }

  pub fn write(&self, rel: &str, content: &str) {
    let path = self.root().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }

  pub fn read(&self, rel: &str) -> String {
    std::fs::read_to_string(self.root().join(rel)).unwrap()
  }

  /// Write `version` everywhere a version lives
  pub fn set_all(&self, version: &str) {
    self.write("package.json", &package_json(version));
    self.write("src-core/Cargo.toml", &manifest("app_core", version));
    self.write("src-core/Cargo.lock", &lock(&[("app_core", version)]));
    self.write("src-server/Cargo.toml", &manifest("app-server", version));
    self.write("src-tauri/Cargo.toml", &manifest("app", version));
    self.write("src-tauri/Cargo.lock", &lock(&[("app", version), ("app_core", version)]));
    self.write("src-tauri/tauri.conf.json", &tauri_conf(version));
  }

  /// Every file the fixture owns, with contents, for byte-level comparisons
  pub fn snapshot(&self) -> Vec<(String, String)> {
    [
      "package.json",
      "src-core/Cargo.toml",
      "src-core/Cargo.lock",
      "src-server/Cargo.toml",
      "src-tauri/Cargo.toml",
      "src-tauri/Cargo.lock",
      "src-tauri/tauri.conf.json",
      ".github/workflows/release.yml",
    ]
    .iter()
    .map(|rel| (rel.to_string(), self.read(rel)))
    .collect()
  }
}

/// In-memory [`ReleaseVcs`] that records every call
#[derive(Default)]
pub struct FakeVcs {
  /// Tags that already exist
  pub tags: RefCell<Vec<String>>,
  /// When false, staging leaves the index empty (files match HEAD)
  pub dirty: bool,
  /// Operation name that fails (`commit`, `tag`, `push_head`, `push_tag`)
  pub fail_on: Option<&'static str>,
  pub staged: RefCell<Vec<String>>,
  pub calls: RefCell<Vec<String>>,
}

impl FakeVcs {
  pub fn dirty() -> Self {
    Self {
      dirty: true,
      ..Self::default()
    }
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }

  fn record(&self, call: String, op: &str) -> RelResult<()> {
    self.calls.borrow_mut().push(call.clone());
    if self.fail_on == Some(op) {
      return Err(RelError::Git(GitError::CommandFailed {
        command: call,
        stderr: "simulated failure".to_string(),
      }));
    }
    Ok(())
  }
}

impl ReleaseVcs for FakeVcs {
  fn tag_exists(&self, tag: &str) -> RelResult<bool> {
    self.calls.borrow_mut().push(format!("tag_exists {}", tag));
    Ok(self.tags.borrow().iter().any(|t| t == tag))
  }

  fn stage(&self, paths: &[PathBuf]) -> RelResult<()> {
    let names: Vec<String> = paths.iter().map(|p| path_to_git_format(p)).collect();
    self.record(format!("stage {}", names.join(" ")), "stage")?;
    if self.dirty {
      self.staged.borrow_mut().extend(names);
    }
    Ok(())
  }

  fn staged_files(&self) -> RelResult<Vec<String>> {
    Ok(self.staged.borrow().clone())
  }

  fn commit(&self, message: &str) -> RelResult<()> {
    self.record(format!("commit {}", message), "commit")?;
    self.staged.borrow_mut().clear();
    Ok(())
  }

  fn create_annotated_tag(&self, tag: &str, message: &str) -> RelResult<()> {
    self.record(format!("tag {} {}", tag, message), "tag")?;
    self.tags.borrow_mut().push(tag.to_string());
    Ok(())
  }

  fn push_head(&self, remote: &str) -> RelResult<()> {
    self.record(format!("push {} HEAD", remote), "push_head")
  }

  fn push_tag(&self, remote: &str, tag: &str) -> RelResult<()> {
    self.record(format!("push {} {}", remote, tag), "push_tag")
  }
}
