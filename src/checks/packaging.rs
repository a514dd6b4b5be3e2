//! Application packaging invariants (bundler artifacts and auto-updater endpoint)

use super::trait_def::{Invariant, Issue};
use crate::adapters::json::{parse_document, render_document};
use crate::core::config::PackagingConfig;
use crate::core::context::ReleaseContext;
use crate::core::error::{AdapterError, RelError, RelResult};
use crate::utils::{path_to_git_format, read_text, write_text};
use serde_json::{Map, Value};
use std::path::Path;

/// Updater artifact format the release pipeline produces
pub const UPDATER_ARTIFACTS: &str = "v1Compatible";

pub struct PackagingInvariants;

impl Invariant for PackagingInvariants {
  fn name(&self) -> &'static str {
    "packaging"
  }

  fn description(&self) -> &'static str {
    "Packaging config builds updater artifacts and polls exactly one update endpoint"
  }

  fn evaluate(&self, ctx: &ReleaseContext) -> RelResult<Vec<Issue>> {
    let config = &ctx.config.packaging;
    let (_, doc) = read_packaging(ctx)?;
    Ok(evaluate_document(&doc, config, &path_to_git_format(&config.path)))
  }

  fn fix(&self, ctx: &ReleaseContext) -> RelResult<()> {
    let config = &ctx.config.packaging;
    let (path, mut doc) = read_packaging(ctx)?;

    // Leave a compliant file alone, including its formatting
    if evaluate_document(&doc, config, "").is_empty() {
      return Ok(());
    }

    fix_document(&mut doc, config, &config.path)?;
    write_text(&path, &render_document(&doc)?)
  }
}

fn read_packaging(ctx: &ReleaseContext) -> RelResult<(std::path::PathBuf, Value)> {
  let rel = &ctx.config.packaging.path;
  if !ctx.exists(rel) {
    return Err(RelError::Adapter(AdapterError::MissingFile { path: rel.clone() }));
  }
  let path = ctx.path(rel);
  let doc = parse_document(rel, &read_text(&path)?)?;
  Ok((path, doc))
}

/// Every packaging rule violated by `doc`
pub fn evaluate_document(doc: &Value, config: &PackagingConfig, label: &str) -> Vec<Issue> {
  let mut issues = Vec::new();

  let artifacts = doc.pointer("/bundle/createUpdaterArtifacts").and_then(Value::as_str);
  if artifacts != Some(UPDATER_ARTIFACTS) {
    issues.push(Issue::new(
      "packaging-updater-artifacts",
      format!("{} missing bundle.createUpdaterArtifacts={}", label, UPDATER_ARTIFACTS),
    ));
  }

  let endpoints = doc.pointer("/plugins/updater/endpoints").and_then(Value::as_array);
  let endpoint_ok = matches!(
    endpoints.map(Vec::as_slice),
    Some([only]) if only.as_str() == Some(config.updater_endpoint.as_str())
  );
  if !endpoint_ok {
    issues.push(Issue::new(
      "packaging-updater-endpoint",
      format!("{} updater endpoint must be exactly {}", label, config.updater_endpoint),
    ));
  }

  issues
}

/// Force the artifact flag and replace the endpoint list with the canonical URL
///
/// Missing parent objects are created; a parent that exists but is not an
/// object is reported rather than overwritten.
pub fn fix_document(doc: &mut Value, config: &PackagingConfig, path: &Path) -> RelResult<()> {
  let root = doc.as_object_mut().ok_or_else(|| missing(path, "(root object)"))?;

  let bundle = object_entry(root, "bundle", path, "bundle")?;
  bundle.insert(
    "createUpdaterArtifacts".to_string(),
    Value::String(UPDATER_ARTIFACTS.to_string()),
  );

  let plugins = object_entry(root, "plugins", path, "plugins")?;
  let updater = object_entry(plugins, "updater", path, "plugins.updater")?;
  updater.insert(
    "endpoints".to_string(),
    Value::Array(vec![Value::String(config.updater_endpoint.clone())]),
  );

  Ok(())
}

fn object_entry<'a>(
  map: &'a mut Map<String, Value>,
  key: &str,
  path: &Path,
  field: &str,
) -> RelResult<&'a mut Map<String, Value>> {
  map
    .entry(key)
    .or_insert_with(|| Value::Object(Map::new()))
    .as_object_mut()
    .ok_or_else(|| missing(path, field))
}

fn missing(path: &Path, field: &str) -> RelError {
  RelError::Adapter(AdapterError::MissingField {
    path: path.to_path_buf(),
    field: field.to_string(),
  })
}
