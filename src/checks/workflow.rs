//! CI release workflow invariants
//!
//! The workflow is plain YAML text and is treated as such: every rule is a
//! pattern over lines, and every fix splices text in place so comments and
//! formatting elsewhere in the file survive.

use super::trait_def::{Invariant, Issue};
use crate::core::config::WorkflowConfig;
use crate::core::context::ReleaseContext;
use crate::core::error::{AdapterError, RelError, RelResult};
use crate::utils::{path_to_git_format, read_text, write_text};
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

/// The only tag pattern a release workflow may trigger on
pub const TAG_GLOB: &str = "v*.*.*";

/// Name of the inserted validation step
pub const VALIDATION_STEP_NAME: &str = "Validate release metadata";

/// Gate that limits the validation step to tag builds
pub const TAG_REF_GATE: &str = "if: startsWith(github.ref, 'refs/tags/')";

static TAGS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?m)^[ \t]*tags:[ \t]*\r?\n((?:[ \t]+-[^\r\n]*(?:\r?\n|\z))+)").expect("static tags pattern")
});

static DRAFT_VALUE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"releaseDraft:[ \t]*([^\s#]*)").expect("static draft pattern"));

static DRAFT_FLAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"releaseDraft:[ \t]*(?:"(?:true|false)"|'(?:true|false)'|true|false)"#).expect("static draft pattern")
});

/// Tag-trigger, draft-publish and validation-step rules for the release workflow
pub struct WorkflowInvariants;

impl Invariant for WorkflowInvariants {
  fn name(&self) -> &'static str {
    "workflow"
  }

  fn description(&self) -> &'static str {
    "Release workflow triggers on version tags, publishes non-draft releases and validates metadata"
  }

  fn evaluate(&self, ctx: &ReleaseContext) -> RelResult<Vec<Issue>> {
    let config = &ctx.config.workflow;
    let text = read_workflow(ctx)?;
    Ok(evaluate_text(&text, config, &path_to_git_format(&config.path)))
  }

  fn fix(&self, ctx: &ReleaseContext) -> RelResult<()> {
    let config = &ctx.config.workflow;
    let text = read_workflow(ctx)?;
    let fixed = fix_text(&text, config, &path_to_git_format(&config.path));
    if fixed != text {
      write_text(&ctx.path(&config.path), &fixed)?;
    }
    Ok(())
  }
}

fn read_workflow(ctx: &ReleaseContext) -> RelResult<String> {
  let path = &ctx.config.workflow.path;
  if !ctx.exists(path) {
    return Err(RelError::Adapter(AdapterError::MissingFile { path: path.clone() }));
  }
  read_text(&ctx.path(path))
}

/// Every rule violated by `text`, one issue per rule
pub fn evaluate_text(text: &str, config: &WorkflowConfig, label: &str) -> Vec<Issue> {
  let mut issues = Vec::new();

  let tags_ok = TAGS_BLOCK
    .captures(text)
    .and_then(|caps| caps.get(1))
    .is_some_and(|items| tag_entries(items.as_str()) == [TAG_GLOB]);
  if !tags_ok {
    issues.push(Issue::new(
      "workflow-tag-trigger",
      format!("{} must use push.tags = \"{}\"", label, TAG_GLOB),
    ));
  }

  let draft_ok = DRAFT_VALUE
    .captures(text)
    .and_then(|caps| caps.get(1))
    .is_some_and(|value| value.as_str() == "false");
  if !draft_ok {
    issues.push(Issue::new(
      "workflow-release-draft",
      format!("{} must set releaseDraft: false", label),
    ));
  }

  if !text.contains(&config.validate_command) {
    issues.push(Issue::new(
      "workflow-validation-step",
      format!("{} must run release metadata validation step", label),
    ));
  }

  if !text.contains(TAG_REF_GATE) {
    issues.push(Issue::new(
      "workflow-tag-gating",
      format!("{} release validation step must run only for tag refs", label),
    ));
  }

  issues
}

/// `text` rewritten so every rule holds, where the needed anchors exist
pub fn fix_text(text: &str, config: &WorkflowConfig, label: &str) -> String {
  let mut fixed = match TAGS_BLOCK.captures(text).and_then(|caps| caps.get(1)) {
    Some(items) => {
      let entry = canonical_tag_entry(items.as_str());
      format!("{}{}{}", &text[..items.start()], entry, &text[items.end()..])
    }
    None => {
      tracing::warn!(workflow = label, "no push `tags:` list found, tag trigger left unchanged");
      text.to_string()
    }
  };

  if DRAFT_FLAG.is_match(&fixed) {
    fixed = DRAFT_FLAG.replace_all(&fixed, NoExpand("releaseDraft: false")).into_owned();
  } else {
    tracing::warn!(workflow = label, "no `releaseDraft:` setting found, draft flag left unchanged");
  }

  if !fixed.contains(&config.validate_command) {
    match step_end(&fixed, &config.anchor_step) {
      Some((offset, indent)) => {
        let mut step = String::new();
        if !fixed[..offset].ends_with('\n') {
          step.push('\n');
        }
        step.push('\n');
        step.push_str(&format!("{}- name: {}\n", indent, VALIDATION_STEP_NAME));
        step.push_str(&format!("{}  {}\n", indent, TAG_REF_GATE));
        step.push_str(&format!("{}  run: {}\n", indent, config.validate_command));
        fixed.insert_str(offset, &step);
      }
      None => {
        tracing::warn!(
          workflow = label,
          anchor = %config.anchor_step,
          "anchor step not found, validation step not inserted"
        );
      }
    }
  }

  fixed
}

/// Entries of a `tags:` list, unquoted and without trailing comments
fn tag_entries(items: &str) -> Vec<&str> {
  items
    .lines()
    .filter_map(|line| line.trim().strip_prefix('-'))
    .map(|entry| {
      let entry = entry.trim();
      if let Some(rest) = entry.strip_prefix('"') {
        rest.split('"').next().unwrap_or_default()
      } else if let Some(rest) = entry.strip_prefix('\'') {
        rest.split('\'').next().unwrap_or_default()
      } else {
        entry.split(" #").next().unwrap_or_default().trim_end()
      }
    })
    .collect()
}

/// Single-entry replacement for a `tags:` list, indented like its first entry
fn canonical_tag_entry(items: &str) -> String {
  let indent: String = items.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
  let eol = if items.contains("\r\n") { "\r\n" } else { "\n" };
  format!("{}- \"{}\"{}", indent, TAG_GLOB, eol)
}

/// Offset just past the anchor step (its `- name:` line plus its property lines)
/// and the indentation of the step's dash
fn step_end(text: &str, anchor: &str) -> Option<(usize, String)> {
  let pattern = format!(
    r#"(?m)^([ \t]*)-[ \t]+name:[ \t]*["']?{}["']?[ \t]*\r?$"#,
    regex::escape(anchor)
  );
  let anchor_line = Regex::new(&pattern).ok()?;
  let caps = anchor_line.captures(text)?;
  let indent = caps.get(1)?.as_str().to_string();
  let line_end = caps.get(0)?.end();

  let mut offset = match text[line_end..].find('\n') {
    Some(nl) => line_end + nl + 1,
    None => return Some((text.len(), indent)),
  };

  for line in text[offset..].split_inclusive('\n') {
    let content = line.trim_end_matches(['\r', '\n']);
    let depth = content.len() - content.trim_start_matches([' ', '\t']).len();
    if content.trim().is_empty() || depth <= indent.len() {
      break;
    }
    offset += line.len();
  }

  Some((offset, indent))
}
