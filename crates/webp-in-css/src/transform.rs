//! Host-engine binding: parse, walk, finalize, serialize.

use swc_core::css::ast::{ComponentValue, Rule, Stylesheet};
use tracing::debug;

use crate::options::WebpOptions;
use crate::plugin::{RulePath, WebpPlugin};
use crate::utils::{parse_stylesheet, serialize_stylesheet};

/// Raised when the stylesheet, or a rewritten fragment of it, cannot be
/// round-tripped through the CSS engine.
#[derive(Debug)]
pub struct TransformError {
  message: String,
}

impl TransformError {
  pub(crate) fn from_message(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub(crate) fn parser_error(css: &str, message: impl Into<String>) -> Self {
    Self {
      message: format!("failed to parse CSS: {}\n\nInput: {{\n{css}\n}}", message.into()),
    }
  }
}

impl std::fmt::Display for TransformError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for TransformError {}

/// Runs the WebP split over a stylesheet: parse, visit every style rule
/// exactly once in document order, insert the collected variant rules, and
/// serialize the result.
///
/// Each call builds a fresh [`WebpPlugin`]; nothing is shared between
/// invocations.
pub fn transform_css(css: &str, options: WebpOptions) -> Result<String, TransformError> {
  let mut stylesheet = parse_stylesheet(css)?;
  let mut plugin = WebpPlugin::new(options);

  debug!(rules = stylesheet.rules.len(), "transforming stylesheet");
  walk_stylesheet(&mut plugin, &mut stylesheet)?;
  plugin.finalize(&mut stylesheet);

  serialize_stylesheet(&stylesheet)
}

/// One strictly sequential depth-first pass over the rule tree. Qualified
/// rules go through the plugin's visit hook; at-rule blocks are recursed
/// into at any depth. Rules inserted by the finalize phase are never seen
/// here.
pub(crate) fn walk_stylesheet(
  plugin: &mut WebpPlugin,
  stylesheet: &mut Stylesheet,
) -> Result<(), TransformError> {
  let mut path = RulePath::new();
  walk_rules(plugin, &mut stylesheet.rules, &mut path)
}

fn walk_rules(
  plugin: &mut WebpPlugin,
  rules: &mut [Rule],
  path: &mut RulePath,
) -> Result<(), TransformError> {
  for (index, rule) in rules.iter_mut().enumerate() {
    path.push(index);
    match rule {
      Rule::QualifiedRule(rule) => plugin.visit_rule(rule, path)?,
      Rule::AtRule(at_rule) => {
        if let Some(block) = &mut at_rule.block {
          walk_block(plugin, &mut block.value, path)?;
        }
      }
      _ => {}
    }
    path.pop();
  }
  Ok(())
}

fn walk_block(
  plugin: &mut WebpPlugin,
  values: &mut [ComponentValue],
  path: &mut RulePath,
) -> Result<(), TransformError> {
  for (index, value) in values.iter_mut().enumerate() {
    path.push(index);
    match value {
      ComponentValue::QualifiedRule(rule) => plugin.visit_rule(rule, path)?,
      ComponentValue::AtRule(at_rule) => {
        if let Some(block) = &mut at_rule.block {
          walk_block(plugin, &mut block.value, path)?;
        }
      }
      _ => {}
    }
    path.pop();
  }
  Ok(())
}
