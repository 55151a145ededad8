//! The rule-splitting plugin: per-rule visit hook plus the once-at-end
//! insertion pass.

use indexmap::IndexMap;
use swc_core::css::ast::{ComponentValue, Declaration, QualifiedRule, Rule, SimpleBlock, Stylesheet};
use tracing::{debug, trace};

use crate::classifier::{default_check, default_rename};
use crate::options::WebpOptions;
use crate::selectors::{marker_token, transform_selectors};
use crate::transform::TransformError;
use crate::utils::{
  collect_rule_selectors, declaration_name, declaration_value_text, parse_declaration,
  parse_selector_rule,
};

/// Index path of a rule from the stylesheet root. Stable for the duration of
/// one transform: the walk phase never inserts or removes siblings, so a path
/// recorded during the walk still addresses the same rule at finalize time.
pub type RulePath = Vec<usize>;

/// One instance per transform invocation. During the walk it collects the
/// variant rules into two ordered maps keyed by the original rule's path;
/// [`WebpPlugin::finalize`] drains them once the walk is done.
pub struct WebpPlugin {
  options: WebpOptions,
  webp_marker: String,
  no_webp_marker: String,
  no_js_marker: String,
  no_webp_guard: String,
  webp_rules: IndexMap<RulePath, QualifiedRule>,
  no_webp_rules: IndexMap<RulePath, QualifiedRule>,
}

impl WebpPlugin {
  pub fn new(options: WebpOptions) -> Self {
    let webp_marker = marker_token(&options.webp_class, options.modules);
    let no_webp_marker = marker_token(&options.no_webp_class, options.modules);
    let no_js_marker = marker_token(&options.no_js_class, options.modules);
    let no_webp_guard = format!(".{}", options.no_webp_class);

    Self {
      options,
      webp_marker,
      no_webp_marker,
      no_js_marker,
      no_webp_guard,
      webp_rules: IndexMap::new(),
      no_webp_rules: IndexMap::new(),
    }
  }

  fn check(&self, property: &str, value: &str) -> bool {
    match &self.options.check {
      Some(check) => check(property, value),
      None => default_check(value),
    }
  }

  fn rename(&self, value: &str) -> String {
    match &self.options.rename {
      Some(rename) => rename(value),
      None => default_rename(value),
    }
  }

  /// Per-rule hook, invoked once per style rule in document order.
  ///
  /// Image-bearing declarations are moved out of the rule: the fallback
  /// variant receives verbatim clones, the capable variant re-parsed copies
  /// with the renamed value. Everything else stays in place, in its original
  /// order. Rules whose selectors already carry the fallback marker class
  /// are left alone, which keeps the transform idempotent over its own
  /// output.
  pub fn visit_rule(
    &mut self,
    rule: &mut QualifiedRule,
    path: &RulePath,
  ) -> Result<(), TransformError> {
    let selectors = collect_rule_selectors(rule);
    if selectors.is_empty() {
      return Ok(());
    }
    if selectors
      .iter()
      .any(|selector| selector.contains(&self.no_webp_guard))
    {
      return Ok(());
    }

    let mut fallback: Vec<Declaration> = Vec::new();
    let mut capable: Vec<Declaration> = Vec::new();
    let mut kept: Vec<ComponentValue> = Vec::with_capacity(rule.block.value.len());

    for component in std::mem::take(&mut rule.block.value) {
      let declaration = match component {
        ComponentValue::Declaration(declaration) => declaration,
        other => {
          kept.push(other);
          continue;
        }
      };

      let property = declaration_name(&declaration.name);
      let value = declaration_value_text(&declaration).unwrap_or_default();
      if !self.check(&property, &value) {
        kept.push(ComponentValue::Declaration(declaration));
        continue;
      }

      let renamed = self.rename(&value);
      trace!(%property, %renamed, "splitting image declaration");
      capable.push(parse_declaration(
        &property,
        &renamed,
        declaration.important.is_some(),
      )?);
      fallback.push(*declaration);
    }

    rule.block.value = kept;

    if !fallback.is_empty() {
      let mut selector_texts = transform_selectors(&selectors, &self.no_webp_marker);
      if self.options.add_no_js {
        selector_texts.extend(transform_selectors(&selectors, &self.no_js_marker));
      }
      let variant = build_rule(&selector_texts, fallback)?;
      self.no_webp_rules.insert(path.clone(), variant);
    }
    if !capable.is_empty() {
      let selector_texts = transform_selectors(&selectors, &self.webp_marker);
      let variant = build_rule(&selector_texts, capable)?;
      self.webp_rules.insert(path.clone(), variant);
    }

    Ok(())
  }

  /// Once-at-end hook: inserts every collected variant immediately after its
  /// original rule, fallback insertions processed fully before capable ones.
  /// Both passes target the anchor itself, so a rule that produced both
  /// variants is followed by the capable rule and then the fallback rule;
  /// walk order is preserved across the whole document, at-rule blocks
  /// included.
  pub fn finalize(&mut self, stylesheet: &mut Stylesheet) {
    let mut webp_rules = std::mem::take(&mut self.webp_rules);
    let mut no_webp_rules = std::mem::take(&mut self.no_webp_rules);
    if webp_rules.is_empty() && no_webp_rules.is_empty() {
      return;
    }

    debug!(
      capable = webp_rules.len(),
      fallback = no_webp_rules.len(),
      "inserting variant rules"
    );

    let mut path = RulePath::new();
    insert_into_rules(
      &mut stylesheet.rules,
      &mut path,
      &mut webp_rules,
      &mut no_webp_rules,
    );
  }
}

fn build_rule(
  selectors: &[String],
  declarations: Vec<Declaration>,
) -> Result<QualifiedRule, TransformError> {
  let mut rule = parse_selector_rule(&selectors.join(", "))?;
  rule.block.value = declarations
    .into_iter()
    .map(|declaration| ComponentValue::Declaration(Box::new(declaration)))
    .collect();
  Ok(rule)
}

fn insert_into_rules(
  rules: &mut Vec<Rule>,
  path: &mut RulePath,
  webp_rules: &mut IndexMap<RulePath, QualifiedRule>,
  no_webp_rules: &mut IndexMap<RulePath, QualifiedRule>,
) {
  let original = std::mem::take(rules);
  let mut next = Vec::with_capacity(original.len());

  for (index, mut rule) in original.into_iter().enumerate() {
    path.push(index);
    if let Rule::AtRule(at_rule) = &mut rule {
      if let Some(block) = &mut at_rule.block {
        insert_into_block(block, path, webp_rules, no_webp_rules);
      }
    }
    let capable = webp_rules.shift_remove(path.as_slice());
    let fallback = no_webp_rules.shift_remove(path.as_slice());
    path.pop();

    next.push(rule);
    if let Some(variant) = capable {
      next.push(Rule::QualifiedRule(Box::new(variant)));
    }
    if let Some(variant) = fallback {
      next.push(Rule::QualifiedRule(Box::new(variant)));
    }
  }

  *rules = next;
}

fn insert_into_block(
  block: &mut SimpleBlock,
  path: &mut RulePath,
  webp_rules: &mut IndexMap<RulePath, QualifiedRule>,
  no_webp_rules: &mut IndexMap<RulePath, QualifiedRule>,
) {
  let original = std::mem::take(&mut block.value);
  let mut next = Vec::with_capacity(original.len());

  for (index, mut value) in original.into_iter().enumerate() {
    path.push(index);
    if let ComponentValue::AtRule(at_rule) = &mut value {
      if let Some(inner) = &mut at_rule.block {
        insert_into_block(inner, path, webp_rules, no_webp_rules);
      }
    }
    let capable = webp_rules.shift_remove(path.as_slice());
    let fallback = no_webp_rules.shift_remove(path.as_slice());
    path.pop();

    next.push(value);
    if let Some(variant) = capable {
      next.push(ComponentValue::QualifiedRule(Box::new(variant)));
    }
    if let Some(variant) = fallback {
      next.push(ComponentValue::QualifiedRule(Box::new(variant)));
    }
  }

  block.value = next;
}
