//! Node-level round-tripping through the CSS engine: serializing single AST
//! nodes to text and re-parsing rewritten fragments via placeholder rules.

use std::sync::Arc;

use swc_core::common::{input::StringInput, FileName, SourceMap, Spanned};
use swc_core::css::ast::{
  ComponentValue, Declaration, DeclarationName, QualifiedRule, QualifiedRulePrelude, Rule,
  Stylesheet,
};
use swc_core::css::codegen::{writer::basic::BasicCssWriter, CodeGenerator, CodegenConfig, Emit};
use swc_core::css::parser::{parse_string_input, parser::ParserConfig};

use crate::transform::TransformError;

pub(crate) fn parse_stylesheet(css: &str) -> Result<Stylesheet, TransformError> {
  let cm: Arc<SourceMap> = Default::default();
  let fm = cm.new_source_file(FileName::Custom("input.css".into()).into(), css.to_string());
  let mut errors = vec![];
  match parse_string_input::<Stylesheet>(
    StringInput::from(&*fm),
    None,
    ParserConfig::default(),
    &mut errors,
  ) {
    Ok(stylesheet) => {
      if let Some(error) = errors.into_iter().next() {
        Err(TransformError::parser_error(css, format!("{error:?}")))
      } else {
        Ok(stylesheet)
      }
    }
    Err(err) => Err(TransformError::parser_error(css, format!("{err:?}"))),
  }
}

pub(crate) fn serialize_stylesheet(stylesheet: &Stylesheet) -> Result<String, TransformError> {
  let mut output = String::new();
  {
    let writer = BasicCssWriter::new(&mut output, None, Default::default());
    let mut generator = CodeGenerator::new(writer, CodegenConfig { minify: false });
    generator.emit(stylesheet).map_err(|err| {
      TransformError::from_message(format!("failed to serialize stylesheet: {err}"))
    })?;
  }
  Ok(output)
}

pub(crate) fn serialize_node<T>(node: &T) -> Option<String>
where
  T: Spanned,
  for<'writer> CodeGenerator<BasicCssWriter<'writer, &'writer mut String>>: Emit<T>,
{
  let mut output = String::new();
  {
    let writer = BasicCssWriter::new(&mut output, None, Default::default());
    let mut generator = CodeGenerator::new(writer, CodegenConfig { minify: false });
    if generator.emit(node).is_err() {
      return None;
    }
  }

  Some(output)
}

/// Selector texts of a rule, one entry per selector-list member. Rules whose
/// prelude did not parse as a selector list yield an empty vector.
pub(crate) fn collect_rule_selectors(rule: &QualifiedRule) -> Vec<String> {
  match &rule.prelude {
    QualifiedRulePrelude::SelectorList(list) => list
      .children
      .iter()
      .filter_map(|selector| serialize_node(selector))
      .map(|selector| selector.trim().to_string())
      .collect(),
    _ => Vec::new(),
  }
}

pub(crate) fn declaration_name(name: &DeclarationName) -> String {
  match name {
    DeclarationName::Ident(ident) => ident.value.to_string(),
    DeclarationName::DashedIdent(ident) => ident.value.to_string(),
  }
}

/// Value text of a declaration, without the property name or `!important`.
pub(crate) fn declaration_value_text(declaration: &Declaration) -> Option<String> {
  let mut plain = declaration.clone();
  plain.important = None;
  let serialized = serialize_node(&plain)?;
  let (_, value) = serialized.split_once(':')?;
  Some(value.trim().to_string())
}

/// Parses `<selectors> {}` and returns the resulting empty rule.
pub(crate) fn parse_selector_rule(selectors: &str) -> Result<QualifiedRule, TransformError> {
  let css = format!("{selectors}{{}}");
  let stylesheet = parse_stylesheet(&css)?;
  match stylesheet.rules.into_iter().next() {
    Some(Rule::QualifiedRule(rule)) => Ok(*rule),
    _ => Err(TransformError::from_message(format!(
      "failed to parse selector list: {selectors}"
    ))),
  }
}

/// Re-parses a rewritten declaration through a placeholder rule.
pub(crate) fn parse_declaration(
  property: &str,
  value: &str,
  important: bool,
) -> Result<Declaration, TransformError> {
  let bang = if important { " !important" } else { "" };
  let css = format!(".decl {{{property}: {value}{bang}}}");
  let stylesheet = parse_stylesheet(&css)?;
  let declaration = stylesheet.rules.into_iter().next().and_then(|rule| {
    let Rule::QualifiedRule(rule) = rule else {
      return None;
    };
    rule.block.value.into_iter().find_map(|component| match component {
      ComponentValue::Declaration(declaration) => Some(*declaration),
      _ => None,
    })
  });

  declaration.ok_or_else(|| {
    TransformError::from_message(format!(
      "failed to re-parse declaration value: {property}: {value}"
    ))
  })
}
