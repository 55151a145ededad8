//! Selector rewriting for one marker class.

/// Marker-class text as it appears inside a selector: `.name`, or
/// `:global(.name)` for CSS-modules stylesheets where plain class selectors
/// would be locally scoped.
pub fn marker_token(class: &str, modules: bool) -> String {
  if modules {
    format!(":global(.{class})")
  } else {
    format!(".{class}")
  }
}

/// Rewrites a selector list so every selector is gated on `marker`.
/// The output has the same length and order as the input.
pub fn transform_selectors(selectors: &[String], marker: &str) -> Vec<String> {
  selectors
    .iter()
    .map(|selector| add_marker(selector, marker))
    .collect()
}

/// Gates a single selector on the marker class.
///
/// Pre-existing occurrences of the exact marker token and a leading `:root`
/// are stripped first, so rewriting already-rewritten output cannot stack
/// markers. The marker lands immediately after the first `html` occurrence
/// when the selector mentions one (`html`, `html[attr]`, `html:pseudo(...)`,
/// `… html …`); otherwise the selector is re-rooted under `html<marker>`.
fn add_marker(selector: &str, marker: &str) -> String {
  let stripped = selector.replace(marker, "");
  let mut cleaned = stripped.trim();
  if let Some(rest) = cleaned.strip_prefix(":root") {
    cleaned = rest.trim_start();
  }

  match cleaned.find("html") {
    Some(position) => {
      let after_html = position + "html".len();
      let mut out = String::with_capacity(cleaned.len() + marker.len());
      out.push_str(&cleaned[..after_html]);
      out.push_str(marker);
      out.push_str(&cleaned[after_html..]);
      out
    }
    None if cleaned.is_empty() => format!("html{marker}"),
    None => format!("html{marker} {cleaned}"),
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn transform(selectors: &[&str], marker: &str) -> Vec<String> {
    let owned: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
    transform_selectors(&owned, marker)
  }

  #[test]
  fn prepends_root_gate_to_plain_selectors() {
    assert_eq!(transform(&["section"], ".webp"), vec!["html.webp section"]);
    assert_eq!(
      transform(&[".logo > img"], ".no-webp"),
      vec!["html.no-webp .logo > img"]
    );
  }

  #[test]
  fn inserts_marker_after_the_first_html_token() {
    assert_eq!(transform(&["html"], ".webp"), vec!["html.webp"]);
    assert_eq!(
      transform(&["html[data-ready=\"true\"] main"], ".no-webp"),
      vec!["html.no-webp[data-ready=\"true\"] main"]
    );
    assert_eq!(
      transform(&["html:focus-within body"], ".webp"),
      vec!["html.webp:focus-within body"]
    );
    assert_eq!(
      transform(&[".wrap html p"], ".webp"),
      vec![".wrap html.webp p"]
    );
  }

  #[test]
  fn bare_root_pseudo_collapses_to_the_gate() {
    assert_eq!(transform(&[":root"], ".webp"), vec!["html.webp"]);
  }

  #[test]
  fn leading_root_pseudo_is_dropped() {
    assert_eq!(
      transform(&[":root .logo"], ".no-webp"),
      vec!["html.no-webp .logo"]
    );
  }

  #[test]
  fn rewriting_twice_does_not_stack_markers() {
    let once = transform(&["section"], ".webp");
    let twice = transform_selectors(&once, ".webp");
    assert_eq!(once, twice);
    assert_eq!(once[0].matches(".webp").count(), 1);
  }

  #[test]
  fn modules_mode_uses_global_syntax() {
    assert_eq!(marker_token("webp", true), ":global(.webp)");
    assert_eq!(marker_token("webp", false), ".webp");
    let once = transform(&[".logo"], ":global(.webp)");
    assert_eq!(once, vec!["html:global(.webp) .logo"]);
    assert_eq!(transform_selectors(&once, ":global(.webp)"), once);
  }

  #[test]
  fn preserves_list_length_and_order() {
    assert_eq!(
      transform(&["header", "html main", "footer"], ".webp"),
      vec!["html.webp header", "html.webp main", "html.webp footer"]
    );
  }
}
