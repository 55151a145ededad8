use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a declaration references a raster image.
/// Receives the property name and the value text.
pub type CheckFn = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Rewrites a matched value for the capable-browser variant.
pub type RenameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// User configuration, resolved once per transform invocation.
///
/// `check` and `rename` fully replace the built-in classifier when set; the
/// defaults are [`crate::classifier::default_check`] and
/// [`crate::classifier::default_rename`].
#[derive(Clone)]
pub struct WebpOptions {
  pub check: Option<CheckFn>,
  pub rename: Option<RenameFn>,
  /// Marker class for browsers that decode WebP.
  pub webp_class: String,
  /// Marker class for browsers that do not.
  pub no_webp_class: String,
  pub no_js_class: String,
  /// Also gate the fallback rule on the no-script marker class.
  pub add_no_js: bool,
  /// Emit `:global(...)` marker syntax for CSS-modules stylesheets.
  pub modules: bool,
}

impl Default for WebpOptions {
  fn default() -> Self {
    Self {
      check: None,
      rename: None,
      webp_class: "webp".into(),
      no_webp_class: "no-webp".into(),
      no_js_class: "no-js".into(),
      add_no_js: false,
      modules: false,
    }
  }
}

impl fmt::Debug for WebpOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WebpOptions")
      .field("check", &self.check.as_ref().map(|_| "fn"))
      .field("rename", &self.rename.as_ref().map(|_| "fn"))
      .field("webp_class", &self.webp_class)
      .field("no_webp_class", &self.no_webp_class)
      .field("no_js_class", &self.no_js_class)
      .field("add_no_js", &self.add_no_js)
      .field("modules", &self.modules)
      .finish()
  }
}
