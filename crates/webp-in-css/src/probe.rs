//! Runtime feature probe shipped alongside the transformed stylesheet.

/// Probe script applied once per page load, inlined into the page by build
/// tooling (no configuration surface).
///
/// On execution it swaps `no-js` for `js` on the document root, then decodes
/// a minimal embedded WebP sample: on load success it adds `webp` when the
/// decoded height is non-zero and `no-webp` otherwise; on load error it adds
/// `no-webp`. Exactly one marker class is added, exactly once. There is no
/// retry and no timeout — if neither callback fires, the root keeps neither
/// marker and fallback-gated rules stay in effect.
pub const PROBE_SCRIPT: &str = r#"(function () {
  var html = document.documentElement;
  html.classList.remove('no-js');
  html.classList.add('js');
  var image = new Image();
  image.onerror = function () {
    html.classList.add('no-webp');
  };
  image.onload = function () {
    html.classList.add(image.height > 0 ? 'webp' : 'no-webp');
  };
  image.src = 'data:image/webp;base64,UklGRjoAAABXRUJQVlA4IC4AAACyAgCdASoCAAIALmk0mk0iIiIiIgBoSygABc6WWgAA/veff/0PP8bA//LwYAAA';
})();
"#;
