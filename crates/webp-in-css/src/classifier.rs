//! Default declaration classifier: raster-image detection and renaming.

use once_cell::sync::Lazy;
use regex::Regex;

static RASTER_EXTENSION: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif|avif)").expect("extension regex"));

static RASTER_MIME: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)image/(jpeg|png|gif|avif)").expect("mime regex"));

/// True when the value mentions a raster-image file extension anywhere,
/// case-insensitively. An empty value never matches.
pub fn default_check(value: &str) -> bool {
  RASTER_EXTENSION.is_match(value)
}

/// Replaces every raster extension with `.webp` and every raster MIME token
/// with `image/webp`. All occurrences are rewritten, so comma-separated URL
/// lists, `image-set()` sources and multi-layer `background` values come out
/// fully renamed. Extension and MIME substitutions are independent of each
/// other; no pairing between a URL and a sibling `type(...)` token is
/// attempted.
pub fn default_rename(value: &str) -> String {
  let renamed = RASTER_EXTENSION.replace_all(value, ".webp");
  RASTER_MIME.replace_all(renamed.as_ref(), "image/webp").into_owned()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn matches_raster_extensions() {
    assert!(default_check("url(./logo.png)"));
    assert!(default_check("url(photo.jpg)"));
    assert!(default_check("url(photo.jpeg)"));
    assert!(default_check("url(anim.gif)"));
    assert!(default_check("url(still.avif)"));
  }

  #[test]
  fn matching_is_case_insensitive() {
    assert!(default_check("url(LOGO.PNG)"));
    assert!(default_check("url(Photo.Jpeg)"));
  }

  #[test]
  fn ignores_other_values() {
    assert!(!default_check("url(icon.svg)"));
    assert!(!default_check("url(already.webp)"));
    assert!(!default_check("red"));
    assert!(!default_check(""));
  }

  #[test]
  fn renames_every_url_in_a_value() {
    assert_eq!(
      default_rename("url(a.png), url(b.jpg)"),
      "url(a.webp), url(b.webp)"
    );
  }

  #[test]
  fn renames_extensions_and_mime_tokens() {
    assert_eq!(
      default_rename("image-set(url(hero.png) type(\"image/png\"), url(hero.jpg) type(\"image/jpeg\"))"),
      "image-set(url(hero.webp) type(\"image/webp\"), url(hero.webp) type(\"image/webp\"))"
    );
  }

  #[test]
  fn renames_mime_tokens_without_a_matching_extension() {
    // The two substitutions do not cross-validate; a MIME token is renamed
    // even when no URL extension in the value matches.
    assert_eq!(
      default_rename("url(photo.heic) type(\"image/png\")"),
      "url(photo.heic) type(\"image/webp\")"
    );
  }

  #[test]
  fn rename_preserves_unrelated_text() {
    assert_eq!(
      default_rename("linear-gradient(red, blue), url(bg.gif) no-repeat"),
      "linear-gradient(red, blue), url(bg.webp) no-repeat"
    );
  }

  #[test]
  fn rename_is_case_insensitive() {
    assert_eq!(default_rename("url(LOGO.PNG)"), "url(LOGO.webp)");
  }
}
