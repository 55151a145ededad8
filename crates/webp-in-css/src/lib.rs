//! Build-time WebP rewriting for CSS.
//!
//! Every style rule that references a raster image is split into two
//! class-gated variants: `html.webp …` with the image URLs renamed to
//! `.webp`, and `html.no-webp …` carrying the originals. A runtime probe
//! ([`PROBE_SCRIPT`]) decides once per page load which of the two marker
//! classes the document root receives, so browsers without WebP support
//! keep working off the fallback rules.
//!
//! The transform operates on the swc CSS AST: [`transform_css`] parses a
//! stylesheet, walks every rule exactly once through [`WebpPlugin`], inserts
//! the collected variant rules after the walk, and serializes the result.

pub mod classifier;
pub mod options;
pub mod plugin;
pub mod probe;
pub mod selectors;
pub mod transform;
mod utils;

pub use options::{CheckFn, RenameFn, WebpOptions};
pub use plugin::{RulePath, WebpPlugin};
pub use probe::PROBE_SCRIPT;
pub use transform::{transform_css, TransformError};
