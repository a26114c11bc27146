//! Output minification using usvg.
//!
//! Runs last, on the serialized normalized document. usvg resolves styles and
//! writes a compact tree; it may bake the viewBox origin into a root
//! transform, which leaves the rendered geometry unchanged.

use anyhow::{Context, Result};

/// Settings for the usvg pass.
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// DPI for unit conversion (`mm`, `in`, ...).
    pub dpi: f32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self { dpi: 96.0 }
    }
}

/// Re-emit a normalized document through usvg without indentation.
pub fn optimize_svg(content: &str, options: &OptimizeOptions) -> Result<String> {
    let parse_options = usvg::Options {
        dpi: options.dpi,
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(content, &parse_options)
        .context("usvg could not read the normalized document")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    Ok(tree.to_string(&write_options))
}
