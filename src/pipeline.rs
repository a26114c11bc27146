//! Per-document processing.
//!
//! ```text
//! text ─► parse ─► [clean] ─► [flatten] ─► normalize ─► serialize ─► [optimize]
//! ```
//!
//! Stages run sequentially on one document. A missing or degenerate viewBox
//! turns into [`Processed::Skipped`]; every other error fails the document.

use anyhow::{Context, Result};

use crate::svg::{
    CleanOptions, CleanReport, Document, FlattenReport, GeometryScaler, OptimizeOptions,
    PathScaler, SvgError, ViewBoxOutcome, ViewBoxPolicy, Viewport, clean_document,
    flatten_transforms, normalize_viewbox, optimize_svg,
};

/// Settings for one run, shared by every document.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub target: Viewport,
    pub policy: ViewBoxPolicy,
    /// Run the transform flattener.
    pub flatten: bool,
    /// Fractional digits for rewritten numbers (`None` = shortest exact).
    pub precision: Option<usize>,
    /// Editor cleanup before flattening (`None` = disabled).
    pub clean: Option<CleanOptions>,
    /// usvg minification after serialization (`None` = disabled).
    pub optimize: Option<OptimizeOptions>,
}

impl PipelineOptions {
    pub fn new(target: Viewport) -> Self {
        Self {
            target,
            policy: ViewBoxPolicy::default(),
            flatten: true,
            precision: None,
            clean: None,
            optimize: None,
        }
    }
}

/// What the stages did to one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub clean: Option<CleanReport>,
    pub flatten: Option<FlattenReport>,
    pub viewbox: ViewBoxOutcome,
}

/// Result of processing one document.
#[derive(Debug)]
pub enum Processed {
    Normalized { svg: String, report: DocumentReport },
    /// Left alone; the error says why.
    Skipped(SvgError),
}

/// Process one document with the built-in [`PathScaler`].
pub fn process_svg(content: &str, options: &PipelineOptions) -> Result<Processed> {
    process_svg_with(content, options, &PathScaler::new(options.precision))
}

/// Process one document with a caller-provided scaler.
pub fn process_svg_with(
    content: &str,
    options: &PipelineOptions,
    scaler: &dyn GeometryScaler,
) -> Result<Processed> {
    let (svg, report) = match normalize_document(content, options, scaler) {
        Ok(normalized) => normalized,
        Err(e) if e.is_skip() => return Ok(Processed::Skipped(e)),
        Err(e) => return Err(e.into()),
    };

    let svg = match &options.optimize {
        Some(optimize) => {
            let optimized = optimize_svg(&svg, optimize).context("Optimize stage failed")?;
            crate::debug!("optimize"; "{} -> {} bytes", svg.len(), optimized.len());
            optimized
        }
        None => svg,
    };

    Ok(Processed::Normalized { svg, report })
}

fn normalize_document(
    content: &str,
    options: &PipelineOptions,
    scaler: &dyn GeometryScaler,
) -> Result<(String, DocumentReport), SvgError> {
    let mut doc = Document::parse(content)?;

    let clean = options
        .clean
        .as_ref()
        .map(|clean| clean_document(&mut doc, clean))
        .transpose()?;

    let flatten = if options.flatten {
        Some(flatten_transforms(&mut doc, options.precision)?)
    } else {
        None
    };

    let viewbox = normalize_viewbox(
        &mut doc,
        options.target,
        options.policy,
        scaler,
        options.precision,
    )?;

    let report = DocumentReport {
        clean,
        flatten,
        viewbox,
    };
    Ok((doc.to_svg_string()?, report))
}
