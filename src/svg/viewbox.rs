//! viewBox normalization.
//!
//! Rescales a document to a target viewport. Geometry scaling is delegated to
//! a [`GeometryScaler`], which scales path data and the viewBox *extent* but
//! leaves the viewBox *origin* alone; this module then rewrites the viewBox so
//! origin and extent both agree with the scaled content.
//!
//! | Policy          | New viewBox                                        |
//! |-----------------|----------------------------------------------------|
//! | `origin-scaled` | `min_x*sx min_y*sy target_w target_h`              |
//! | `origin-reset`  | `0 0 target_w target_h`                            |

use serde::{Deserialize, Serialize};

use super::document::{Document, Element};
use super::error::SvgError;
use super::path::{format_number, parse_number_list};
use super::scale::GeometryScaler;

/// Drawable elements that are not paths (pathify has not run if present).
const NON_PATH_SHAPES: &[&str] = &[
    "rect", "circle", "ellipse", "line", "polyline", "polygon", "text", "image", "use",
];

// ============================================================================
// ViewBox
// ============================================================================

/// `min-x min-y width height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Parse four numbers in SVG number syntax (whitespace, commas, or a
    /// sign between them).
    pub fn parse(value: &str) -> Result<Self, SvgError> {
        let invalid = || SvgError::InvalidViewBox(value.to_string());
        let numbers = parse_number_list(value).map_err(|_| invalid())?;

        match numbers.as_slice() {
            [min_x, min_y, width, height] => Ok(Self::new(
                min_x.value(),
                min_y.value(),
                width.value(),
                height.value(),
            )),
            _ => Err(invalid()),
        }
    }

    /// Read the root element's viewBox.
    pub fn read(root: &Element) -> Result<Self, SvgError> {
        let value = root.attr("viewBox").ok_or(SvgError::MissingViewBox)?;
        Self::parse(value)
    }

    /// Width or height not strictly positive.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn to_attr(&self, precision: Option<usize>) -> String {
        [self.min_x, self.min_y, self.width, self.height]
            .map(|n| format_number(n, precision))
            .join(" ")
    }
}

// ============================================================================
// Policy and target
// ============================================================================

/// How the viewBox origin is rewritten after scaling.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewBoxPolicy {
    /// Scale the origin by the same per-axis factors as the content.
    #[default]
    OriginScaled,
    /// Reset the origin to `0 0`. Assumes shapes were converted to paths and
    /// transforms flattened.
    OriginReset,
}

/// Target viewport extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Before/after record of one normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBoxOutcome {
    pub before: ViewBox,
    pub after: ViewBox,
    pub scale_x: f64,
    pub scale_y: f64,
}

// ============================================================================
// Normalizer
// ============================================================================

/// Scale the document to `target` and rewrite its viewBox per `policy`.
///
/// A missing or degenerate viewBox is returned as an error the caller treats
/// as a skip ([`SvgError::is_skip`]); the document is not modified.
pub fn normalize_viewbox(
    doc: &mut Document,
    target: Viewport,
    policy: ViewBoxPolicy,
    scaler: &dyn GeometryScaler,
    precision: Option<usize>,
) -> Result<ViewBoxOutcome, SvgError> {
    let root = doc.root();
    let before = ViewBox::read(root)?;
    if before.is_degenerate() {
        return Err(SvgError::DegenerateViewBox(
            root.attr("viewBox").unwrap_or_default().to_string(),
        ));
    }
    if policy == ViewBoxPolicy::OriginReset
        && let Some(shape) = root.find_descendant(&mut |el| NON_PATH_SHAPES.contains(&el.local_name()))
    {
        crate::debug!("viewbox"; "origin reset with unconverted <{}> present", shape.name());
    }

    let scale_x = target.width / before.width;
    let scale_y = target.height / before.height;
    scaler.scale_geometry(doc, scale_x, scale_y)?;

    // The scaler leaves the origin where it was. Scale it from the parsed
    // value, not the rewritten attribute, so it is rounded only once.
    let after = match policy {
        ViewBoxPolicy::OriginScaled => ViewBox::new(
            before.min_x * scale_x,
            before.min_y * scale_y,
            target.width,
            target.height,
        ),
        ViewBoxPolicy::OriginReset => ViewBox::new(0.0, 0.0, target.width, target.height),
    };
    doc.root_mut().set_attr("viewBox", after.to_attr(precision));

    Ok(ViewBoxOutcome {
        before,
        after,
        scale_x,
        scale_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::path::PathData;
    use crate::svg::scale::PathScaler;

    fn normalize(
        svg: &str,
        target: Viewport,
        policy: ViewBoxPolicy,
    ) -> Result<(Document, ViewBoxOutcome), SvgError> {
        let mut doc = Document::parse(svg)?;
        let outcome = normalize_viewbox(&mut doc, target, policy, &PathScaler::default(), None)?;
        Ok((doc, outcome))
    }

    fn path_values(doc: &Document) -> Vec<Vec<f64>> {
        let d = doc.root().child_elements().next().unwrap().attr("d").unwrap();
        PathData::parse(d)
            .unwrap()
            .commands()
            .iter()
            .map(|c| c.values())
            .collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ViewBox::parse("10,20 200 100").unwrap(),
            ViewBox::new(10.0, 20.0, 200.0, 100.0)
        );
        assert_eq!(
            ViewBox::parse(" -1.5  2e1,3 ,4 ").unwrap(),
            ViewBox::new(-1.5, 20.0, 3.0, 4.0)
        );
        assert_eq!(
            ViewBox::parse("-5-5 10 10").unwrap(),
            ViewBox::new(-5.0, -5.0, 10.0, 10.0)
        );
        assert!(matches!(ViewBox::parse("0 0 10"), Err(SvgError::InvalidViewBox(_))));
        assert!(matches!(ViewBox::parse("0 0 a 10"), Err(SvgError::InvalidViewBox(_))));
        assert!(matches!(ViewBox::parse("0 0 10 10 10"), Err(SvgError::InvalidViewBox(_))));
    }

    #[test]
    fn test_degenerate() {
        assert!(ViewBox::new(0.0, 0.0, 0.0, 50.0).is_degenerate());
        assert!(ViewBox::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(!ViewBox::new(-5.0, -5.0, 10.0, 10.0).is_degenerate());
    }

    #[test]
    fn test_origin_reset_scales_each_axis() {
        let (doc, outcome) = normalize(
            r#"<svg viewBox="0 0 200 100"><path d="M200 100 L50 30 h10 v10 Z"/></svg>"#,
            Viewport::new(100.0, 100.0),
            ViewBoxPolicy::OriginReset,
        )
        .unwrap();
        assert_eq!(doc.root().attr("viewBox"), Some("0 0 100 100"));
        assert_eq!((outcome.scale_x, outcome.scale_y), (0.5, 1.0));
        assert_eq!(
            path_values(&doc),
            vec![
                vec![100.0, 100.0],
                vec![25.0, 30.0],
                vec![5.0],
                vec![10.0],
                vec![]
            ]
        );
    }

    #[test]
    fn test_origin_scaled_keeps_origin_consistent() {
        let (doc, outcome) = normalize(
            r#"<svg viewBox="10 20 200 100"><path d="M10 20 L210 120"/></svg>"#,
            Viewport::new(100.0, 50.0),
            ViewBoxPolicy::OriginScaled,
        )
        .unwrap();
        assert_eq!(doc.root().attr("viewBox"), Some("5 10 100 50"));
        assert_eq!(outcome.after, ViewBox::new(5.0, 10.0, 100.0, 50.0));
        // The viewBox corners still map onto the content corners.
        assert_eq!(path_values(&doc), vec![vec![5.0, 10.0], vec![105.0, 60.0]]);
    }

    #[test]
    fn test_origin_reset_discards_origin() {
        let (doc, _) = normalize(
            r#"<svg viewBox="10 20 200 100"><path d="M0 0"/></svg>"#,
            Viewport::new(100.0, 50.0),
            ViewBoxPolicy::OriginReset,
        )
        .unwrap();
        assert_eq!(doc.root().attr("viewBox"), Some("0 0 100 50"));
    }

    #[test]
    fn test_missing_and_degenerate_are_skips() {
        let err = normalize(
            r#"<svg><path d="M0 0"/></svg>"#,
            Viewport::new(10.0, 10.0),
            ViewBoxPolicy::OriginReset,
        )
        .unwrap_err();
        assert!(matches!(err, SvgError::MissingViewBox));
        assert!(err.is_skip());

        let err = normalize(
            r#"<svg viewBox="0 0 0 50"><path d="M0 0"/></svg>"#,
            Viewport::new(10.0, 10.0),
            ViewBoxPolicy::OriginReset,
        )
        .unwrap_err();
        assert!(matches!(err, SvgError::DegenerateViewBox(ref v) if v == "0 0 0 50"));
        assert!(err.is_skip());
    }

    #[test]
    fn test_invalid_viewbox_is_a_failure() {
        let err = normalize(
            r#"<svg viewBox="0 0 ten 50"/>"#,
            Viewport::new(10.0, 10.0),
            ViewBoxPolicy::OriginScaled,
        )
        .unwrap_err();
        assert!(!err.is_skip());
    }

    #[test]
    fn test_policy_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: ViewBoxPolicy,
        }
        let parsed: Wrapper = toml::from_str("policy = \"origin-reset\"").unwrap();
        assert_eq!(parsed.policy, ViewBoxPolicy::OriginReset);
        let parsed: Wrapper = toml::from_str("policy = \"origin-scaled\"").unwrap();
        assert_eq!(parsed.policy, ViewBoxPolicy::OriginScaled);
    }

    #[test]
    fn test_origin_rounded_once_under_precision() {
        let mut doc =
            Document::parse(r#"<svg viewBox="0.126 0 1 1"><path d="M0.126 0"/></svg>"#).unwrap();
        normalize_viewbox(
            &mut doc,
            Viewport::new(10.0, 10.0),
            ViewBoxPolicy::OriginScaled,
            &PathScaler::new(Some(2)),
            Some(2),
        )
        .unwrap();
        assert_eq!(
            doc.to_svg_string().unwrap(),
            r#"<svg viewBox="1.26 0 10 10"><path d="M1.26 0"/></svg>"#
        );
    }
}
