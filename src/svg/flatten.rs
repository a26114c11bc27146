//! Transform flattening.
//!
//! Folds `transform="translate(...)"` attributes into absolute path
//! coordinates and removes them.
//!
//! # Ordering
//!
//! Every transform-bearing element is pushed onto a worklist in document
//! (pre-)order. Popping therefore yields reverse pre-order: all descendants of
//! an element are handled before the element itself. For pure translations,
//! offsetting already-flattened inner geometry by the outer translation gives
//! the same result as composing the transforms first.
//!
//! ```text
//! <g translate(2,3)>            popped last:  M4 5 -> M6 8
//!   <g translate(4,5)>          popped first: M0 0 -> M4 5
//!     <path d="M0 0"/>
//! ```
//!
//! # What stays
//!
//! - transforms other than translate (not flattened by design)
//! - translates whose arguments do not parse
//! - group translates that cannot be pushed into every descendant: a
//!   descendant keeps its own transform, or draws without a `d` attribute
//! - translates on elements that are neither paths nor groups
//! - translates whose element or subtree references a resource through
//!   `url(...)` (`clip-path`, `mask`, `filter`, paint servers): a
//!   `userSpaceOnUse` resource would stay put while the paths move

use super::document::{Document, Element};
use super::error::SvgError;
use super::path::translate_path_data;
use super::transform::{Transform, TranslateOp, parse_transform};

/// Containers whose translate can be pushed into descendant paths.
const CONTAINERS: &[&str] = &["g", "a"];

/// Elements that carry geometry outside a `d` attribute, or establish a
/// coordinate system that a translated path would no longer line up with.
const BLOCKING: &[&str] = &[
    "rect",
    "circle",
    "ellipse",
    "line",
    "polyline",
    "polygon",
    "text",
    "use",
    "image",
    "svg",
    "foreignObject",
    "clipPath",
    "mask",
    "pattern",
    "marker",
    "linearGradient",
    "radialGradient",
    "filter",
];

/// What happened to the transforms of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Translates folded into path data and removed.
    pub flattened: usize,
    /// Non-translate transforms, or translates on unsupported elements.
    pub unsupported: usize,
    /// Translates whose arguments did not parse.
    pub unparsable: usize,
    /// Translates blocked by their subtree or a `url(...)` reference.
    pub blocked: usize,
}

impl FlattenReport {
    /// Transforms still present after flattening.
    pub fn remaining(&self) -> usize {
        self.unsupported + self.unparsable + self.blocked
    }
}

/// Flatten every translate in the document.
///
/// Fails only when a path that has to move holds invalid path data.
pub fn flatten_transforms(
    doc: &mut Document,
    precision: Option<usize>,
) -> Result<FlattenReport, SvgError> {
    let root = doc.root_mut();

    let mut worklist = Vec::new();
    collect_transformed(root, &mut Vec::new(), &mut worklist);

    let mut report = FlattenReport::default();
    while let Some(path) = worklist.pop() {
        let Some(element) = root.descendant_mut(&path) else {
            continue;
        };
        flatten_element(element, precision, &mut report)?;
    }
    Ok(report)
}

/// Push child-index paths of transform-bearing elements in pre-order.
fn collect_transformed(element: &Element, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if element.has_attr("transform") {
        out.push(path.clone());
    }
    for (index, child) in element.children().iter().enumerate() {
        if let Some(child) = child.as_element() {
            path.push(index);
            collect_transformed(child, path, out);
            path.pop();
        }
    }
}

fn flatten_element(
    element: &mut Element,
    precision: Option<usize>,
    report: &mut FlattenReport,
) -> Result<(), SvgError> {
    let Some(value) = element.attr("transform") else {
        return Ok(());
    };

    let op = match parse_transform(value) {
        Ok(Transform::Translate(op)) => op,
        Ok(Transform::Other) => {
            report.unsupported += 1;
            return Ok(());
        }
        Err(e) => {
            crate::debug!("flatten"; "<{}> keeps transform: {}", element.name(), e);
            report.unparsable += 1;
            return Ok(());
        }
    };

    if references_resource(element) {
        crate::debug!("flatten"; "<{}> keeps transform: references a url() resource", element.name());
        report.blocked += 1;
        return Ok(());
    }

    let local = element.local_name();
    if local == "path" {
        translate_path(element, op, precision)?;
    } else if CONTAINERS.contains(&local) {
        if let Some(blocker) = find_blocker(element) {
            crate::debug!("flatten"; "<{}> keeps transform: contains {}", element.name(), blocker);
            report.blocked += 1;
            return Ok(());
        }
        for child in element.child_elements_mut() {
            child.try_visit_mut(&mut |descendant| {
                if descendant.local_name() == "path" {
                    translate_path(descendant, op, precision)?;
                }
                Ok::<_, SvgError>(())
            })?;
        }
    } else {
        crate::debug!("flatten"; "<{}> keeps transform: not a path or group", element.name());
        report.unsupported += 1;
        return Ok(());
    }

    element.remove_attr("transform");
    report.flattened += 1;
    Ok(())
}

/// Describe the first descendant the translation cannot be pushed into.
fn find_blocker(element: &Element) -> Option<String> {
    element
        .find_descendant(&mut |descendant| {
            descendant.has_attr("transform")
                || BLOCKING.contains(&descendant.local_name())
                || references_resource(descendant)
        })
        .map(|descendant| {
            if descendant.has_attr("transform") {
                format!("<{}> with its own transform", descendant.name())
            } else if references_resource(descendant) {
                format!("<{}> referencing a url() resource", descendant.name())
            } else {
                format!("<{}>", descendant.name())
            }
        })
}

/// Any attribute (including `style`) pointing at a resource by `url(...)`.
fn references_resource(element: &Element) -> bool {
    element
        .attributes()
        .iter()
        .any(|attr| attr.value.contains("url("))
}

fn translate_path(
    element: &mut Element,
    op: TranslateOp,
    precision: Option<usize>,
) -> Result<(), SvgError> {
    if op.is_identity() {
        return Ok(());
    }
    let Some(source) = element.attr("d") else {
        return Ok(());
    };
    let translated = translate_path_data(source, op.tx, op.ty, precision)?;
    element.set_attr("d", translated);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(svg: &str) -> (String, FlattenReport) {
        let mut doc = Document::parse(svg).unwrap();
        let report = flatten_transforms(&mut doc, None).unwrap();
        (doc.to_svg_string().unwrap(), report)
    }

    #[test]
    fn test_group_translate() {
        let (out, report) = flatten(
            r#"<svg><g transform="translate(5,10)"><path d="M0,0 L10,10"/></g></svg>"#,
        );
        assert_eq!(out, r#"<svg><g><path d="M5 10 L15 20"/></g></svg>"#);
        assert_eq!(report.flattened, 1);
        assert_eq!(report.remaining(), 0);
    }

    #[test]
    fn test_path_translate() {
        let (out, _) = flatten(r#"<svg><path transform="translate(3)" d="M1 1 l2 2"/></svg>"#);
        assert_eq!(out, r#"<svg><path d="M4 1 l2 2"/></svg>"#);
    }

    #[test]
    fn test_compact_translate_is_flattened() {
        let (out, report) = flatten(
            r#"<svg><g transform="translate(5-3)"><path d="M0 0 L4 4"/></g></svg>"#,
        );
        assert_eq!(out, r#"<svg><g><path d="M5 -3 L9 1"/></g></svg>"#);
        assert_eq!(report.flattened, 1);
    }

    #[test]
    fn test_nested_translates_compose_inner_first() {
        let (out, report) = flatten(
            r#"<svg><g transform="translate(2,3)"><g transform="translate(4,5)"><path d="M0,0"/></g></g></svg>"#,
        );
        assert_eq!(out, r#"<svg><g><g><path d="M6 8"/></g></g></svg>"#);
        assert_eq!(report.flattened, 2);
    }

    #[test]
    fn test_nested_path_and_groups() {
        let (out, report) = flatten(
            r#"<svg><g transform="translate(10)"><path transform="translate(0,1)" d="M0 0"/><g transform="translate(1 1)"><path d="M0 0 h5"/></g><path d="M2 2"/></g></svg>"#,
        );
        assert_eq!(
            out,
            r#"<svg><g><path d="M10 1"/><g><path d="M11 1 h5"/></g><path d="M12 2"/></g></svg>"#
        );
        assert_eq!(report.flattened, 3);
    }

    #[test]
    fn test_rotate_left_untouched() {
        let svg = r#"<svg><g transform="rotate(45)"><path d="M0 0"/></g></svg>"#;
        let (out, report) = flatten(svg);
        assert_eq!(out, svg);
        assert_eq!(report.unsupported, 1);
    }

    #[test]
    fn test_unparsable_translate_untouched() {
        let svg = r#"<svg><g transform="translate(a,b)"><path d="M0 0"/></g></svg>"#;
        let (out, report) = flatten(svg);
        assert_eq!(out, svg);
        assert_eq!(report.unparsable, 1);
    }

    #[test]
    fn test_outer_blocked_by_inner_rotate() {
        let svg = r#"<svg><g transform="translate(5,5)"><g transform="rotate(10)"><path d="M1 1"/></g><path d="M0 0"/></g></svg>"#;
        let (out, report) = flatten(svg);
        // No partial mutation: the sibling path is not moved either.
        assert_eq!(out, svg);
        assert_eq!(report.unsupported, 1);
        assert_eq!(report.blocked, 1);
    }

    #[test]
    fn test_blocked_by_non_path_shape() {
        let svg = r#"<svg><g transform="translate(5,5)"><rect x="0" y="0" width="1" height="1"/><path d="M0 0"/></g></svg>"#;
        let (out, report) = flatten(svg);
        assert_eq!(out, svg);
        assert_eq!(report.blocked, 1);
    }

    #[test]
    fn test_translate_on_shape_is_unsupported() {
        let svg = r#"<svg><rect transform="translate(1,1)" width="2" height="2"/></svg>"#;
        let (out, report) = flatten(svg);
        assert_eq!(out, svg);
        assert_eq!(report.unsupported, 1);
    }

    #[test]
    fn test_identity_translate_removed_without_rewrite() {
        let (out, _) = flatten(r#"<svg><g transform="translate(0)"><path d="M1.0,2.0"/></g></svg>"#);
        assert_eq!(out, r#"<svg><g><path d="M1.0,2.0"/></g></svg>"#);
    }

    #[test]
    fn test_invalid_path_data_fails() {
        let mut doc =
            Document::parse(r#"<svg><g transform="translate(1)"><path d="M0"/></g></svg>"#).unwrap();
        assert!(matches!(
            flatten_transforms(&mut doc, None),
            Err(SvgError::Path(_))
        ));
    }

    #[test]
    fn test_non_drawing_children_do_not_block() {
        let (out, report) = flatten(
            r#"<svg><g transform="translate(1,1)"><title>t</title><a><path d="M0 0"/></a></g></svg>"#,
        );
        assert_eq!(
            out,
            r#"<svg><g><title>t</title><a><path d="M1 1"/></a></g></svg>"#
        );
        assert_eq!(report.flattened, 1);
    }

    #[test]
    fn test_url_references_block_flattening() {
        // Descendant clipped by a resource defined outside the group.
        let svg = concat!(
            r##"<svg><clipPath id="c" clipPathUnits="userSpaceOnUse"><path d="M0 0 h5 v5 z"/></clipPath>"##,
            r##"<g transform="translate(2,2)"><path d="M0 0" clip-path="url(#c)"/></g></svg>"##,
        );
        let (out, report) = flatten(svg);
        assert_eq!(out, svg);
        assert_eq!(report.blocked, 1);

        // Same for a path carrying both the translate and the reference.
        let svg = r##"<svg><path transform="translate(1)" style="fill:url(#g)" d="M0 0"/></svg>"##;
        let (out, report) = flatten(svg);
        assert_eq!(out, svg);
        assert_eq!(report.blocked, 1);
    }
}
