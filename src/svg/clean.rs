//! Editor cleanup.
//!
//! Strips what drawing editors leave behind before geometry is touched:
//! comments, foreign-namespace elements and attributes, `defs`, Inkscape
//! style properties, guide strokes, and root `width`/`height`.

use rustc_hash::{FxHashMap, FxHashSet};

use super::document::{Attribute, Document, Element, Node};
use super::error::SvgError;
use super::path::format_number;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const INKSCAPE_PREFIX: &str = "-inkscape";

/// Elements that may be removed as guides.
const GUIDE_ELEMENTS: &[&str] = &["g", "path"];

/// Cleanup settings.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// `g`/`path` elements whose `stroke` or `style` contains one of these are
    /// removed.
    pub guide_colors: Vec<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            guide_colors: vec!["#999".to_string()],
        }
    }
}

/// What cleanup removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub comments: usize,
    pub elements: usize,
    pub attributes: usize,
    pub guides: usize,
    pub namespaces: usize,
    /// A viewBox was derived from the root `width`/`height`.
    pub viewbox_from_size: bool,
}

/// Clean a document in place.
///
/// Fails with [`SvgError::MissingViewBox`] (a skip) when the root has neither
/// a viewBox nor a size, and with [`SvgError::InvalidSize`] when the size has
/// to become a viewBox but is not numeric.
pub fn clean_document(doc: &mut Document, options: &CleanOptions) -> Result<CleanReport, SvgError> {
    let mut report = CleanReport {
        comments: doc.remove_top_level_comments(),
        ..CleanReport::default()
    };

    let guide_colors: Vec<String> = options
        .guide_colors
        .iter()
        .map(|color| color.to_ascii_lowercase())
        .collect();

    let root = doc.root_mut();
    let namespaces = declared_namespaces(root);
    clean_attributes(root, &mut report);
    clean_children(root, &namespaces, &guide_colors, &mut report);
    remove_unused_namespaces(root, &mut report);
    report.viewbox_from_size = normalize_root_size(root)?;

    Ok(report)
}

/// `xmlns:prefix` declarations on the root.
fn declared_namespaces(root: &Element) -> FxHashMap<String, String> {
    root.attributes()
        .iter()
        .filter_map(|attr| {
            let prefix = attr.name.strip_prefix("xmlns:")?;
            Some((prefix.to_string(), attr.value.clone()))
        })
        .collect()
}

fn is_foreign(element: &Element, namespaces: &FxHashMap<String, String>) -> bool {
    match element.prefix() {
        None => false,
        Some(prefix) => namespaces.get(prefix).map(String::as_str) != Some(SVG_NAMESPACE),
    }
}

fn is_guide(element: &Element, guide_colors: &[String]) -> bool {
    if !GUIDE_ELEMENTS.contains(&element.local_name()) {
        return false;
    }
    ["stroke", "style"].iter().any(|name| {
        element.attr(name).is_some_and(|value| {
            let value = value.to_ascii_lowercase();
            guide_colors.iter().any(|color| value.contains(color.as_str()))
        })
    })
}

fn clean_children(
    element: &mut Element,
    namespaces: &FxHashMap<String, String>,
    guide_colors: &[String],
    report: &mut CleanReport,
) {
    element.children_mut().retain(|node| match node {
        Node::Other(_) if node.is_comment() => {
            report.comments += 1;
            false
        }
        Node::Other(_) => true,
        Node::Element(child) => {
            if child.local_name() == "defs" || is_foreign(child, namespaces) {
                report.elements += 1;
                false
            } else if is_guide(child, guide_colors) {
                report.guides += 1;
                false
            } else {
                true
            }
        }
    });

    for child in element.child_elements_mut() {
        clean_attributes(child, report);
        clean_children(child, namespaces, guide_colors, report);
    }
}

/// Drop prefixed and `-inkscape` attributes and `-inkscape` style properties.
fn clean_attributes(element: &mut Element, report: &mut CleanReport) {
    report.attributes += element.retain_attributes(|attr| {
        let namespaced = attr.name.contains(':') && !attr.name.starts_with("xmlns:");
        !namespaced && !attr.name.starts_with(INKSCAPE_PREFIX)
    });

    let Some(style) = element.attr("style") else {
        return;
    };
    let declarations: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    let kept: Vec<&str> = declarations
        .iter()
        .copied()
        .filter(|part| !part.starts_with(INKSCAPE_PREFIX))
        .collect();
    if kept.len() == declarations.len() {
        return;
    }
    if kept.is_empty() {
        element.remove_attr("style");
    } else {
        let style = kept.join("; ");
        element.set_attr("style", style);
    }
}

/// Remove `xmlns:prefix` declarations that nothing in the tree uses anymore.
fn remove_unused_namespaces(root: &mut Element, report: &mut CleanReport) {
    let mut used = FxHashSet::default();
    collect_prefixes(root, &mut used);
    report.namespaces += root.retain_attributes(|attr| match attr.name.strip_prefix("xmlns:") {
        Some(prefix) => used.contains(prefix),
        None => true,
    });
}

fn collect_prefixes(element: &Element, used: &mut FxHashSet<String>) {
    if let Some(prefix) = element.prefix() {
        used.insert(prefix.to_string());
    }
    for Attribute { name, .. } in element.attributes() {
        if let Some((prefix, _)) = name.split_once(':')
            && prefix != "xmlns"
        {
            used.insert(prefix.to_string());
        }
    }
    for child in element.child_elements() {
        collect_prefixes(child, used);
    }
}

/// Fold the root size into the viewBox. Returns whether a viewBox was created.
///
/// | width+height | viewBox | result                                    |
/// |--------------|---------|-------------------------------------------|
/// | no           | yes     | unchanged                                 |
/// | no           | no      | `MissingViewBox`                          |
/// | yes          | no      | `viewBox="0 0 w h"`, size removed         |
/// | yes          | yes     | viewBox kept, size removed                |
fn normalize_root_size(root: &mut Element) -> Result<bool, SvgError> {
    let has_viewbox = root.has_attr("viewBox");
    let (Some(width), Some(height)) = (root.attr("width"), root.attr("height")) else {
        return if has_viewbox {
            Ok(false)
        } else {
            Err(SvgError::MissingViewBox)
        };
    };

    let created = if has_viewbox {
        false
    } else {
        let size = |value: &str| value.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        let (Some(w), Some(h)) = (size(width), size(height)) else {
            return Err(SvgError::InvalidSize {
                width: width.to_string(),
                height: height.to_string(),
            });
        };
        let viewbox = format!("0 0 {} {}", format_number(w, None), format_number(h, None));
        root.set_attr("viewBox", viewbox);
        true
    };

    root.remove_attr("width");
    root.remove_attr("height");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(svg: &str) -> (String, CleanReport) {
        let mut doc = Document::parse(svg).unwrap();
        let report = clean_document(&mut doc, &CleanOptions::default()).unwrap();
        (doc.to_svg_string().unwrap(), report)
    }

    #[test]
    fn test_strips_editor_noise() {
        let (out, report) = clean(concat!(
            r#"<!-- head --><svg xmlns="http://www.w3.org/2000/svg" "#,
            r#"xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" "#,
            r#"xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" "#,
            r#"viewBox="0 0 10 10" inkscape:version="1.3">"#,
            r#"<sodipodi:namedview/><defs><linearGradient/></defs><!-- c -->"#,
            r#"<path d="M0 0" inkscape:label="a" style="fill:red;-inkscape-font-specification:x"/>"#,
            r#"</svg>"#,
        ));
        assert_eq!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><path d="M0 0" style="fill:red"/></svg>"#
        );
        assert_eq!(report.comments, 2);
        assert_eq!(report.elements, 2);
        assert_eq!(report.attributes, 2);
        assert_eq!(report.namespaces, 2);
    }

    #[test]
    fn test_emptied_style_removed() {
        let (out, _) = clean(
            r#"<svg viewBox="0 0 1 1"><path d="M0 0" style="-inkscape-stroke:none"/></svg>"#,
        );
        assert_eq!(out, r#"<svg viewBox="0 0 1 1"><path d="M0 0"/></svg>"#);
    }

    #[test]
    fn test_untouched_style_keeps_text() {
        let svg = r#"<svg viewBox="0 0 1 1"><path d="M0 0" style="fill:red;stroke:blue;"/></svg>"#;
        assert_eq!(clean(svg).0, svg);
    }

    #[test]
    fn test_guides_removed() {
        let (out, report) = clean(concat!(
            r##"<svg viewBox="0 0 1 1">"##,
            r##"<g stroke="#999999"><path d="M0 0"/></g>"##,
            r##"<path d="M1 1" style="stroke:#999"/>"##,
            r##"<rect stroke="#999"/>"##,
            r##"<path d="M2 2" stroke="#000"/>"##,
            r##"</svg>"##,
        ));
        assert_eq!(
            out,
            r##"<svg viewBox="0 0 1 1"><rect stroke="#999"/><path d="M2 2" stroke="#000"/></svg>"##
        );
        assert_eq!(report.guides, 2);
    }

    #[test]
    fn test_size_becomes_viewbox() {
        let (out, report) = clean(r#"<svg width="24" height="12.5"><path d="M0 0"/></svg>"#);
        assert_eq!(out, r#"<svg viewBox="0 0 24 12.5"><path d="M0 0"/></svg>"#);
        assert!(report.viewbox_from_size);
    }

    #[test]
    fn test_size_dropped_when_viewbox_present() {
        let (out, report) = clean(r#"<svg width="1in" height="1in" viewBox="0 0 5 5"/>"#);
        assert_eq!(out, r#"<svg viewBox="0 0 5 5"/>"#);
        assert!(!report.viewbox_from_size);
    }

    #[test]
    fn test_size_errors() {
        let mut doc = Document::parse(r#"<svg><path d="M0 0"/></svg>"#).unwrap();
        let err = clean_document(&mut doc, &CleanOptions::default()).unwrap_err();
        assert!(err.is_skip());

        let mut doc = Document::parse(r#"<svg width="10mm" height="5mm"/>"#).unwrap();
        let err = clean_document(&mut doc, &CleanOptions::default()).unwrap_err();
        assert!(matches!(err, SvgError::InvalidSize { .. }));
        assert!(!err.is_skip());
    }

    #[test]
    fn test_svg_prefixed_elements_kept() {
        let (out, _) = clean(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" viewBox="0 0 1 1"><svg:path d="M0 0"/></svg:svg>"#,
        );
        assert_eq!(
            out,
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" viewBox="0 0 1 1"><svg:path d="M0 0"/></svg:svg>"#
        );
    }
}
