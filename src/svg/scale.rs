//! Geometry scaling.
//!
//! [`GeometryScaler`] is the seam between the viewBox normalizer and the code
//! that actually rewrites coordinates. The contract: multiply all geometry by
//! `(sx, sy)` and scale the viewBox *extent*, leaving the viewBox *origin* as
//! it was.
//!
//! [`PathScaler`] is the built-in implementation:
//!
//! | Target                     | Rule                                          |
//! |----------------------------|-----------------------------------------------|
//! | path X / Y parameters      | `* sx` / `* sy`, absolute and relative        |
//! | arc radii                  | `rx * |sx|`, `ry * |sy|`                      |
//! | arc angle / sweep flag     | negated / flipped when `sx * sy < 0`          |
//! | shape x-like / y-like      | `* sx` / `* sy`                               |
//! | circle `r`                 | `* sqrt(|sx * sy|)`                           |
//! | `points`                   | alternating `* sx`, `* sy`                    |
//! | `transform`                | conjugated so it still lines up               |
//!
//! Content of a nested viewport (`svg` or `symbol` with a `viewBox`) and of
//! a `marker` lives in its own coordinate system. The scaler rewrites the
//! viewport's placement in the parent but does not descend into it.

use super::document::{Document, Element};
use super::error::SvgError;
use super::path::{CoordinateRole, PathData, format_number, parse_number_list};
use super::transform::{Transform, parse_transform};
use super::viewbox::ViewBox;

/// Parameter positions within an arc group.
const ARC_RX: usize = 0;
const ARC_RY: usize = 1;
const ARC_ANGLE: usize = 2;
const ARC_SWEEP: usize = 4;
const ARC_GROUP: usize = 7;

/// Which axis an attribute lives on.
#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    /// Both: scaled by the geometric mean.
    Mean,
}

/// Scaled attributes per element (by local name).
const SHAPE_ATTRIBUTES: &[(&str, &[(&str, Axis)])] = &[
    (
        "rect",
        &[
            ("x", Axis::X),
            ("y", Axis::Y),
            ("width", Axis::X),
            ("height", Axis::Y),
            ("rx", Axis::X),
            ("ry", Axis::Y),
        ],
    ),
    ("circle", &[("cx", Axis::X), ("cy", Axis::Y), ("r", Axis::Mean)]),
    (
        "ellipse",
        &[("cx", Axis::X), ("cy", Axis::Y), ("rx", Axis::X), ("ry", Axis::Y)],
    ),
    (
        "line",
        &[("x1", Axis::X), ("y1", Axis::Y), ("x2", Axis::X), ("y2", Axis::Y)],
    ),
    (
        "image",
        &[("x", Axis::X), ("y", Axis::Y), ("width", Axis::X), ("height", Axis::Y)],
    ),
    (
        "use",
        &[("x", Axis::X), ("y", Axis::Y), ("width", Axis::X), ("height", Axis::Y)],
    ),
    (
        "svg",
        &[("x", Axis::X), ("y", Axis::Y), ("width", Axis::X), ("height", Axis::Y)],
    ),
    (
        "symbol",
        &[("x", Axis::X), ("y", Axis::Y), ("width", Axis::X), ("height", Axis::Y)],
    ),
    (
        "text",
        &[("x", Axis::X), ("y", Axis::Y), ("dx", Axis::X), ("dy", Axis::Y)],
    ),
    (
        "tspan",
        &[("x", Axis::X), ("y", Axis::Y), ("dx", Axis::X), ("dy", Axis::Y)],
    ),
];

/// Scales a document's geometry.
pub trait GeometryScaler: Send + Sync {
    /// Multiply all geometry by `(sx, sy)` and scale the viewBox extent.
    /// The viewBox origin must be left unchanged.
    fn scale_geometry(&self, doc: &mut Document, sx: f64, sy: f64) -> Result<(), SvgError>;
}

/// Built-in scaler for path data and basic shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathScaler {
    /// Fractional digits for rewritten numbers (`None` = shortest exact).
    pub precision: Option<usize>,
}

impl PathScaler {
    pub const fn new(precision: Option<usize>) -> Self {
        Self { precision }
    }
}

impl GeometryScaler for PathScaler {
    fn scale_geometry(&self, doc: &mut Document, sx: f64, sy: f64) -> Result<(), SvgError> {
        let root = doc.root_mut();
        let viewbox = ViewBox::read(root)?;
        let scaled = ViewBox::new(
            viewbox.min_x,
            viewbox.min_y,
            viewbox.width * sx,
            viewbox.height * sy,
        );
        root.set_attr("viewBox", scaled.to_attr(self.precision));

        // The root's own transform is outside the viewBox coordinate system.
        for child in root.child_elements_mut() {
            self.scale_tree(child, sx, sy)?;
        }
        Ok(())
    }
}

impl PathScaler {
    fn scale_tree(&self, element: &mut Element, sx: f64, sy: f64) -> Result<(), SvgError> {
        self.scale_element(element, sx, sy)?;
        if establishes_viewport(element) {
            return Ok(());
        }
        for child in element.child_elements_mut() {
            self.scale_tree(child, sx, sy)?;
        }
        Ok(())
    }

    fn scale_element(&self, element: &mut Element, sx: f64, sy: f64) -> Result<(), SvgError> {
        if let Some(value) = element.attr("transform") {
            match conjugate_transform(value, sx, sy, self.precision) {
                Some(conjugated) => element.set_attr("transform", conjugated),
                None => crate::debug!("scale"; "<{}> keeps unreadable transform", element.name()),
            }
        }

        match element.local_name() {
            "path" => {
                if let Some(source) = element.attr("d") {
                    let mut data = PathData::parse(source)?;
                    scale_path(&mut data, sx, sy);
                    element.set_attr("d", data.serialize(self.precision));
                }
            }
            "polyline" | "polygon" => self.scale_points(element, sx, sy),
            local => {
                let Some((_, attributes)) = SHAPE_ATTRIBUTES.iter().find(|(name, _)| *name == local)
                else {
                    return Ok(());
                };
                for &(name, axis) in *attributes {
                    let factor = match axis {
                        Axis::X => sx,
                        Axis::Y => sy,
                        Axis::Mean => (sx * sy).abs().sqrt(),
                    };
                    self.scale_attr(element, name, factor);
                }
            }
        }
        Ok(())
    }

    /// Scale a numeric (or number-list) attribute. Values with units or
    /// percentages are left alone.
    fn scale_attr(&self, element: &mut Element, name: &str, factor: f64) {
        let Some(value) = element.attr(name) else {
            return;
        };
        let Ok(numbers) = parse_number_list(value) else {
            crate::debug!("scale"; "<{}> keeps {}=\"{}\"", element.name(), name, value);
            return;
        };
        let scaled = join_numbers(numbers.iter().map(|n| n.value() * factor), self.precision);
        element.set_attr(name, scaled);
    }

    fn scale_points(&self, element: &mut Element, sx: f64, sy: f64) {
        let Some(value) = element.attr("points") else {
            return;
        };
        let Ok(numbers) = parse_number_list(value) else {
            crate::debug!("scale"; "<{}> keeps unreadable points", element.name());
            return;
        };
        let scaled = numbers
            .iter()
            .enumerate()
            .map(|(index, n)| n.value() * if index % 2 == 0 { sx } else { sy });
        element.set_attr("points", join_numbers(scaled, self.precision));
    }
}

/// Elements whose children are drawn in a coordinate system of their own.
fn establishes_viewport(element: &Element) -> bool {
    match element.local_name() {
        "svg" | "symbol" => element.has_attr("viewBox"),
        "marker" => true,
        _ => false,
    }
}

fn join_numbers(values: impl Iterator<Item = f64>, precision: Option<usize>) -> String {
    values
        .map(|value| format_number(value, precision))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scale every command of a path by `(sx, sy)`.
///
/// Relative commands scale like absolute ones: a relative offset is a
/// difference of two scaled points. Under non-uniform scaling a rotated arc
/// is only approximated, since an ellipse's axes do not stay aligned.
pub fn scale_path(data: &mut PathData, sx: f64, sy: f64) {
    let mirrored = sx * sy < 0.0;
    for command in data.commands_mut() {
        let is_arc = command.letter().eq_ignore_ascii_case(&'a');
        for (index, (role, number)) in command.roles_mut().enumerate() {
            match role {
                CoordinateRole::X => number.set(number.value() * sx),
                CoordinateRole::Y => number.set(number.value() * sy),
                CoordinateRole::None if is_arc => match index % ARC_GROUP {
                    ARC_RX => number.set(number.value() * sx.abs()),
                    ARC_RY => number.set(number.value() * sy.abs()),
                    ARC_ANGLE if mirrored => number.set(-number.value()),
                    ARC_SWEEP if mirrored => number.set(1.0 - number.value()),
                    _ => {}
                },
                CoordinateRole::None => {}
            }
        }
    }
}

/// Rewrite a transform so it applies in scaled coordinates: `S * T * S^-1`.
///
/// A translation conjugates to a scaled translation; anything else is wrapped
/// in the two scales.
fn conjugate_transform(value: &str, sx: f64, sy: f64, precision: Option<usize>) -> Option<String> {
    let num = |n: f64| format_number(n, precision);
    match parse_transform(value).ok()? {
        Transform::Translate(op) if op.is_identity() => Some(value.to_string()),
        Transform::Translate(op) => Some(format!(
            "translate({} {})",
            num(op.tx * sx),
            num(op.ty * sy)
        )),
        Transform::Other if sx == 1.0 && sy == 1.0 => Some(value.to_string()),
        Transform::Other => Some(format!(
            "scale({} {}) {} scale({} {})",
            num(sx),
            num(sy),
            value.trim(),
            num(1.0 / sx),
            num(1.0 / sy),
        )),
    }
}
