//! Offsetting path coordinates.

use super::{CoordinateRole, PathData};
use crate::svg::error::PathError;

impl PathData {
    /// Add `(tx, ty)` to every absolute coordinate.
    ///
    /// Only parameters classified `X`/`Y` on uppercase commands move.
    /// Relative commands are already offset-independent, and radii, angles
    /// and flags are not positions.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        for command in self.commands_mut() {
            if !command.is_absolute() {
                continue;
            }
            for (role, number) in command.roles_mut() {
                match role {
                    CoordinateRole::X => number.set(number.value() + tx),
                    CoordinateRole::Y => number.set(number.value() + ty),
                    CoordinateRole::None => {}
                }
            }
        }
    }
}

/// Translate a `d` attribute value and serialize it again.
pub fn translate_path_data(
    source: &str,
    tx: f64,
    ty: f64,
    precision: Option<usize>,
) -> Result<String, PathError> {
    let mut data = PathData::parse(source)?;
    data.translate(tx, ty);
    Ok(data.serialize(precision))
}
