//! Path data model.
//!
//! A `d` attribute is parsed into a [`PathData`]: an ordered list of
//! [`PathCommand`]s, each a command letter plus its parameters. Implicit
//! repetition (`M0 0 10 10 20 20`) stays inside the command record that
//! introduced it, so the role of each parameter is found by cycling through
//! the command's pattern (see [`pattern`]).
//!
//! Numbers remember the text they were parsed from. Serializing a path that
//! was never modified reproduces every literal; only rewritten numbers are
//! formatted anew.

mod parse;
pub mod pattern;
mod translate;

use smallvec::SmallVec;
use std::fmt;

pub use parse::parse_number_list;
pub use pattern::CoordinateRole;
pub use translate::translate_path_data;

use super::error::PathError;

// ============================================================================
// Number
// ============================================================================

/// A path parameter: the value plus its original literal, if unchanged.
#[derive(Debug, Clone)]
pub struct Number {
    value: f64,
    literal: Option<Box<str>>,
}

impl Number {
    /// A number read from source text.
    pub fn parsed(value: f64, literal: &str) -> Self {
        Self {
            value,
            literal: Some(literal.into()),
        }
    }

    /// A computed number with no source text.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            literal: None,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value. The literal is dropped only if the value changed.
    pub fn set(&mut self, value: f64) {
        if value != self.value {
            self.value = value;
            self.literal = None;
        }
    }

    /// Write the number, keeping the literal when there is one.
    pub fn write(&self, out: &mut String, precision: Option<usize>) {
        match &self.literal {
            Some(literal) => out.push_str(literal),
            None => out.push_str(&format_number(self.value, precision)),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Format a computed number.
///
/// Without a precision this is the shortest representation that round-trips
/// through `f64`. With one, the value is rounded to at most `precision`
/// fractional digits and trailing zeros are trimmed. Negative zero is `0`.
pub fn format_number(value: f64, precision: Option<usize>) -> String {
    let mut text = match precision {
        Some(digits) => {
            let fixed = format!("{value:.digits$}");
            if fixed.contains('.') {
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                fixed
            }
        }
        None => format!("{value}"),
    };
    if text == "-0" {
        text.remove(0);
    }
    text
}

// ============================================================================
// PathCommand
// ============================================================================

/// Parameters of one command. Most commands fit inline.
pub type Params = SmallVec<[Number; 7]>;

/// One command letter and all parameters attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    letter: char,
    params: Params,
}

impl PathCommand {
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            params: Params::new(),
        }
    }

    /// Build a command from plain values (used by tests and computed paths).
    pub fn with_values(letter: char, values: &[f64]) -> Self {
        Self {
            letter,
            params: values.iter().copied().map(Number::new).collect(),
        }
    }

    #[inline]
    pub fn letter(&self) -> char {
        self.letter
    }

    /// Uppercase letters address the document's coordinate system.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.letter.is_ascii_uppercase()
    }

    pub fn params(&self) -> &[Number] {
        &self.params
    }

    pub(crate) fn push(&mut self, number: Number) {
        self.params.push(number);
    }

    /// Parameters paired with their coordinate role.
    pub fn roles_mut(&mut self) -> impl Iterator<Item = (CoordinateRole, &mut Number)> {
        let letter = self.letter;
        self.params
            .iter_mut()
            .enumerate()
            .map(move |(index, number)| (pattern::role(letter, index), number))
    }

    /// Parameter values, for comparisons.
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(Number::value).collect()
    }

    fn write(&self, out: &mut String, precision: Option<usize>) {
        out.push(self.letter);
        for (index, number) in self.params.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            number.write(out, precision);
        }
    }
}

// ============================================================================
// PathData
// ============================================================================

/// A parsed `d` attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    /// Parse path data.
    ///
    /// An empty or whitespace-only string yields an empty path.
    pub fn parse(source: &str) -> Result<Self, PathError> {
        parse::parse_commands(source).map(|commands| Self { commands })
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut [PathCommand] {
        &mut self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Serialize with the given precision for rewritten numbers.
    pub fn serialize(&self, precision: Option<usize>) -> String {
        let mut out = String::new();
        for (index, command) in self.commands.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            command.write(&mut out, precision);
        }
        out
    }
}

impl From<Vec<PathCommand>> for PathData {
    fn from(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0, None), "5");
        assert_eq!(format_number(-2.5, None), "-2.5");
        assert_eq!(format_number(0.1 + 0.2, None), "0.30000000000000004");
        assert_eq!(format_number(0.1 + 0.2, Some(3)), "0.3");
        assert_eq!(format_number(12.0, Some(3)), "12");
        assert_eq!(format_number(-0.0, None), "0");
        assert_eq!(format_number(-0.0001, Some(2)), "0");
    }

    #[test]
    fn test_number_keeps_literal_until_changed() {
        let mut number = Number::parsed(1.5, "1.50");
        let mut out = String::new();
        number.write(&mut out, None);
        assert_eq!(out, "1.50");

        number.set(1.5);
        out.clear();
        number.write(&mut out, None);
        assert_eq!(out, "1.50");

        number.set(2.0);
        out.clear();
        number.write(&mut out, None);
        assert_eq!(out, "2");
    }

    #[test]
    fn test_serialize_preserves_literals() {
        let data = PathData::parse("M.5,1e1 l-3-4 Z").unwrap();
        assert_eq!(data.to_string(), "M.5 1e1 l-3 -4 Z");
    }

    #[test]
    fn test_serialize_computed() {
        let data = PathData::from(vec![
            PathCommand::with_values('M', &[5.0, 10.0]),
            PathCommand::with_values('L', &[15.0, 20.0]),
            PathCommand::new('Z'),
        ]);
        assert_eq!(data.to_string(), "M5 10 L15 20 Z");
    }

    #[test]
    fn test_roles_mut() {
        let mut command = PathCommand::with_values('A', &[5.0, 5.0, 0.0, 1.0, 0.0, 10.0, 20.0]);
        let roles: Vec<_> = command.roles_mut().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            vec![
                CoordinateRole::None,
                CoordinateRole::None,
                CoordinateRole::None,
                CoordinateRole::None,
                CoordinateRole::None,
                CoordinateRole::X,
                CoordinateRole::Y,
            ]
        );
    }
}
