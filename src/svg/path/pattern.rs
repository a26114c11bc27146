//! Coordinate-role patterns for path commands.
//!
//! Each command letter maps to a repeating pattern that classifies its
//! parameters by position. The role of a parameter depends only on the letter
//! and `index % pattern.len()`, never on the value.
//!
//! | Command | Pattern              | Group |
//! |---------|----------------------|-------|
//! | M L T   | x y                  | 2     |
//! | H       | x                    | 1     |
//! | V       | y                    | 1     |
//! | S Q     | x y x y              | 4     |
//! | C       | x y x y x y          | 6     |
//! | A       | - - - - - x y        | 7     |
//! | Z       | (none)               | 0     |

/// Role of a single path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateRole {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Radius, angle, flag, or a parameter of an unknown command.
    None,
}

const X: CoordinateRole = CoordinateRole::X;
const Y: CoordinateRole = CoordinateRole::Y;
const N: CoordinateRole = CoordinateRole::None;

/// Pattern table keyed by uppercase command letter.
static PATTERNS: [(char, &[CoordinateRole]); 10] = [
    ('M', &[X, Y]),
    ('L', &[X, Y]),
    ('T', &[X, Y]),
    ('H', &[X]),
    ('V', &[Y]),
    ('S', &[X, Y, X, Y]),
    ('Q', &[X, Y, X, Y]),
    ('C', &[X, Y, X, Y, X, Y]),
    ('A', &[N, N, N, N, N, X, Y]),
    ('Z', &[]),
];

/// Look up the role pattern of a command letter (either case).
///
/// Returns `None` for letters outside the SVG path grammar.
pub fn pattern(letter: char) -> Option<&'static [CoordinateRole]> {
    let upper = letter.to_ascii_uppercase();
    PATTERNS
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, pattern)| *pattern)
}

/// Number of parameters in one coordinate group, `None` for unknown letters.
pub fn group_size(letter: char) -> Option<usize> {
    pattern(letter).map(<[CoordinateRole]>::len)
}

/// Role of the parameter at `index` for the given command letter.
pub fn role(letter: char, index: usize) -> CoordinateRole {
    match pattern(letter) {
        Some(pattern) if !pattern.is_empty() => pattern[index % pattern.len()],
        _ => CoordinateRole::None,
    }
}
