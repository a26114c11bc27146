//! Error types for path data, transforms and documents.

use thiserror::Error;

// ============================================================================
// PathError
// ============================================================================

/// Grammar errors in path data (`d` attribute).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("invalid number `{text}` at offset {offset}")]
    InvalidNumber { offset: usize, text: String },

    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedChar { offset: usize, ch: char },

    #[error("number at offset {offset} appears before any command")]
    MissingCommand { offset: usize },

    #[error("`{letter}` takes no parameters (number at offset {offset})")]
    ParamsAfterClose { letter: char, offset: usize },

    #[error("arc flag at offset {offset} must be `0` or `1`")]
    InvalidArcFlag { offset: usize },

    #[error("`{letter}` has {count} parameters, expected a positive multiple of {group}")]
    ParamCount {
        letter: char,
        count: usize,
        group: usize,
    },
}

// ============================================================================
// TransformError
// ============================================================================

/// A `transform` attribute that looks like a translation but cannot be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("invalid translate argument `{0}`")]
    InvalidArgument(String),

    #[error("translate expects 1 or 2 arguments, got {0}")]
    ArgumentCount(usize),

    #[error("malformed transform list `{0}`")]
    Malformed(String),
}

// ============================================================================
// SvgError
// ============================================================================

/// Document-level errors.
///
/// [`SvgError::MissingViewBox`] and [`SvgError::DegenerateViewBox`] are skip
/// conditions: the document is left alone and the batch carries on. Everything
/// else fails the file.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("invalid path data: {0}")]
    Path(#[from] PathError),

    #[error("document has no viewBox")]
    MissingViewBox,

    #[error("degenerate viewBox `{0}` (width and height must be positive)")]
    DegenerateViewBox(String),

    #[error("invalid viewBox `{0}`")]
    InvalidViewBox(String),

    #[error("invalid root size (width=`{width}`, height=`{height}`)")]
    InvalidSize { width: String, height: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("failed to write document: {0}")]
    Write(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Malformed(String),
}

impl SvgError {
    /// Whether this error means "skip the document" rather than "fail the file".
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::MissingViewBox | Self::DegenerateViewBox(_))
    }
}
