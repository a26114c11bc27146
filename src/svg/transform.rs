//! `transform` attribute classification.
//!
//! Only pure translation chains are flattened. A list made solely of
//! `translate(...)` functions folds into one [`TranslateOp`]; anything with a
//! rotate, scale, skew or matrix is reported as [`Transform::Other`] and left
//! alone.

use regex::Regex;
use std::sync::LazyLock;

use super::error::TransformError;
use super::path::parse_number_list;

/// One transform function: name and raw argument text.
static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)[ \t\r\n]*\(([^()]*)\)").unwrap());

/// A pure translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TranslateOp {
    pub tx: f64,
    pub ty: f64,
}

impl TranslateOp {
    pub const fn new(tx: f64, ty: f64) -> Self {
        Self { tx, ty }
    }

    pub fn is_identity(&self) -> bool {
        self.tx == 0.0 && self.ty == 0.0
    }

    /// Compose two translations.
    pub fn then(self, other: Self) -> Self {
        Self::new(self.tx + other.tx, self.ty + other.ty)
    }
}

/// Classified `transform` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Translate(TranslateOp),
    /// Contains a function other than translate.
    Other,
}

/// Classify a `transform` attribute value.
///
/// Errors mean the value is translate-only but cannot be read; callers leave
/// such attributes in place.
pub fn parse_transform(value: &str) -> Result<Transform, TransformError> {
    let mut functions = Vec::new();
    let mut last_end = 0;
    for captures in FUNCTION.captures_iter(value) {
        let Some(whole) = captures.get(0) else { continue };
        if !is_separator_gap(&value[last_end..whole.start()]) {
            return Err(TransformError::Malformed(value.to_string()));
        }
        last_end = whole.end();
        functions.push((
            captures.get(1).map_or("", |m| m.as_str()),
            captures.get(2).map_or("", |m| m.as_str()),
        ));
    }
    if !is_separator_gap(&value[last_end..]) {
        return Err(TransformError::Malformed(value.to_string()));
    }

    if functions.iter().any(|(name, _)| *name != "translate") {
        return Ok(Transform::Other);
    }

    // An empty attribute translates by nothing.
    functions
        .into_iter()
        .try_fold(TranslateOp::default(), |acc, (_, args)| {
            parse_translate_args(args).map(|op| acc.then(op))
        })
        .map(Transform::Translate)
}

fn is_separator_gap(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_whitespace() || c == ',')
}

/// `tx [ty]` in SVG number syntax (`5,10`, `5 10`, `5-3`). A missing `ty` is 0.
fn parse_translate_args(args: &str) -> Result<TranslateOp, TransformError> {
    let numbers = parse_number_list(args)
        .map_err(|_| TransformError::InvalidArgument(args.trim().to_string()))?;

    match numbers.as_slice() {
        [tx] => Ok(TranslateOp::new(tx.value(), 0.0)),
        [tx, ty] => Ok(TranslateOp::new(tx.value(), ty.value())),
        _ => Err(TransformError::ArgumentCount(numbers.len())),
    }
}
