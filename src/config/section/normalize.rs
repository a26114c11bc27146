//! `[normalize]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [normalize]
//! policy = "origin-reset"   # origin-reset | origin-scaled
//! flatten = true            # Fold translate transforms into path data
//! precision = 4             # Max fractional digits for rewritten numbers
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::svg::ViewBoxPolicy;

/// Digits beyond this cannot change an `f64`.
const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// How the viewBox origin is rewritten.
    pub policy: ViewBoxPolicy,

    /// Run the transform flattener.
    pub flatten: bool,

    /// Max fractional digits for rewritten numbers.
    /// Unset: shortest representation that round-trips.
    pub precision: Option<usize>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            policy: ViewBoxPolicy::default(),
            flatten: true,
            precision: None,
        }
    }
}

impl NormalizeConfig {
    pub const PRECISION: FieldPath = FieldPath::new("normalize.precision");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(precision) = self.precision
            && precision > MAX_PRECISION
        {
            diag.error_with_hint(
                Self::PRECISION,
                format!("precision {precision} is larger than {MAX_PRECISION}"),
                "omit `precision` for exact output",
            );
        }
    }
}
