//! `[optimize]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [optimize]
//! enable = true
//! dpi = 96.0      # Used to resolve absolute units (mm, in, pt)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::svg::OptimizeOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Minify output through usvg.
    pub enable: bool,

    /// DPI for unit conversion.
    pub dpi: f32,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            dpi: OptimizeOptions::default().dpi,
        }
    }
}

impl OptimizeConfig {
    pub const DPI: FieldPath = FieldPath::new("optimize.dpi");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            diag.error(Self::DPI, format!("dpi must be positive, got {}", self.dpi));
        }
    }

    /// Options for the optimize stage, if enabled.
    pub fn options(&self) -> Option<OptimizeOptions> {
        self.enable.then(|| OptimizeOptions { dpi: self.dpi })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_optimize_config() {
        let config = test_parse_config("[optimize]\nenable = true\ndpi = 144.0");
        assert_eq!(config.optimize.options().unwrap().dpi, 144.0);
    }

    #[test]
    fn test_invalid_dpi() {
        let config = test_parse_config("[optimize]\ndpi = 0.0");
        let mut diag = ConfigDiagnostics::new();
        config.optimize.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
