//! `[clean]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [clean]
//! enable = true
//! guide_colors = ["#999", "#ff00ff"]  # g/path with these strokes are guides
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::svg::CleanOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Run editor cleanup before normalizing.
    pub enable: bool,

    /// Stroke colors marking construction guides.
    pub guide_colors: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            enable: false,
            guide_colors: CleanOptions::default().guide_colors,
        }
    }
}

impl CleanConfig {
    pub const GUIDE_COLORS: FieldPath = FieldPath::new("clean.guide_colors");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.guide_colors.iter().any(|color| color.trim().is_empty()) {
            diag.error(Self::GUIDE_COLORS, "guide colors must not be empty");
        }
    }

    /// Options for the clean stage, if enabled.
    pub fn options(&self) -> Option<CleanOptions> {
        self.enable.then(|| CleanOptions {
            guide_colors: self.guide_colors.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_clean_config() {
        let config = test_parse_config("[clean]\nenable = true\nguide_colors = [\"#f0f\"]");
        let options = config.clean.options().unwrap();
        assert_eq!(options.guide_colors, vec!["#f0f".to_string()]);
    }

    #[test]
    fn test_clean_disabled_by_default() {
        let config = test_parse_config("");
        assert!(config.clean.options().is_none());
        assert_eq!(config.clean.guide_colors, vec!["#999".to_string()]);
    }

    #[test]
    fn test_empty_guide_color_rejected() {
        let config = test_parse_config("[clean]\nguide_colors = [\" \"]");
        let mut diag = ConfigDiagnostics::new();
        config.clean.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
