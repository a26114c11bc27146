//! Run configuration from `svgnorm.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── normalize  # [normalize]
//! │   ├── clean      # [clean]
//! │   └── optimize   # [optimize]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # NormConfig (this file)
//! ```
//!
//! # Precedence
//!
//! Built-in defaults, then `svgnorm.toml` (searched upward from the working
//! directory), then command-line flags.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{CleanConfig, NormalizeConfig, OptimizeConfig};

// Re-export from types/
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log, logger, pipeline::PipelineOptions, svg::Viewport};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Config file name looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "svgnorm.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgnorm.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormConfig {
    /// Path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// viewBox policy, flattening, precision
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Editor cleanup
    #[serde(default)]
    pub clean: CleanConfig,

    /// usvg minification
    #[serde(default)]
    pub optimize: OptimizeConfig,
}

impl NormConfig {
    /// Load configuration for a run.
    ///
    /// The default config name is optional; an explicitly named file must
    /// exist. CLI flags are applied on top and the result is validated.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = env::current_dir()?;
        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => Self::default(),
        };

        config.apply_cli(cli);
        config.validate()?;

        match &config.config_path {
            Some(path) => crate::debug!("config"; "loaded {}", path.display()),
            None => crate::debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG),
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), fields.join(", "));
    }

    // ========================================================================
    // CLI overrides
    // ========================================================================

    /// Apply command-line flags over file values.
    fn apply_cli(&mut self, cli: &Cli) {
        logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.normalize.policy, cli.policy.as_ref());
        Self::update_option(&mut self.normalize.flatten, cli.flatten.as_ref());
        if cli.precision.is_some() {
            self.normalize.precision = cli.precision;
        }
        Self::update_option(&mut self.clean.enable, cli.clean.as_ref());
        Self::update_option(&mut self.optimize.enable, cli.optimize.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate every section.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.normalize.validate(&mut diag);
        self.clean.validate(&mut diag);
        self.optimize.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Pipeline settings for the given target viewport.
    pub fn pipeline_options(&self, target: Viewport) -> PipelineOptions {
        PipelineOptions {
            target,
            policy: self.normalize.policy,
            flatten: self.normalize.flatten,
            precision: self.normalize.precision,
            clean: self.clean.options(),
            optimize: self.optimize.options(),
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> NormConfig {
    let (parsed, ignored) = NormConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
