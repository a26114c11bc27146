//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::svg::ViewBoxPolicy;

/// Flatten translate transforms and rescale SVG files to a target viewBox
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Target viewBox width
    #[arg(short = 'W', long, value_parser = parse_extent)]
    pub width: f64,

    /// Target viewBox height
    #[arg(short = 'H', long, value_parser = parse_extent)]
    pub height: f64,

    /// Output directory (default: overwrite input files in place)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Rewrite outputs that already exist in the output directory
    #[arg(short, long)]
    pub force: bool,

    /// How the viewBox origin is rewritten
    #[arg(short, long, value_enum)]
    pub policy: Option<ViewBoxPolicy>,

    /// Flatten translate transforms into path data
    #[arg(short = 'F', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub flatten: Option<bool>,

    /// Strip editor metadata, guides and root size before normalizing
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub clean: Option<bool>,

    /// Minify output through usvg
    #[arg(short = 'O', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub optimize: Option<bool>,

    /// Maximum fractional digits for rewritten numbers
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Config file path (default: svgnorm.toml, searched upward)
    #[arg(short = 'C', long, default_value = "svgnorm.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// SVG files to normalize
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

/// Parse a positive, finite viewBox extent.
fn parse_extent(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        Ok(_) => Err(format!("`{value}` must be a positive number")),
        Err(e) => Err(format!("`{value}` is not a number: {e}")),
    }
}
