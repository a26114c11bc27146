//! svgnorm - flatten translate transforms and rescale SVG files to a
//! common viewBox.

mod cli;
mod config;
mod core;
mod logger;
mod pipeline;
mod svg;
mod utils;

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, batch::run_batch};
use config::NormConfig;
use svg::Viewport;
use utils::plural_count;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = NormConfig::load(&cli)?;
    let options = config.pipeline_options(Viewport::new(cli.width, cli.height));

    let summary = run_batch(
        &cli.files,
        cli.output.as_deref(),
        cli.force,
        &options,
        &core::is_shutdown,
    )?;

    log!(
        "done";
        "{} written, {} skipped, {} failed",
        plural_count(summary.written, "file"),
        summary.skipped,
        summary.failed.len()
    );

    if summary.has_failures() {
        for (input, error) in &summary.failed {
            debug!("error"; "{}: {}", input.display(), error);
        }
        bail!(
            "{} of {} failed",
            plural_count(summary.failed.len(), "file"),
            summary.total()
        );
    }
    Ok(())
}
