//! Command-line interface module.

mod args;
pub mod batch;

pub use args::Cli;
