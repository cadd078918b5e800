//! CLI struct definitions for the bol-validate command-line interface.

use crate::core::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "bol-validate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate a five-phase BOL decision trace: structure, references and policy."
)]
pub(crate) struct Cli {
    /// Path to the trace JSON document.
    pub trace: PathBuf,
    /// Output format: 'text' or 'json'.
    #[clap(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Print per-pass violation counts to stderr.
    #[clap(long, short = 'v')]
    pub verbose: bool,
}
