//! bol-validate: a validator for five-phase BOL decision traces.
//!
//! A trace records a classified task (A, B or C) worked through five fixed
//! phases: Context, Hypotheses, Failures, Risk/Gate/Decision and Audit. This
//! crate rejects any trace that is internally inconsistent.
//!
//! # Passes
//!
//! - **Structural**: required fields, allowed enumerations, phase ordering
//! - **Referential**: every artifact/check id a check, gate or decision names
//!   resolves in the global index
//! - **Policy**: risk requirements per task class, human-confirmation gates,
//!   blocked-check propagation, approval exclusion while failures exist
//!
//! Validation is a pure function of the document. Its output is an ordered
//! list of violations; it never repairs a trace.
//!
//! # Examples
//!
//! ```bash
//! # Validate a trace, printing numbered violations
//! bol-validate trace.json
//!
//! # Machine-readable report with pass and rule codes
//! bol-validate --format json trace.json
//! ```
//!
//! Exit codes: `0` pass, `1` violations found, `2` usage or load error.
//!
//! # Crate Structure
//!
//! - [`core`]: trace model, indexer, passes, loader and report rendering

pub mod core;
mod cli;

use clap::Parser;
use cli::Cli;
use crate::core::{error, loader, output};
use std::io::IsTerminal;
use std::process::ExitCode;

pub use crate::core::validate::{ValidationReport, Violation, validate, validate_trace};

/// Result of a completed validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Pass => ExitCode::SUCCESS,
            Self::Fail => ExitCode::from(1),
        }
    }
}

pub fn run() -> Result<Outcome, error::BolError> {
    let cli = Cli::parse();

    let loaded = loader::load_trace(&cli.trace)?;
    let report = validate_trace(&loaded.document);

    if cli.verbose {
        eprintln!("validate: trace {}", loaded.path.display());
        eprintln!("validate: sha256={}", loaded.sha256);
        for line in output::pass_summary_lines(&report) {
            eprintln!("{}", line);
        }
    }

    match cli.format {
        output::OutputFormat::Text => {
            let color = std::io::stdout().is_terminal();
            println!("{}", output::render_text(&report, color));
        }
        output::OutputFormat::Json => {
            println!("{}", output::render_json(&loaded, &report)?);
        }
    }

    Ok(if report.passed() {
        Outcome::Pass
    } else {
        Outcome::Fail
    })
}
