//! Report rendering for the CLI surface.
//!
//! Text output is a banner line, followed on failure by the violations
//! numbered from 1 in discovery order. JSON output carries the same list
//! with pass and rule codes.

use crate::core::error::BolError;
use crate::core::loader::LoadedTrace;
use crate::core::trace::Trace;
use crate::core::validate::{ValidationReport, Violation};
use colored::Colorize;
use serde::Serialize;

pub const PASS_BANNER: &str = "BOL VALIDATION: PASS";
pub const FAIL_BANNER: &str = "BOL VALIDATION: FAIL";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    trace_id: Option<&'a str>,
    trace_sha256: &'a str,
    violations: &'a [Violation],
}

pub fn render_text(report: &ValidationReport, color: bool) -> String {
    if report.passed() {
        return if color {
            PASS_BANNER.bright_green().bold().to_string()
        } else {
            PASS_BANNER.to_string()
        };
    }

    let mut lines = Vec::with_capacity(report.violations.len() + 1);
    lines.push(if color {
        FAIL_BANNER.bright_red().bold().to_string()
    } else {
        FAIL_BANNER.to_string()
    });
    for (i, violation) in report.violations.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, violation));
    }
    lines.join("\n")
}

pub fn render_json(loaded: &LoadedTrace, report: &ValidationReport) -> Result<String, BolError> {
    let out = JsonReport {
        status: if report.passed() { "PASS" } else { "FAIL" },
        trace_id: Trace::new(&loaded.document).trace_id(),
        trace_sha256: &loaded.sha256,
        violations: &report.violations,
    };
    serde_json::to_string_pretty(&out).map_err(BolError::RenderError)
}

/// One `validate: pass ...` line per pass that ran.
pub fn pass_summary_lines(report: &ValidationReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .passes
        .iter()
        .map(|p| format!("validate: pass {} violations={}", p.pass, p.violations))
        .collect();
    lines.push(format!(
        "validate: summary violations={}",
        report.violations.len()
    ));
    lines
}
