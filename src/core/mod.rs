//! Core modules for the trace validation engine.
//!
//! `trace` and `index` build the read-only model; `structural`, `referential`
//! and `policy` are the passes `validate` runs in order. `loader` and
//! `output` are the CLI-facing edges.

pub mod error;
pub mod index;
pub mod loader;
pub mod output;
pub mod policy;
pub mod referential;
pub mod structural;
pub mod trace;
pub mod validate;
