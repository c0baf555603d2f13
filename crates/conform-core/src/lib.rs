//! Differential conformance runner for interpreters under development.
//!
//! A reference interpreter and a candidate interpreter run the same milestone
//! fixtures; their trimmed outputs are compared and every verdict is written to
//! a plain-text report.

pub mod common;
pub mod domain;
pub mod modules;
