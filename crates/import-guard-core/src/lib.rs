//! # import-guard-core
//!
//! Core result model for the import-guard linter.
//!
//! This crate is language-agnostic. It provides:
//!
//! - [`Violation`] for representing lint findings
//! - [`Suggestion`] and [`Replacement`] for proposed fixes
//! - [`LintResult`] for aggregating findings across files
//! - [`apply_replacements`] for writing proposed fixes back into source text
//!
//! ## Example
//!
//! ```ignore
//! use import_guard_core::{apply_replacements, LintResult};
//!
//! let replacements: Vec<_> = result
//!     .violations
//!     .iter()
//!     .filter_map(|v| v.replacement())
//!     .cloned()
//!     .collect();
//! let outcome = apply_replacements(&source, &replacements)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod edit;
mod types;

pub use edit::{apply_replacements, EditError, EditOutcome};
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
