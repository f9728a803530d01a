//! # import-guard-js
//!
//! Tree-sitter based restricted-import rule for JavaScript and TypeScript.
//!
//! Imports and `require()` calls of packages listed in the restriction table
//! are reported. When an alternate is configured, a rewritten `import`
//! statement is proposed that keeps the caller's bindings, and project-local
//! facade files are checked for the names callers request. It reuses
//! `import-guard-core` types (`Violation`, `Severity`, `Location`) and adds:
//!
//! - [`ImportGuardEngine`] to check whole files
//! - [`RestrictedImportRule`] to check single statements
//! - [`RestrictionTable`] for the ordered `original -> alternate` rules
//! - [`SourceReader`] for reading alternate files from disk or memory
//! - [`ImportGuardConfig`] for the `import-guard.toml` format

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod config;
pub mod engine;
pub mod exports;
pub mod fix;
pub mod reader;
pub mod report;
pub mod restriction;
pub mod rule;
pub mod syntax;

pub use config::{ConfigError, ImportGuardConfig};
pub use engine::ImportGuardEngine;
pub use reader::{FsReader, MemoryReader, SourceReader};
pub use report::{ReportKind, ViolationReport};
pub use restriction::{AlternateKind, RestrictionRule, RestrictionTable};
pub use rule::{ImportSettings, RestrictedImportRule, RULE_NAME};
pub use syntax::{ParseError, SourceLanguage};
