//! Import guard engine.
//!
//! Parses a source file, walks its import and variable declarations in
//! document order and converts the rule's reports into [`Violation`]s from
//! import-guard-core.

use std::path::Path;
use std::sync::Arc;

use import_guard_core::{Location, Replacement, Suggestion, Violation};

use crate::config::ImportGuardConfig;
use crate::reader::{FsReader, SourceReader};
use crate::report::ViolationReport;
use crate::rule::{RestrictedImportRule, RULE_NAME};
use crate::syntax::{self, collect_statements, ParseError, SourceLanguage, Span, Statement};

/// Runs the restricted-import rule over whole files.
#[derive(Debug)]
pub struct ImportGuardEngine<R = FsReader> {
    rule: RestrictedImportRule<R>,
}

impl ImportGuardEngine<FsReader> {
    /// Create an engine from config, reading alternates from `config.root`.
    #[must_use]
    pub fn new(config: &ImportGuardConfig) -> Self {
        Self::from_config_with_reader(config, FsReader::new(&config.root))
    }
}

impl<R: SourceReader> ImportGuardEngine<R> {
    /// Create an engine from config with a custom source reader.
    #[must_use]
    pub fn from_config_with_reader(config: &ImportGuardConfig, reader: R) -> Self {
        Self::with_rule(RestrictedImportRule::new(
            Arc::new(config.restriction_table()),
            config.import_settings(),
            reader,
        ))
    }

    /// Wrap an already constructed rule.
    #[must_use]
    pub fn with_rule(rule: RestrictedImportRule<R>) -> Self {
        Self { rule }
    }

    /// The rule this engine drives.
    #[must_use]
    pub fn rule(&self) -> &RestrictedImportRule<R> {
        &self.rule
    }

    /// Check one file's source text. `path` selects the grammar and is
    /// recorded on every violation.
    ///
    /// Syntax errors elsewhere in the file do not prevent checking the
    /// statements that did parse.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded.
    pub fn check_source(&self, path: &Path, source: &str) -> Result<Vec<Violation>, ParseError> {
        let tree = syntax::parse(source, SourceLanguage::from_path(path))?;
        let mut violations = Vec::new();

        for statement in collect_statements(&tree, source) {
            match &statement {
                Statement::Import(decl) => {
                    if let Some(report) = self.rule.import_declaration(decl) {
                        violations.push(to_violation(path, decl.span, report));
                    }
                }
                Statement::Variable(decl) => {
                    violations.extend(
                        self.rule
                            .variable_declaration(decl)
                            .into_iter()
                            .map(|report| to_violation(path, decl.span, report)),
                    );
                }
            }
        }

        tracing::debug!(
            "{}: {} restricted import(s)",
            path.display(),
            violations.len()
        );
        Ok(violations)
    }
}

fn to_violation(path: &Path, span: Span, report: ViolationReport) -> Violation {
    let location =
        Location::new(path.to_path_buf(), span.line, span.column).with_span(span.start, span.len());
    let violation = Violation::new(
        report.kind.code(),
        RULE_NAME,
        report.severity,
        location.clone(),
        report.message,
    );
    match report.fix {
        Some(fix) => violation.with_suggestion(Suggestion::with_fix(
            format!("replace with `{fix}`"),
            Replacement::new(location, fix),
        )),
        None => violation,
    }
}
