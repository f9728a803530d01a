//! The restricted-import rule driver.
//!
//! One entry point per statement shape. Each call is independent: the only
//! state is the read-only restriction table and settings supplied at
//! construction.

use std::sync::Arc;

use crate::bindings::{extract_bindings, require_source, requested_names};
use crate::exports::{check_alternate, AlternateCheck};
use crate::fix::{custom_file_specifier, import_statement};
use crate::reader::SourceReader;
use crate::report::ViolationReport;
use crate::restriction::{AlternateKind, RestrictionRule, RestrictionTable};
use crate::syntax::{ImportDeclaration, VariableDeclaration};

/// Rule name reported on every violation.
pub const RULE_NAME: &str = "restricted-direct-import";

/// Settings shared by every statement of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSettings {
    /// Prefix prepended to a custom-file alternate's path when rewriting an
    /// import (e.g. `@/`).
    pub custom_file_import_root_prefix: String,
}

/// Detects imports of restricted packages and proposes rewrites.
#[derive(Debug)]
pub struct RestrictedImportRule<R> {
    table: Arc<RestrictionTable>,
    settings: ImportSettings,
    reader: R,
}

impl<R: SourceReader> RestrictedImportRule<R> {
    /// Creates the rule. `reader` fetches custom-file alternates.
    #[must_use]
    pub fn new(table: Arc<RestrictionTable>, settings: ImportSettings, reader: R) -> Self {
        Self {
            table,
            settings,
            reader,
        }
    }

    /// Restriction table in use.
    #[must_use]
    pub fn table(&self) -> &RestrictionTable {
        &self.table
    }

    /// Checks an `import` declaration.
    #[must_use]
    pub fn import_declaration(&self, decl: &ImportDeclaration) -> Option<ViolationReport> {
        let rule = self.table.resolve(&decl.source)?;
        let bindings = extract_bindings(decl);
        tracing::debug!(
            "Restricted import of {} at line {} ({} binding(s))",
            decl.source,
            decl.span.line,
            bindings.len()
        );

        let report = match self.table.classify(rule) {
            AlternateKind::HardRestriction => ViolationReport::hard_restriction(rule),
            AlternateKind::Package(alternate) => ViolationReport::package_alternate(
                rule,
                alternate,
                import_statement(&bindings, alternate),
            ),
            AlternateKind::CustomFile { path, module } => {
                match check_alternate(&self.reader, path, &requested_names(&bindings)) {
                    AlternateCheck::NotFound => {
                        ViolationReport::alternate_not_found(rule, path)
                    }
                    AlternateCheck::Checked { missing } => {
                        let specifier = custom_file_specifier(
                            &self.settings.custom_file_import_root_prefix,
                            module,
                        );
                        ViolationReport::custom_file_alternate(
                            rule,
                            path,
                            &missing,
                            import_statement(&bindings, &specifier),
                        )
                    }
                }
            }
        };
        Some(report)
    }

    /// Checks a `const` / `let` / `var` declaration, one report per
    /// declarator initialized with `require()` of a restricted package.
    #[must_use]
    pub fn variable_declaration(&self, decl: &VariableDeclaration) -> Vec<ViolationReport> {
        decl.declarators
            .iter()
            .filter_map(require_source)
            .filter_map(|source| self.table.resolve(source))
            .map(|rule| {
                tracing::debug!(
                    "Restricted require of {} at line {}",
                    rule.original(),
                    decl.span.line
                );
                require_report(rule)
            })
            .collect()
    }
}

fn require_report(rule: &RestrictionRule) -> ViolationReport {
    match rule.alternate() {
        None => ViolationReport::hard_restriction(rule),
        Some(alternate) => ViolationReport::require_style(rule, alternate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemoryReader;
    use crate::report::ReportKind;
    use crate::syntax::{collect_statements, parse, SourceLanguage, Statement};

    fn table() -> Arc<RestrictionTable> {
        Arc::new(RestrictionTable::new(vec![
            RestrictionRule::new("jquery", None),
            RestrictionRule::new("lodash", Some("lodash-es".into())),
            RestrictionRule::new("moment", Some("src/utils/date.js".into())),
            RestrictionRule::new("axios", Some("src/http/missing.js".into())),
        ]))
    }

    fn rule(reader: MemoryReader) -> RestrictedImportRule<MemoryReader> {
        RestrictedImportRule::new(
            table(),
            ImportSettings {
                custom_file_import_root_prefix: "@/".into(),
            },
            reader,
        )
    }

    fn date_facade() -> MemoryReader {
        MemoryReader::new().with_file(
            "src/utils/date.js",
            "import { format, parse } from 'moment';\nexport { format };\n",
        )
    }

    fn run(rule: &RestrictedImportRule<MemoryReader>, src: &str) -> Vec<ViolationReport> {
        let tree = parse(src, SourceLanguage::JavaScript).unwrap();
        collect_statements(&tree, src)
            .iter()
            .flat_map(|stmt| match stmt {
                Statement::Import(d) => rule.import_declaration(d).into_iter().collect(),
                Statement::Variable(v) => rule.variable_declaration(v),
            })
            .collect()
    }

    fn one(src: &str) -> ViolationReport {
        let reports = run(&rule(date_facade()), src);
        assert_eq!(reports.len(), 1, "{reports:#?}");
        reports.into_iter().next().unwrap()
    }

    #[test]
    fn unrestricted_import_is_silent() {
        assert!(run(&rule(date_facade()), "import React from 'react';").is_empty());
    }

    #[test]
    fn hard_restriction_never_fixes_any_shape() {
        for src in [
            "import $ from 'jquery';",
            "import * as jq from 'jquery';",
            "import { ajax as get } from 'jquery';",
            "import 'jquery';",
            "const $ = require('jquery');",
        ] {
            let r = one(src);
            assert_eq!(r.kind, ReportKind::HardRestriction, "{src}");
            assert_eq!(r.fix, None, "{src}");
            assert_eq!(r.message, "direct import restricted for `jquery`");
        }
    }

    #[test]
    fn package_alternate_preserves_aliases() {
        let r = one("import { a as b } from 'lodash';");
        assert_eq!(r.kind, ReportKind::PackageAlternate);
        assert_eq!(r.fix.as_deref(), Some("import { a as b } from 'lodash-es';"));
    }

    #[test]
    fn package_alternate_namespace() {
        let r = one("import * as ns from 'lodash';");
        assert_eq!(r.fix.as_deref(), Some("import * as ns from 'lodash-es';"));
    }

    #[test]
    fn package_alternate_side_effect_import_has_no_fix() {
        let r = one("import 'lodash';");
        assert_eq!(r.kind, ReportKind::PackageAlternate);
        assert_eq!(r.fix, None);
    }

    #[test]
    fn custom_file_reports_missing_exports_and_still_fixes() {
        let r = one("import { format, parse as p } from 'moment';");
        assert_eq!(r.kind, ReportKind::CustomFileAlternate);
        assert!(r.message.contains("and export `parse` from it"), "{}", r.message);
        assert_eq!(
            r.fix.as_deref(),
            Some("import { format, parse as p } from '@/src/utils/date';")
        );
    }

    #[test]
    fn custom_file_fully_exported() {
        let r = one("import { format } from 'moment';");
        assert!(!r.message.contains("export `"));
        assert_eq!(
            r.fix.as_deref(),
            Some("import { format } from '@/src/utils/date';")
        );
    }

    #[test]
    fn custom_file_empty_reports_everything_missing() {
        let reader = MemoryReader::new().with_file("src/utils/date.js", "");
        let reports = run(&rule(reader), "import { format, parse } from 'moment';");
        assert!(reports[0]
            .message
            .contains("and export `format`, `parse` from it"));
        assert!(reports[0].fix.is_some());
    }

    #[test]
    fn custom_file_default_import_checks_local_name() {
        let r = one("import format from 'moment';");
        assert!(!r.message.contains("and export"));
        assert_eq!(r.fix.as_deref(), Some("import format from '@/src/utils/date';"));
    }

    #[test]
    fn custom_file_not_found() {
        let r = one("import axios from 'axios';");
        assert_eq!(r.kind, ReportKind::AlternateNotFound);
        assert_eq!(r.fix, None);
        assert!(r.message.contains("`src/http/missing.js`"));
    }

    #[test]
    fn require_with_custom_file_alternate_is_style_violation() {
        let r = one("const { format } = require('moment');");
        assert_eq!(r.kind, ReportKind::RequireStyle);
        assert_eq!(r.fix, None);
        assert!(r.message.contains("import from `src/utils/date.js`"));
    }

    #[test]
    fn require_with_package_alternate_is_style_violation() {
        let r = one("var _ = require('lodash');");
        assert_eq!(r.kind, ReportKind::RequireStyle);
        assert_eq!(r.fix, None);
    }

    #[test]
    fn one_report_per_restricted_declarator() {
        let reports = run(
            &rule(date_facade()),
            "const _ = require('lodash'), $ = require('jquery'), fs = require('fs');",
        );
        let kinds: Vec<ReportKind> = reports.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReportKind::RequireStyle, ReportKind::HardRestriction]);
    }

    #[test]
    fn fixed_import_is_no_longer_restricted() {
        let r = one("import { map } from 'lodash';");
        let fixed = r.fix.unwrap();
        assert!(run(&rule(date_facade()), &fixed).is_empty());

        let r = one("import { format } from 'moment';");
        let fixed = r.fix.unwrap();
        assert!(run(&rule(date_facade()), &fixed).is_empty());
    }
}
