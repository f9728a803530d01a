//! Violation reports and their messages.

use import_guard_core::Severity;

use crate::restriction::RestrictionRule;

/// Which outcome a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Restricted package without an alternate.
    HardRestriction,
    /// Restricted package with a published-package alternate.
    PackageAlternate,
    /// Restricted package with a custom-file alternate.
    CustomFileAlternate,
    /// The custom-file alternate could not be read.
    AlternateNotFound,
    /// `require()` of a restricted package that has an alternate.
    RequireStyle,
}

impl ReportKind {
    /// Stable diagnostic code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::HardRestriction => "IG001",
            Self::PackageAlternate => "IG002",
            Self::CustomFileAlternate => "IG003",
            Self::AlternateNotFound => "IG004",
            Self::RequireStyle => "IG005",
        }
    }

    /// All kinds, in code order.
    #[must_use]
    pub fn all() -> &'static [ReportKind] {
        &[
            Self::HardRestriction,
            Self::PackageAlternate,
            Self::CustomFileAlternate,
            Self::AlternateNotFound,
            Self::RequireStyle,
        ]
    }

    /// One-line description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::HardRestriction => "Import of a restricted package with no alternate",
            Self::PackageAlternate => "Import of a restricted package that has a package alternate",
            Self::CustomFileAlternate => "Import of a restricted package that has a facade file",
            Self::AlternateNotFound => "Configured facade file cannot be read",
            Self::RequireStyle => "require() of a restricted package that has an alternate",
        }
    }
}

/// A single finding for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationReport {
    /// Outcome kind.
    pub kind: ReportKind,
    /// Severity taken from the matched rule.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Replacement text for the whole statement, when safe.
    pub fix: Option<String>,
}

impl ViolationReport {
    fn new(kind: ReportKind, rule: &RestrictionRule, message: String) -> Self {
        Self {
            kind,
            severity: rule.severity(),
            message,
            fix: None,
        }
    }

    fn with_fix(mut self, fix: Option<String>) -> Self {
        self.fix = fix;
        self
    }

    /// Restricted import with no alternate configured.
    #[must_use]
    pub fn hard_restriction(rule: &RestrictionRule) -> Self {
        Self::new(
            ReportKind::HardRestriction,
            rule,
            format!("direct import restricted for `{}`", rule.original()),
        )
    }

    /// Restricted import redirected to a published package.
    #[must_use]
    pub fn package_alternate(rule: &RestrictionRule, alternate: &str, fix: Option<String>) -> Self {
        Self::new(
            ReportKind::PackageAlternate,
            rule,
            redirect_message(rule, alternate),
        )
        .with_fix(fix)
    }

    /// Restricted import redirected to a facade file. `missing` names the
    /// exports the facade still has to provide.
    #[must_use]
    pub fn custom_file_alternate(
        rule: &RestrictionRule,
        path: &str,
        missing: &[String],
        fix: Option<String>,
    ) -> Self {
        let mut message = redirect_message(rule, path);
        if !missing.is_empty() {
            message.push_str(&format!(", and export {} from it", backtick_list(missing)));
        }
        Self::new(ReportKind::CustomFileAlternate, rule, message).with_fix(fix)
    }

    /// Facade file configured for `rule` could not be read.
    #[must_use]
    pub fn alternate_not_found(rule: &RestrictionRule, path: &str) -> Self {
        Self::new(
            ReportKind::AlternateNotFound,
            rule,
            format!(
                "direct import restricted for `{}`, unable to find alternate import path `{path}`",
                rule.original()
            ),
        )
    }

    /// `require()` of a restricted package with an alternate. Never fixed.
    #[must_use]
    pub fn require_style(rule: &RestrictionRule, alternate: &str) -> Self {
        Self::new(
            ReportKind::RequireStyle,
            rule,
            format!(
                "require restricted for `{}`, use `import` syntax and import from `{alternate}` instead",
                rule.original()
            ),
        )
    }
}

fn redirect_message(rule: &RestrictionRule, alternate: &str) -> String {
    format!(
        "direct import restricted for `{}`, import from `{alternate}` instead",
        rule.original()
    )
}

fn backtick_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
