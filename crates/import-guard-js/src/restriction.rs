//! Restriction table and resolver.

use import_guard_core::Severity;

/// Source-file suffixes that mark an alternate as a project-local file.
pub const DEFAULT_CUSTOM_FILE_EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx"];

/// A restricted package and its approved replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionRule {
    original: String,
    alternate: Option<String>,
    severity: Severity,
}

impl RestrictionRule {
    /// Creates a rule with `error` severity.
    #[must_use]
    pub fn new(original: impl Into<String>, alternate: Option<String>) -> Self {
        Self {
            original: original.into(),
            alternate,
            severity: Severity::Error,
        }
    }

    /// Overrides the severity of violations from this rule.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Restricted package specifier (exact-match key).
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Approved alternate, if any.
    #[must_use]
    pub fn alternate(&self) -> Option<&str> {
        self.alternate.as_deref()
    }

    /// Severity of violations from this rule.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// How a matched rule's alternate is to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternateKind<'a> {
    /// No alternate configured: the import is simply forbidden.
    HardRestriction,
    /// A published package.
    Package(&'a str),
    /// A project-local facade file.
    CustomFile {
        /// Project-relative path as configured (e.g. `src/lib/date.js`).
        path: &'a str,
        /// Path with its source suffix stripped (e.g. `src/lib/date`).
        module: &'a str,
    },
}

impl std::fmt::Display for AlternateKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HardRestriction => write!(f, "hard restriction"),
            Self::Package(_) => write!(f, "package alternate"),
            Self::CustomFile { .. } => write!(f, "custom file alternate"),
        }
    }
}

/// Ordered collection of [`RestrictionRule`]s keyed by `original`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionTable {
    rules: Vec<RestrictionRule>,
    custom_file_extensions: Vec<String>,
}

impl RestrictionTable {
    /// Creates a table using [`DEFAULT_CUSTOM_FILE_EXTENSIONS`].
    #[must_use]
    pub fn new(rules: Vec<RestrictionRule>) -> Self {
        Self {
            rules,
            custom_file_extensions: DEFAULT_CUSTOM_FILE_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        }
    }

    /// Replaces the suffixes that classify an alternate as a custom file.
    #[must_use]
    pub fn with_custom_file_extensions(mut self, extensions: Vec<String>) -> Self {
        self.custom_file_extensions = extensions;
        self
    }

    /// All rules in table order.
    #[must_use]
    pub fn rules(&self) -> &[RestrictionRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule whose `original` equals `specifier`.
    #[must_use]
    pub fn resolve(&self, specifier: &str) -> Option<&RestrictionRule> {
        self.rules.iter().find(|r| r.original == specifier)
    }

    /// Classifies the alternate of `rule`.
    #[must_use]
    pub fn classify<'a>(&self, rule: &'a RestrictionRule) -> AlternateKind<'a> {
        let Some(alternate) = rule.alternate() else {
            return AlternateKind::HardRestriction;
        };
        // The longest matching suffix is stripped.
        let suffix = self
            .custom_file_extensions
            .iter()
            .filter(|ext| !ext.is_empty() && alternate.ends_with(ext.as_str()))
            .max_by_key(|ext| ext.len());
        match suffix {
            Some(ext) => AlternateKind::CustomFile {
                path: alternate,
                module: &alternate[..alternate.len() - ext.len()],
            },
            None => AlternateKind::Package(alternate),
        }
    }

    /// Keys that appear more than once, in first-occurrence order.
    #[must_use]
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups: Vec<&str> = Vec::new();
        for rule in &self.rules {
            let key = rule.original.as_str();
            if !seen.insert(key) && !dups.contains(&key) {
                dups.push(key);
            }
        }
        dups
    }
}
