//! TOML configuration for the restricted-import rule.
//!
//! ```toml
//! [analyzer]
//! root = "."
//! exclude = ["**/node_modules/**"]
//!
//! [settings]
//! custom_file_import_root_prefix = "@/"
//!
//! [[alternate_packages]]
//! original = "lodash"
//! alternate = "lodash-es"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use import_guard_core::Severity;

use crate::fix::custom_file_specifier;
use crate::restriction::{
    AlternateKind, RestrictionRule, RestrictionTable, DEFAULT_CUSTOM_FILE_EXTENSIONS,
};
use crate::rule::ImportSettings;

/// Top-level import-guard configuration.
#[derive(Debug, Clone)]
pub struct ImportGuardConfig {
    /// Project root directory. Alternate paths resolve against it.
    pub root: PathBuf,

    /// Glob patterns to exclude from discovery.
    pub exclude: Vec<String>,

    /// File suffixes checked by the analyzer.
    pub extensions: Vec<String>,

    /// Rule settings.
    pub settings: Settings,

    /// Restricted packages, in match order.
    pub alternate_packages: Vec<AlternatePackage>,
}

/// The `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Prefix for rewritten custom-file imports (e.g. `"@/"`).
    #[serde(default)]
    pub custom_file_import_root_prefix: String,

    /// Suffixes that mark an alternate as a project-local file.
    #[serde(default = "default_extensions")]
    pub custom_file_extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_file_import_root_prefix: String::new(),
            custom_file_extensions: default_extensions(),
        }
    }
}

/// One `[[alternate_packages]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AlternatePackage {
    /// Restricted import specifier, matched exactly.
    pub original: String,

    /// Package name or project-relative file path to use instead.
    #[serde(default)]
    pub alternate: Option<String>,

    /// Severity for violations of this entry.
    #[serde(default = "default_severity")]
    pub severity: Severity,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_severity() -> Severity {
    Severity::Error
}

fn default_extensions() -> Vec<String> {
    DEFAULT_CUSTOM_FILE_EXTENSIONS
        .iter()
        .map(|e| (*e).to_string())
        .collect()
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
    /// Config is structurally invalid.
    #[error("config validation: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ImportGuardConfig {
    /// Load from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        /// Wrapper to handle the `[analyzer]` section in the TOML.
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawConfig {
            #[serde(default)]
            analyzer: AnalyzerSection,
            #[serde(default)]
            settings: Settings,
            #[serde(default)]
            alternate_packages: Vec<AlternatePackage>,
        }

        #[derive(Deserialize)]
        struct AnalyzerSection {
            #[serde(default = "default_root")]
            root: PathBuf,
            #[serde(default)]
            exclude: Vec<String>,
            #[serde(default = "default_extensions")]
            extensions: Vec<String>,
        }

        impl Default for AnalyzerSection {
            fn default() -> Self {
                Self {
                    root: default_root(),
                    exclude: Vec::new(),
                    extensions: default_extensions(),
                }
            }
        }

        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        Ok(Self {
            root: raw.analyzer.root,
            exclude: raw.analyzer.exclude,
            extensions: raw.analyzer.extensions,
            settings: raw.settings,
            alternate_packages: raw.alternate_packages,
        })
    }

    /// Validate config consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] listing every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        let table = self.restriction_table();
        let prefix = &self.settings.custom_file_import_root_prefix;

        for (i, rule) in table.rules().iter().enumerate() {
            let original = rule.original().trim();
            if original.is_empty() {
                problems.push(format!("alternate_packages[{i}]: empty original"));
                continue;
            }
            match rule.alternate().map(str::trim) {
                Some("") => problems.push(format!(
                    "alternate_packages[{i}]: empty alternate for '{original}'"
                )),
                Some(alt) if alt == original => problems.push(format!(
                    "alternate_packages[{i}]: '{original}' is its own alternate"
                )),
                _ => {}
            }
            // A rewritten import must not name the restricted package again.
            if let AlternateKind::CustomFile { module, .. } = table.classify(rule) {
                if custom_file_specifier(prefix, module) == rule.original() {
                    problems.push(format!(
                        "alternate_packages[{i}]: rewrite resolves back to '{original}'"
                    ));
                }
            }
        }

        for original in table.duplicates() {
            if !original.trim().is_empty() {
                problems.push(format!("alternate_packages: duplicate original '{original}'"));
            }
        }

        for (i, ext) in self.settings.custom_file_extensions.iter().enumerate() {
            if !ext.starts_with('.') || ext.len() < 2 {
                problems.push(format!(
                    "settings.custom_file_extensions[{i}]: '{ext}' must look like '.js'"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }

    /// Builds the restriction table, preserving entry order.
    #[must_use]
    pub fn restriction_table(&self) -> RestrictionTable {
        let rules = self
            .alternate_packages
            .iter()
            .map(|entry| {
                RestrictionRule::new(entry.original.clone(), entry.alternate.clone())
                    .with_severity(entry.severity)
            })
            .collect();
        RestrictionTable::new(rules)
            .with_custom_file_extensions(self.settings.custom_file_extensions.clone())
    }

    /// Settings handed to the rule.
    #[must_use]
    pub fn import_settings(&self) -> ImportSettings {
        ImportSettings {
            custom_file_import_root_prefix: self.settings.custom_file_import_root_prefix.clone(),
        }
    }

    /// Returns true if `path` has one of the analyzed extensions.
    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}
