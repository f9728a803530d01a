//! Replacement import synthesis.
//!
//! Builds the text of an `import` statement from extracted bindings. The
//! clause is assembled from typed parts rather than concatenated strings,
//! and any binding list that cannot form a valid clause yields `None`.

use std::fmt;

use crate::bindings::{BindingKind, ImportBinding};

/// A structured `import` clause: `Default, * as ns` or `Default, { a, b as c }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportClause<'a> {
    default: Option<&'a str>,
    namespace: Option<&'a str>,
    named: Vec<&'a ImportBinding>,
}

impl<'a> ImportClause<'a> {
    /// Groups bindings into a clause.
    ///
    /// Returns `None` for an empty list, an unrecognized binding, two
    /// default or namespace bindings, or a namespace combined with named
    /// bindings.
    #[must_use]
    pub fn from_bindings(bindings: &'a [ImportBinding]) -> Option<Self> {
        if bindings.is_empty() {
            return None;
        }
        let mut clause = Self {
            default: None,
            namespace: None,
            named: Vec::new(),
        };
        for binding in bindings {
            if !binding.is_recognized() {
                return None;
            }
            match binding.kind {
                BindingKind::Default => {
                    if clause.default.replace(binding.local_name.as_str()).is_some() {
                        return None;
                    }
                }
                BindingKind::Namespace => {
                    if clause.namespace.replace(binding.local_name.as_str()).is_some() {
                        return None;
                    }
                }
                BindingKind::Named => clause.named.push(binding),
            }
        }
        if clause.namespace.is_some() && !clause.named.is_empty() {
            return None;
        }
        Some(clause)
    }
}

impl fmt::Display for ImportClause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(default) = self.default {
            parts.push(default.to_string());
        }
        if let Some(ns) = self.namespace {
            parts.push(format!("* as {ns}"));
        }
        if !self.named.is_empty() {
            let specs: Vec<String> = self
                .named
                .iter()
                .map(|b| {
                    if b.is_aliased() {
                        format!("{} as {}", b.exported_name, b.local_name)
                    } else {
                        b.local_name.clone()
                    }
                })
                .collect();
            parts.push(format!("{{ {} }}", specs.join(", ")));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Renders `import <clause> from '<source>';`, or `None` when the bindings
/// cannot be rewritten safely.
#[must_use]
pub fn import_statement(bindings: &[ImportBinding], source: &str) -> Option<String> {
    let clause = ImportClause::from_bindings(bindings)?;
    Some(format!("import {clause} from {};", quote(source)))
}

/// Import specifier for a custom-file alternate: the configured root prefix
/// followed by the file path without its source suffix.
#[must_use]
pub fn custom_file_specifier(root_prefix: &str, module: &str) -> String {
    format!("{root_prefix}{module}")
}

fn quote(source: &str) -> String {
    let escaped = source.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
