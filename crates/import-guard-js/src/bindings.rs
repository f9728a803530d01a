//! Binding extraction from import statements.

use crate::syntax::{Declarator, ImportDeclaration, ImportSpecifier};

/// Import style of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `import foo from 'x'`
    Default,
    /// `import * as foo from 'x'`
    Namespace,
    /// `import { foo } from 'x'`
    Named,
}

/// A name an import statement brings into local scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Name bound in the importing module.
    pub local_name: String,
    /// Name exported by the imported module. Equal to `local_name` unless
    /// aliased; default and namespace bindings use the local name.
    pub exported_name: String,
    /// Import style.
    pub kind: BindingKind,
}

impl ImportBinding {
    fn new(kind: BindingKind, exported: &str, local: &str) -> Self {
        Self {
            local_name: local.to_string(),
            exported_name: exported.to_string(),
            kind,
        }
    }

    /// Binding produced for a specifier shape that is not understood.
    /// Its empty names suppress fix generation downstream.
    #[must_use]
    pub fn unrecognized() -> Self {
        Self::new(BindingKind::Named, "", "")
    }

    /// Returns true for `{ a as b }` style bindings.
    #[must_use]
    pub fn is_aliased(&self) -> bool {
        self.exported_name != self.local_name
    }

    /// Returns false for bindings produced from unrecognized shapes.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !self.local_name.is_empty() && !self.exported_name.is_empty()
    }
}

/// Extracts bindings from an import declaration, in source order.
///
/// Never fails: unrecognized specifiers yield [`ImportBinding::unrecognized`].
#[must_use]
pub fn extract_bindings(decl: &ImportDeclaration) -> Vec<ImportBinding> {
    decl.specifiers
        .iter()
        .map(|spec| match spec {
            ImportSpecifier::Default { local } => {
                ImportBinding::new(BindingKind::Default, local, local)
            }
            ImportSpecifier::Namespace { local } => {
                ImportBinding::new(BindingKind::Namespace, local, local)
            }
            ImportSpecifier::Named { imported, local } => {
                ImportBinding::new(BindingKind::Named, imported, local)
            }
            ImportSpecifier::Unrecognized => ImportBinding::unrecognized(),
        })
        .collect()
}

/// Package name of a `require('<pkg>')` declarator.
///
/// Bindings are not extracted for require calls: the declarator may bind
/// any destructuring pattern, so require statements are never rewritten.
#[must_use]
pub fn require_source(declarator: &Declarator) -> Option<&str> {
    match declarator {
        Declarator::Require { source } => Some(source),
        Declarator::Other => None,
    }
}

/// Names to look up in an alternate module's exports.
///
/// Aliases are normalized to the exported name; unrecognized bindings are
/// dropped.
#[must_use]
pub fn requested_names(bindings: &[ImportBinding]) -> Vec<String> {
    bindings
        .iter()
        .filter(|b| b.is_recognized())
        .map(|b| b.exported_name.clone())
        .collect()
}
