//! JavaScript / TypeScript syntax layer.
//!
//! Parses source text with Tree-sitter and lowers the statements the rule
//! cares about into small tagged types. Everything downstream works on
//! [`Statement`] values, never on raw Tree-sitter nodes.

use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

/// Grammar used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    /// JavaScript and JSX, parsed with the TSX grammar.
    JavaScript,
    /// TypeScript without JSX.
    TypeScript,
}

impl SourceLanguage {
    /// Picks the grammar from a file extension. Unknown extensions parse as
    /// JavaScript.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            _ => Self::JavaScript,
        }
    }

    /// Language identifier used in log and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        }
    }

    fn grammar(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

/// Errors from parsing source text.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader error detail.
        message: String,
    },
    /// Tree-sitter returned no tree.
    #[error("parser produced no tree")]
    NoTree,
    /// The source contains a syntax error.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Column (1-indexed).
        column: usize,
    },
}

/// Parses source text, tolerating syntax errors.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded or no tree is produced.
pub fn parse(source: &str, language: SourceLanguage) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|e| ParseError::Language {
            language: language.name(),
            message: e.to_string(),
        })?;
    parser.parse(source, None).ok_or(ParseError::NoTree)
}

/// Parses source text and rejects trees containing syntax errors.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] pointing at the first error node, or any
/// error from [`parse`].
pub fn parse_strict(source: &str, language: SourceLanguage) -> Result<Tree, ParseError> {
    let tree = parse(source, language)?;
    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root);
        return Err(ParseError::Syntax {
            line: at.start_position().row + 1,
            column: at.start_position().column + 1,
        });
    }
    Ok(tree)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

pub(crate) fn node_text<'a>(node: Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Value of a string literal node, without its quotes.
pub(crate) fn string_value(node: Node<'_>, src: &[u8]) -> String {
    let raw = node_text(node, src);
    raw.trim_matches('"').trim_matches('\'').to_string()
}

/// Returns true if `node` has an anonymous `type` / `typeof` keyword child,
/// as in `import type { A } from 'x'`.
fn has_type_modifier(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && matches!(c.kind(), "type" | "typeof"));
    found
}

/// Byte range and start position of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed byte offset within line).
    pub column: usize,
}

impl Span {
    fn of(node: Node<'_>) -> Self {
        let pos = node.start_position();
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
            line: pos.row + 1,
            column: pos.column + 1,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-length span.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One entry of an import clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// `import foo from 'x'`
    Default {
        /// Bound identifier.
        local: String,
    },
    /// `import * as ns from 'x'`
    Namespace {
        /// Bound identifier.
        local: String,
    },
    /// `import { a }` or `import { a as b }`
    Named {
        /// Name exported by the module.
        imported: String,
        /// Name bound in the importing module.
        local: String,
    },
    /// A shape the rule does not rewrite (string-named specifiers,
    /// type-only imports, `import x = require(...)`).
    Unrecognized,
}

/// An `import ... from '...'` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Module specifier, without quotes.
    pub source: String,
    /// Specifiers in source order. Empty for side-effect imports.
    pub specifiers: Vec<ImportSpecifier>,
    /// Statement span, trailing semicolon included.
    pub span: Span,
}

/// One declarator of a `const` / `let` / `var` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarator {
    /// Initialized with `require('<source>')`.
    Require {
        /// Module specifier, without quotes.
        source: String,
    },
    /// Any other initializer, or none.
    Other,
}

/// A `const` / `let` / `var` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    /// Declarators in source order.
    pub declarators: Vec<Declarator>,
    /// Statement span.
    pub span: Span,
}

/// A statement the rule has an entry point for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Import declaration.
    Import(ImportDeclaration),
    /// Variable declaration.
    Variable(VariableDeclaration),
}

/// Collects import and variable declarations depth-first in document order.
#[must_use]
pub fn collect_statements(tree: &Tree, source: &str) -> Vec<Statement> {
    let src = source.as_bytes();
    let mut statements = Vec::new();
    let mut cursor = tree.root_node().walk();

    loop {
        let node = cursor.node();
        match node.kind() {
            "import_statement" => {
                if let Some(decl) = lower_import(node, src) {
                    statements.push(Statement::Import(decl));
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                statements.push(Statement::Variable(lower_variable(node, src)));
            }
            _ => {}
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return statements;
            }
        }
    }
}

fn lower_import(node: Node<'_>, src: &[u8]) -> Option<ImportDeclaration> {
    let span = Span::of(node);

    if let Some(source) = node.child_by_field_name("source") {
        let mut specifiers = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "import_clause" {
                lower_import_clause(child, src, &mut specifiers);
            }
        }
        if has_type_modifier(node) {
            specifiers.fill(ImportSpecifier::Unrecognized);
        }
        return Some(ImportDeclaration {
            source: string_value(source, src),
            specifiers,
            span,
        });
    }

    // `import x = require('pkg')`
    let mut cursor = node.walk();
    let require = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "import_require_clause")?;
    let source = require.child_by_field_name("source")?;
    Some(ImportDeclaration {
        source: string_value(source, src),
        specifiers: vec![ImportSpecifier::Unrecognized],
        span,
    })
}

fn lower_import_clause(clause: Node<'_>, src: &[u8], out: &mut Vec<ImportSpecifier>) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => out.push(ImportSpecifier::Default {
                local: node_text(child, src).to_string(),
            }),
            "namespace_import" => {
                let mut inner = child.walk();
                let local = child
                    .named_children(&mut inner)
                    .find(|c| c.kind() == "identifier")
                    .map(|c| node_text(c, src).to_string());
                out.push(match local {
                    Some(local) => ImportSpecifier::Namespace { local },
                    None => ImportSpecifier::Unrecognized,
                });
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() == "import_specifier" {
                        out.push(lower_import_specifier(spec, src));
                    }
                }
            }
            "comment" => {}
            _ => out.push(ImportSpecifier::Unrecognized),
        }
    }
}

fn lower_import_specifier(spec: Node<'_>, src: &[u8]) -> ImportSpecifier {
    if has_type_modifier(spec) {
        return ImportSpecifier::Unrecognized;
    }
    let Some(name) = spec.child_by_field_name("name") else {
        return ImportSpecifier::Unrecognized;
    };
    if name.kind() != "identifier" {
        return ImportSpecifier::Unrecognized;
    }
    let imported = node_text(name, src).to_string();
    let local = spec
        .child_by_field_name("alias")
        .map_or_else(|| imported.clone(), |a| node_text(a, src).to_string());
    ImportSpecifier::Named { imported, local }
}

fn lower_variable(node: Node<'_>, src: &[u8]) -> VariableDeclaration {
    let mut cursor = node.walk();
    let declarators = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "variable_declarator")
        .map(|d| lower_declarator(d, src))
        .collect();
    VariableDeclaration {
        declarators,
        span: Span::of(node),
    }
}

fn lower_declarator(declarator: Node<'_>, src: &[u8]) -> Declarator {
    let Some(value) = declarator.child_by_field_name("value") else {
        return Declarator::Other;
    };
    if value.kind() != "call_expression" {
        return Declarator::Other;
    }
    let is_require = value
        .child_by_field_name("function")
        .is_some_and(|f| f.kind() == "identifier" && node_text(f, src) == "require");
    if !is_require {
        return Declarator::Other;
    }
    let Some(arguments) = value.child_by_field_name("arguments") else {
        return Declarator::Other;
    };
    let mut cursor = arguments.walk();
    let args: Vec<Node<'_>> = arguments
        .named_children(&mut cursor)
        .filter(|a| a.kind() != "comment")
        .collect();
    match args.as_slice() {
        [arg] if arg.kind() == "string" => Declarator::Require {
            source: string_value(*arg, src),
        },
        _ => Declarator::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(src: &str) -> Vec<Statement> {
        let tree = parse(src, SourceLanguage::JavaScript).unwrap();
        collect_statements(&tree, src)
    }

    fn only_import(src: &str) -> ImportDeclaration {
        match statements(src).as_slice() {
            [Statement::Import(decl)] => decl.clone(),
            other => panic!("expected one import, got {other:?}"),
        }
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(
            SourceLanguage::from_path(Path::new("a/b.ts")),
            SourceLanguage::TypeScript
        );
        assert_eq!(
            SourceLanguage::from_path(Path::new("a/b.tsx")),
            SourceLanguage::JavaScript
        );
        assert_eq!(
            SourceLanguage::from_path(Path::new("a/b.mjs")),
            SourceLanguage::JavaScript
        );
    }

    #[test]
    fn lowers_default_import() {
        let decl = only_import("import $ from 'jquery';\n");
        assert_eq!(decl.source, "jquery");
        assert_eq!(
            decl.specifiers,
            vec![ImportSpecifier::Default { local: "$".into() }]
        );
        assert_eq!(decl.span.start, 0);
        assert_eq!(decl.span.end, "import $ from 'jquery';".len());
        assert_eq!((decl.span.line, decl.span.column), (1, 1));
    }

    #[test]
    fn lowers_namespace_import() {
        let decl = only_import("import * as R from \"ramda\";");
        assert_eq!(decl.source, "ramda");
        assert_eq!(
            decl.specifiers,
            vec![ImportSpecifier::Namespace { local: "R".into() }]
        );
    }

    #[test]
    fn lowers_named_imports_with_alias() {
        let decl = only_import("import { map, filter as keep } from 'lodash';");
        assert_eq!(
            decl.specifiers,
            vec![
                ImportSpecifier::Named {
                    imported: "map".into(),
                    local: "map".into()
                },
                ImportSpecifier::Named {
                    imported: "filter".into(),
                    local: "keep".into()
                },
            ]
        );
    }

    #[test]
    fn lowers_default_plus_named() {
        let decl = only_import("import React, { useState } from 'react';");
        assert_eq!(
            decl.specifiers,
            vec![
                ImportSpecifier::Default {
                    local: "React".into()
                },
                ImportSpecifier::Named {
                    imported: "useState".into(),
                    local: "useState".into()
                },
            ]
        );
    }

    #[test]
    fn side_effect_import_has_no_specifiers() {
        let decl = only_import("import 'polyfill';");
        assert_eq!(decl.source, "polyfill");
        assert!(decl.specifiers.is_empty());
    }

    #[test]
    fn type_only_import_is_unrecognized() {
        let src = "import type { Props } from 'react';";
        let tree = parse(src, SourceLanguage::TypeScript).unwrap();
        let stmts = collect_statements(&tree, src);
        let Statement::Import(decl) = &stmts[0] else {
            panic!("expected import");
        };
        assert_eq!(decl.specifiers, vec![ImportSpecifier::Unrecognized]);
    }

    #[test]
    fn lowers_require_declarator() {
        let stmts = statements("const moment = require('moment'), x = 1;");
        assert_eq!(
            stmts,
            vec![Statement::Variable(VariableDeclaration {
                declarators: vec![
                    Declarator::Require {
                        source: "moment".into()
                    },
                    Declarator::Other,
                ],
                span: Span {
                    start: 0,
                    end: 40,
                    line: 1,
                    column: 1
                },
            })]
        );
    }

    #[test]
    fn require_with_non_literal_argument_is_other() {
        let stmts = statements("var m = require(name);\nlet n = load('x');");
        for stmt in stmts {
            let Statement::Variable(decl) = stmt else {
                panic!("expected variable declaration");
            };
            assert_eq!(decl.declarators, vec![Declarator::Other]);
        }
    }

    #[test]
    fn finds_nested_require_in_document_order() {
        let src = "import a from 'a';\nfunction f() {\n  const b = require('b');\n}\nconst c = require('c');\n";
        let sources: Vec<String> = statements(src)
            .into_iter()
            .flat_map(|s| match s {
                Statement::Import(d) => vec![d.source],
                Statement::Variable(v) => v
                    .declarators
                    .into_iter()
                    .filter_map(|d| match d {
                        Declarator::Require { source } => Some(source),
                        Declarator::Other => None,
                    })
                    .collect(),
            })
            .collect();
        assert_eq!(sources, vec!["a", "b", "c"]);
    }

    #[test]
    fn strict_parse_reports_syntax_error() {
        let err = parse_strict("export { a, from 'x'", SourceLanguage::JavaScript).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
        assert!(parse_strict("export const a = 1;", SourceLanguage::JavaScript).is_ok());
    }
}
