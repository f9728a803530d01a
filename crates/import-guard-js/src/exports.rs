//! Alternate-file export validation.
//!
//! A custom-file alternate is a facade module that is expected to re-export
//! whatever callers used to import from the restricted package. This module
//! reads that file, collects its named exports and reports which requested
//! names it does not provide.
//!
//! Only named exports count. `export default` and `export * from` are not
//! considered, because callers consume the facade through named imports.

use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::Node;

use crate::reader::SourceReader;
use crate::syntax::{self, node_text, string_value, ParseError, SourceLanguage};

/// Outcome of validating a custom-file alternate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlternateCheck {
    /// The alternate file could not be read. The cause is logged.
    NotFound,
    /// The file was read; `missing` lists requested names it does not export,
    /// in request order.
    Checked {
        /// Requested names absent from the file's named exports.
        missing: Vec<String>,
    },
}

/// Reads the alternate at `path` and checks it exports every requested name.
///
/// The file is read on every call.
pub fn check_alternate<R: SourceReader>(
    reader: &R,
    path: &str,
    requested: &[String],
) -> AlternateCheck {
    match reader.read_source(path) {
        Ok(source) => {
            let language = SourceLanguage::from_path(Path::new(path));
            AlternateCheck::Checked {
                missing: missing_exports(&source, language, requested),
            }
        }
        Err(e) => {
            tracing::warn!("Unable to read alternate {path}: {e}");
            AlternateCheck::NotFound
        }
    }
}

/// Returns the requested names that `source` does not export by name.
///
/// Empty source exports nothing. Source that fails to parse is treated the
/// same way.
#[must_use]
pub fn missing_exports(
    source: &str,
    language: SourceLanguage,
    requested: &[String],
) -> Vec<String> {
    if source.is_empty() {
        return requested.to_vec();
    }
    let exported = match exported_names(source, language) {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("Treating unparseable alternate as exporting nothing: {e}");
            BTreeSet::new()
        }
    };
    requested
        .iter()
        .filter(|name| !exported.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Collects the names of all named exports in `source`.
///
/// # Errors
///
/// Returns an error if the source does not parse cleanly.
pub fn exported_names(
    source: &str,
    language: SourceLanguage,
) -> Result<BTreeSet<String>, ParseError> {
    let tree = syntax::parse_strict(source, language)?;
    let src = source.as_bytes();
    let root = tree.root_node();

    let mut names = BTreeSet::new();
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        if node.kind() == "export_statement" {
            collect_export(node, src, &mut names);
        }
    }
    tracing::debug!("Collected {} named export(s)", names.len());
    Ok(names)
}

fn collect_export(node: Node<'_>, src: &[u8], names: &mut BTreeSet<String>) {
    let mut cursor = node.walk();
    let is_default = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == "default");
    if is_default {
        return;
    }

    if let Some(decl) = node.child_by_field_name("declaration") {
        declared_names(decl, src, names);
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "export_clause" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let exported = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(n) = exported {
                        names.insert(export_name(n, src));
                    }
                }
            }
            // `export * as ns from '...'`
            "namespace_export" => {
                let mut inner = child.walk();
                let name = child
                    .named_children(&mut inner)
                    .find(|c| matches!(c.kind(), "identifier" | "string"));
                if let Some(n) = name {
                    names.insert(export_name(n, src));
                }
            }
            _ => {}
        }
    }
}

fn export_name(node: Node<'_>, src: &[u8]) -> String {
    if node.kind() == "string" {
        string_value(node, src)
    } else {
        node_text(node, src).to_string()
    }
}

fn declared_names(decl: Node<'_>, src: &[u8], names: &mut BTreeSet<String>) {
    match decl.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = decl.walk();
            for declarator in decl.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(pattern) = declarator.child_by_field_name("name") {
                    pattern_names(pattern, src, names);
                }
            }
        }
        // `declare const a: number;` wraps the declaration it names.
        "ambient_declaration" => {
            let mut cursor = decl.walk();
            for inner in decl.named_children(&mut cursor) {
                declared_names(inner, src, names);
            }
        }
        _ => {
            if let Some(name) = decl.child_by_field_name("name") {
                names.insert(node_text(name, src).to_string());
            }
        }
    }
}

/// Identifiers bound by a declarator pattern such as `{ a, b: c, d = 1 }`.
fn pattern_names(pattern: Node<'_>, src: &[u8], names: &mut BTreeSet<String>) {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            names.insert(node_text(pattern, src).to_string());
        }
        "pair_pattern" => {
            if let Some(value) = pattern.child_by_field_name("value") {
                pattern_names(value, src, names);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = pattern.child_by_field_name("left") {
                pattern_names(left, src, names);
            }
        }
        _ => {
            let mut cursor = pattern.walk();
            for child in pattern.named_children(&mut cursor) {
                pattern_names(child, src, names);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemoryReader;

    fn names(src: &str) -> Vec<String> {
        exported_names(src, SourceLanguage::JavaScript)
            .unwrap()
            .into_iter()
            .collect()
    }

    fn req(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn collects_export_clause_and_aliases() {
        let src = "import { a, b } from 'lib';\nexport { a, b as bee };\n";
        assert_eq!(names(src), vec!["a", "bee"]);
    }

    #[test]
    fn collects_re_exports() {
        let src = "export { format, parse } from 'date-fns';\nexport * as fp from 'date-fns/fp';\n";
        assert_eq!(names(src), vec!["format", "fp", "parse"]);
    }

    #[test]
    fn collects_declarations() {
        let src = "export const x = 1, { y, z: zed } = obj;\nexport function f() {}\nexport class K {}\n";
        assert_eq!(names(src), vec!["K", "f", "x", "y", "zed"]);
    }

    #[test]
    fn ignores_default_and_star_exports() {
        let src = "export default function main() {}\nexport * from 'other';\n";
        assert!(names(src).is_empty());
    }

    #[test]
    fn collects_typescript_declarations() {
        let src = "export interface Props {}\nexport type Id = string;\nexport enum Mode { A }\n";
        let got: Vec<String> = exported_names(src, SourceLanguage::TypeScript)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(got, vec!["Id", "Mode", "Props"]);
    }

    #[test]
    fn collects_ambient_declarations() {
        let src = "export declare const a: number;\nexport declare function f(): void;\n";
        let got: Vec<String> = exported_names(src, SourceLanguage::TypeScript)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(got, vec!["a", "f"]);
        assert!(missing_exports(src, SourceLanguage::TypeScript, &req(&["a", "f"])).is_empty());
    }

    #[test]
    fn missing_preserves_request_order() {
        let src = "export { x };";
        let missing = missing_exports(src, SourceLanguage::JavaScript, &req(&["z", "x", "y"]));
        assert_eq!(missing, vec!["z", "y"]);
    }

    #[test]
    fn empty_source_exports_nothing() {
        let missing = missing_exports("", SourceLanguage::JavaScript, &req(&["x", "y"]));
        assert_eq!(missing, vec!["x", "y"]);
    }

    #[test]
    fn unparseable_source_exports_nothing() {
        let missing = missing_exports(
            "export { x, from",
            SourceLanguage::JavaScript,
            &req(&["x"]),
        );
        assert_eq!(missing, vec!["x"]);
    }

    #[test]
    fn check_alternate_reports_unreadable_path() {
        let reader = MemoryReader::new();
        let check = check_alternate(&reader, "src/missing.js", &req(&["x"]));
        assert_eq!(check, AlternateCheck::NotFound);
    }

    #[test]
    fn check_alternate_rereads_on_every_call() {
        let first = MemoryReader::new().with_file("f.js", "export { x };");
        assert_eq!(
            check_alternate(&first, "f.js", &req(&["x"])),
            AlternateCheck::Checked { missing: vec![] }
        );
        let second = first.with_file("f.js", "export { y };");
        assert_eq!(
            check_alternate(&second, "f.js", &req(&["x"])),
            AlternateCheck::Checked {
                missing: vec!["x".into()]
            }
        );
    }
}
