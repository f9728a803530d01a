//! Check command implementation.

use anyhow::{Context, Result};
use import_guard_core::{apply_replacements, LintResult, Replacement, Violation};
use import_guard_js::{ImportGuardConfig, ImportGuardEngine};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of the `check` subcommand.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Write fixes back to disk.
    pub fix: bool,
    /// Extra exclude patterns from the command line.
    pub exclude: Vec<String>,
}

/// Runs the check command. Returns whether error-severity violations remain.
pub fn run(path: &Path, source: &ConfigSource, options: &CheckOptions) -> Result<bool> {
    let mut config = source.load()?;
    let root = if config.root.is_absolute() {
        config.root.clone()
    } else {
        path.join(&config.root)
    };
    config.root.clone_from(&root);
    config.exclude.extend(options.exclude.iter().cloned());

    let result = check_tree(&config, options.fix)?;
    super::output::print(&result, options.format, &root)?;
    Ok(result.has_errors())
}

/// Checks every source file under `config.root`, optionally fixing them.
fn check_tree(config: &ImportGuardConfig, fix: bool) -> Result<LintResult> {
    let engine = ImportGuardEngine::new(config);
    let files = discover_files(config)?;

    tracing::info!(
        "Checking {} file(s) against {} restricted package(s)",
        files.len(),
        engine.rule().table().len()
    );

    let mut result = LintResult::new();

    for file_path in &files {
        let text = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        let rel = file_path
            .strip_prefix(&config.root)
            .unwrap_or(file_path)
            .to_path_buf();

        let mut violations = engine
            .check_source(&rel, &text)
            .with_context(|| format!("Failed to parse {}", rel.display()))?;

        if fix {
            if let Some((fixed, applied)) = fix_source(&text, &violations)? {
                std::fs::write(file_path, &fixed)
                    .with_context(|| format!("Failed to write {}", file_path.display()))?;
                tracing::info!("Fixed {applied} import(s) in {}", rel.display());
                result.fixes_applied += applied;
                violations = engine
                    .check_source(&rel, &fixed)
                    .with_context(|| format!("Failed to parse {}", rel.display()))?;
            }
        }

        result.violations.extend(violations);
        result.files_checked += 1;
    }

    result.sort();
    Ok(result)
}

/// Applies the fixable violations to `text`. Returns the new text and the
/// number of edits applied, or `None` when nothing changed.
fn fix_source(text: &str, violations: &[Violation]) -> Result<Option<(String, usize)>> {
    let edits: Vec<Replacement> = violations
        .iter()
        .filter_map(Violation::replacement)
        .cloned()
        .collect();
    if edits.is_empty() {
        return Ok(None);
    }
    let outcome = apply_replacements(text, &edits)?;
    if outcome.skipped > 0 {
        tracing::warn!("Skipped {} overlapping fix(es)", outcome.skipped);
    }
    Ok((outcome.applied > 0).then_some((outcome.text, outcome.applied)))
}

fn discover_files(config: &ImportGuardConfig) -> Result<Vec<PathBuf>> {
    let mut builder = ignore::WalkBuilder::new(&config.root);
    builder.hidden(false).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || !config.is_source_file(path) {
            continue;
        }

        let rel = path.strip_prefix(&config.root).unwrap_or(path);
        if !is_excluded(&rel.to_string_lossy(), &config.exclude) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Matches `**/dir/**` style patterns by their literal core.
fn is_excluded(rel: &str, patterns: &[String]) -> bool {
    let rel = rel.replace('\\', "/");
    patterns.iter().any(|pattern| {
        let core = pattern.replace("**/", "").replace("/**", "");
        !core.is_empty() && rel.contains(&core)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[analyzer]
exclude = ["**/vendor/**"]

[[alternate_packages]]
original = "jquery"

[[alternate_packages]]
original = "lodash"
alternate = "lodash-es"
"#;

    fn project() -> (TempDir, ImportGuardConfig) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::create_dir_all(tmp.path().join("vendor")).unwrap();
        fs::write(
            tmp.path().join("src/a.js"),
            "import _ from 'lodash';\nimport $ from 'jquery';\n",
        )
        .unwrap();
        fs::write(tmp.path().join("src/b.ts"), "import { map } from 'lodash';\n").unwrap();
        fs::write(tmp.path().join("src/style.css"), "body {}\n").unwrap();
        fs::write(tmp.path().join("vendor/c.js"), "import $ from 'jquery';\n").unwrap();

        let mut config = ImportGuardConfig::parse(CONFIG).unwrap();
        config.root = tmp.path().to_path_buf();
        (tmp, config)
    }

    #[test]
    fn discovers_source_files_outside_excludes() {
        let (tmp, config) = project();
        let files = discover_files(&config).unwrap();
        let rel: Vec<PathBuf> = files
            .iter()
            .map(|f| f.strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(rel, vec![PathBuf::from("src/a.js"), PathBuf::from("src/b.ts")]);
    }

    #[test]
    fn check_reports_relative_paths() {
        let (_tmp, config) = project();
        let result = check_tree(&config, false).unwrap();
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.violations.len(), 3);
        assert_eq!(result.violations[0].location.file, PathBuf::from("src/a.js"));
        assert_eq!(result.fixable_count(), 2);
        assert!(result.has_errors());
    }

    #[test]
    fn fix_rewrites_files_and_rechecks() {
        let (tmp, config) = project();
        let result = check_tree(&config, true).unwrap();
        assert_eq!(result.fixes_applied, 2);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code, "IG001");

        let a = fs::read_to_string(tmp.path().join("src/a.js")).unwrap();
        assert_eq!(a, "import _ from 'lodash-es';\nimport $ from 'jquery';\n");
        let b = fs::read_to_string(tmp.path().join("src/b.ts")).unwrap();
        assert_eq!(b, "import { map } from 'lodash-es';\n");
    }

    #[test]
    fn fix_source_without_edits_is_none() {
        assert!(fix_source("let a = 1;", &[]).unwrap().is_none());
    }

    #[test]
    fn exclude_patterns_match_literal_core() {
        let patterns = vec!["**/node_modules/**".to_string(), "**/".to_string()];
        assert!(is_excluded("web/node_modules/x/index.js", &patterns));
        assert!(!is_excluded("src/index.js", &patterns));
    }
}
