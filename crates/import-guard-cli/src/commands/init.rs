//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# import-guard configuration
# Imports and require() calls of the packages below are reported.

[analyzer]
# Root directory to analyze; alternate file paths resolve against it
root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
]

# File suffixes to check
# extensions = [".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx"]

[settings]
# Prefix used when rewriting imports to a project-local alternate file,
# e.g. "@/" turns src/lib/date.js into '@/src/lib/date'
custom_file_import_root_prefix = ""

# Suffixes that mark an alternate as a project-local file
# custom_file_extensions = [".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx"]

# Restricted packages, matched exactly and in order.
# Without `alternate` the import is simply forbidden.

# [[alternate_packages]]
# original = "jquery"

# A published package alternate gets an automatic fix.

# [[alternate_packages]]
# original = "lodash"
# alternate = "lodash-es"
# severity = "warning"

# A local file alternate must export every name callers import.

# [[alternate_packages]]
# original = "moment"
# alternate = "src/lib/date.js"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("import-guard.toml");
    write_template(config_path, force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Add [[alternate_packages]] entries for your project");
    println!("  2. Run: import-guard check");

    Ok(())
}

fn write_template(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
