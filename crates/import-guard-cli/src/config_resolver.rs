//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/import-guard.toml` or `.import-guard.toml`
//! 3. `$IMPORT_GUARD_CONFIG_DIR/config.toml` or `~/.import-guard/config.toml`
//! 4. Nothing found → [`ConfigSource::Missing`]

use anyhow::{bail, Context, Result};
use import_guard_js::ImportGuardConfig;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No config file anywhere.
    Missing,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Missing => None,
        }
    }

    /// Short origin label for log lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicit",
            Self::Project(_) => "project",
            Self::Global(_) => "global",
            Self::Missing => "none",
        }
    }

    /// Reads, parses and validates the resolved file.
    ///
    /// # Errors
    ///
    /// Fails when no file was found or the file is unreadable or invalid.
    pub fn load(&self) -> Result<ImportGuardConfig> {
        let Some(path) = self.path() else {
            bail!("No import-guard.toml found. Run `import-guard init` to create one.");
        };
        tracing::info!("Using {} config: {}", self.label(), path.display());
        ImportGuardConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["import-guard.toml", ".import-guard.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let project = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file());
    if let Some(candidate) = project {
        tracing::debug!("Found project config: {}", candidate.display());
        return ConfigSource::Project(candidate);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Missing,
    }
}

/// Returns the global config directory path.
///
/// Resolution: `$IMPORT_GUARD_CONFIG_DIR` > `~/.import-guard/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("IMPORT_GUARD_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".import-guard"))
}
