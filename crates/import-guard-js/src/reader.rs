//! Reading alternate-file sources.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads project files by project-relative path.
pub trait SourceReader {
    /// Returns the contents of `path`, resolved against the project root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read as UTF-8.
    fn read_source(&self, path: &str) -> io::Result<String>;
}

impl<R: SourceReader + ?Sized> SourceReader for &R {
    fn read_source(&self, path: &str) -> io::Result<String> {
        (**self).read_source(path)
    }
}

/// Reads files from disk relative to a project root.
#[derive(Debug, Clone)]
pub struct FsReader {
    root: PathBuf,
}

impl FsReader {
    /// Creates a reader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root this reader resolves against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceReader for FsReader {
    fn read_source(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(path))
    }
}

/// Serves files from memory. Useful when embedding the rule in an editor
/// buffer model.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    /// Creates an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl SourceReader for MemoryReader {
    fn read_source(&self, path: &str) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{path}: not found"))
        })
    }
}
