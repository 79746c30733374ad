//! Executable search path modeling.
//!
//! [`SearchPath`] abstracts the `PATH` environment variable as an ordered,
//! deduplicated list of directories and provides the lookup primitives the
//! rest of the installer builds on: membership tests and executable
//! lookups. Lookup order is deterministic and equals insertion order, so
//! the first directory containing a match always wins, even when a later
//! directory also contains one.

use std::fs;
use std::path::{Path, PathBuf};

/// Platform path-list separator (`:` on POSIX, `;` on Windows).
pub const SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Ordered, deduplicated view of an executable search path.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    /// Build a search path from a raw path-variable string.
    pub fn new(raw: &str) -> Self {
        let mut path = Self::default();
        path.set_path(raw);
        path
    }

    /// Build a search path from the process's inherited `PATH`.
    pub fn from_env() -> Self {
        Self::new(&std::env::var("PATH").unwrap_or_default())
    }

    /// Replace the entry list by splitting `raw` on the platform separator.
    ///
    /// Duplicates collapse to their first occurrence; order is preserved.
    pub fn set_path(&mut self, raw: &str) {
        let mut entries: Vec<PathBuf> = Vec::new();
        for part in raw.split(SEPARATOR) {
            if part.is_empty() {
                continue;
            }
            let dir = PathBuf::from(part);
            if !entries.contains(&dir) {
                entries.push(dir);
            }
        }
        self.entries = entries;
    }

    /// Append a directory. Does not deduplicate against existing entries.
    pub fn add_path(&mut self, dir: impl Into<PathBuf>) {
        self.entries.push(dir.into());
    }

    /// Remove a directory by exact match.
    pub fn remove_path(&mut self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        self.entries.retain(|entry| entry != dir);
    }

    /// True if `dir` is present verbatim in the entry list.
    pub fn includes(&self, dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        self.entries.iter().any(|entry| entry == dir)
    }

    /// True if any existing directory on the path contains a file `name`.
    pub fn has_executable(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|dir| dir.is_dir() && dir.join(name).exists())
    }

    /// Find `name` by scanning directories in insertion order.
    ///
    /// For each existing directory, an exact-name match is checked first;
    /// with `case_insensitive`, the directory listing is then scanned for
    /// a case-folded match. Missing directories are silently skipped.
    pub fn find_executable(&self, name: &str, case_insensitive: bool) -> Option<PathBuf> {
        let folded = name.to_lowercase();
        for dir in &self.entries {
            if !dir.is_dir() {
                continue;
            }
            let exact = dir.join(name);
            if exact.exists() {
                return Some(exact);
            }
            if !case_insensitive {
                continue;
            }
            let Ok(listing) = fs::read_dir(dir) else {
                continue;
            };
            for entry in listing.flatten() {
                let file_name = entry.file_name();
                if file_name.to_string_lossy().to_lowercase() == folded {
                    return Some(dir.join(file_name));
                }
            }
        }
        None
    }

    /// Directories in lookup order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Final directory of the path, if any.
    pub fn last(&self) -> Option<&Path> {
        self.entries.last().map(PathBuf::as_path)
    }

    /// Serialize back to a path-variable string with the platform separator.
    pub fn join(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string())
    }
}
