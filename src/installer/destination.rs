//! Destination directory selection.
//!
//! Installed binaries must land in a writable directory that is already
//! on the executable search path, so that the placed runtime is visible
//! without a PATH change. Candidates are probed in priority order:
//! user-scoped bin directories first, then system-scoped ones, then the
//! final search path entry as a last resort.

use crate::error::{Error, Result};
use crate::path::SearchPath;
use anyhow::anyhow;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Throwaway file name used to probe directory writability.
const PROBE_FILE: &str = "test-node-install-dir-perms";

/// Pick the first writable destination directory on the search path.
///
/// Probing creates and immediately deletes a throwaway file; no artifact
/// survives selection. If no candidate is writable the error names the
/// most-preferred candidate.
pub fn choose_destination(search: &SearchPath, home: Option<&Path>) -> Result<PathBuf> {
    let candidates = candidates(search, home);
    if candidates.is_empty() {
        return Err(Error::Other(anyhow!(
            "no destination candidates: the search path is empty"
        )));
    }

    for dir in &candidates {
        if probe_writable(dir) {
            return Ok(dir.clone());
        }
        tracing::debug!(dir = %dir.display(), "destination candidate not writable");
    }

    Err(Error::EnvironmentWrite {
        path: candidates[0].clone(),
    })
}

/// Candidate directories in priority order, filtered to search path
/// members, with the final path entry appended as a last resort.
fn candidates(search: &SearchPath, home: Option<&Path>) -> Vec<PathBuf> {
    let mut preferred: Vec<PathBuf> = Vec::new();
    if let Some(home) = home {
        preferred.push(home.join("bin"));
        preferred.push(home.join(".bin"));
    }
    preferred.push(PathBuf::from("/usr/local/bin"));
    preferred.push(PathBuf::from("/usr/bin"));

    let mut list: Vec<PathBuf> = preferred
        .into_iter()
        .filter(|dir| search.includes(dir))
        .collect();
    if let Some(last) = search.last() {
        if !list.iter().any(|dir| dir == last) {
            list.push(last.to_path_buf());
        }
    }
    list
}

/// Probe writability by creating and deleting a throwaway file.
fn probe_writable(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let probe = dir.join(PROBE_FILE);
    match File::create(&probe) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn home_bin_is_preferred_when_on_path() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let home_bin = home.join("bin");
        let fallback = temp.path().join("fallback");
        fs::create_dir_all(&home_bin).unwrap();
        fs::create_dir_all(&fallback).unwrap();

        let mut search = SearchPath::new("");
        search.add_path(&home_bin);
        search.add_path(&fallback);

        let chosen = choose_destination(&search, Some(home.as_path())).unwrap();
        assert_eq!(chosen, home_bin);
    }

    #[test]
    fn unwritable_candidate_falls_through_to_next() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        // home/bin is on the path but does not exist, so its probe fails
        let home_bin = home.join("bin");
        let fallback = temp.path().join("fallback");
        fs::create_dir_all(&fallback).unwrap();

        let mut search = SearchPath::new("");
        search.add_path(&home_bin);
        search.add_path(&fallback);

        let chosen = choose_destination(&search, Some(home.as_path())).unwrap();
        assert_eq!(chosen, fallback);
    }

    #[test]
    fn probe_leaves_no_artifact_behind() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let home_bin = home.join("bin");
        fs::create_dir_all(&home_bin).unwrap();

        let mut search = SearchPath::new("");
        search.add_path(&home_bin);

        choose_destination(&search, Some(home.as_path())).unwrap();
        assert!(
            fs::read_dir(&home_bin).unwrap().next().is_none(),
            "probe file must not survive selection"
        );
    }

    #[test]
    fn last_path_entry_is_last_resort() {
        let temp = TempDir::new().unwrap();
        let tail = temp.path().join("tail");
        fs::create_dir_all(&tail).unwrap();

        let mut search = SearchPath::new("");
        search.add_path(temp.path().join("unrelated"));
        search.add_path(&tail);

        // No home, no system bins on this path: only the tail qualifies.
        let chosen = choose_destination(&search, None).unwrap();
        assert_eq!(chosen, tail);
    }

    #[test]
    fn no_writable_candidate_is_environment_write_error() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let home_bin = home.join("bin");

        let mut search = SearchPath::new("");
        search.add_path(&home_bin);

        let result = choose_destination(&search, Some(home.as_path()));
        match result {
            Err(Error::EnvironmentWrite { path }) => assert_eq!(path, home_bin),
            other => panic!("expected EnvironmentWrite, got {other:?}"),
        }
    }

    #[test]
    fn empty_search_path_is_an_error() {
        let search = SearchPath::new("");
        assert!(choose_destination(&search, None).is_err());
    }

    #[test]
    fn probe_writable_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        assert!(!probe_writable(&temp.path().join("missing")));
        assert!(probe_writable(temp.path()));
    }
}
