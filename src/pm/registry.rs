//! Package manager registry and the first-success-wins install protocol.

use crate::error::{Error, Result};
use crate::path::SearchPath;
use crate::pm::descriptor::{default_catalog, PackageManagerDescriptor};
use crate::shell::{self, CommandOptions, CommandResult};
use std::collections::HashMap;
use std::path::PathBuf;

/// Arguments passed to `sudo` when a manager requires elevation.
pub const SUDO_ARGS: &str = "--preserve-env";

/// Result of trying an ordered candidate list of package managers.
///
/// "Nothing succeeded" is an expected outcome, not an error; a candidate
/// that errored with `continue_on_failure` unset propagates as
/// [`Error`] instead.
#[derive(Debug)]
pub enum PmInstallOutcome {
    /// One candidate succeeded; no further candidates were tried.
    Installed {
        /// Id of the manager that performed the install.
        manager: String,
        /// Captured output of the install command.
        output: CommandResult,
    },
    /// The candidate list was exhausted without a success.
    NoneSucceeded,
}

impl PmInstallOutcome {
    /// True if a candidate succeeded.
    pub fn succeeded(&self) -> bool {
        matches!(self, PmInstallOutcome::Installed { .. })
    }
}

/// Catalog of package managers with a uniform install/detect protocol.
///
/// Each instance copies the immutable built-in catalog at construction
/// and overlays per-instance [`register`](Self::register) calls on top;
/// instances never affect one another.
pub struct PackageManagerRegistry {
    descriptors: HashMap<String, PackageManagerDescriptor>,
    search_path: SearchPath,
}

impl PackageManagerRegistry {
    /// Create a registry from the built-in catalog and the process PATH.
    pub fn new() -> Self {
        Self::with_catalog(default_catalog())
    }

    /// Create a registry from a caller-supplied catalog.
    pub fn with_catalog(catalog: HashMap<String, PackageManagerDescriptor>) -> Self {
        Self {
            descriptors: catalog,
            search_path: SearchPath::from_env(),
        }
    }

    /// Replace the search path used for executable lookups.
    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = search_path;
        self
    }

    /// Insert or overwrite a descriptor at instance scope.
    pub fn register(&mut self, descriptor: PackageManagerDescriptor) {
        self.descriptors.insert(descriptor.id.clone(), descriptor);
    }

    /// Look up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<&PackageManagerDescriptor> {
        self.descriptors.get(id)
    }

    /// All registered manager ids.
    pub fn known_ids(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }

    /// Resolve a manager's executable on the search path.
    pub fn resolve_path(&self, id: &str) -> Option<PathBuf> {
        let descriptor = self.descriptors.get(id)?;
        self.search_path
            .find_executable(&descriptor.display_name, false)
    }

    /// True if the manager's executable is present on the search path.
    pub fn is_installed(&self, id: &str) -> bool {
        self.resolve_path(id).is_some()
    }

    /// Detect a manager's own version by running its version command.
    ///
    /// Returns `None` on any execution or pattern-match failure; absence
    /// of a version is an expected state, never an error.
    pub fn detect_version(&self, id: &str) -> Option<String> {
        let descriptor = self.descriptors.get(id)?;
        let result = shell::execute_quiet(&descriptor.version_command, None).ok()?;
        if !result.success {
            return None;
        }
        descriptor
            .version_pattern
            .captures(&result.stdout)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Build the full install invocation for a package, including the
    /// elevation prefix when the descriptor requires it.
    pub(crate) fn full_install_command(
        descriptor: &PackageManagerDescriptor,
        package: &str,
    ) -> String {
        let command = format!("{} {}", descriptor.install_command, package);
        if descriptor.requires_elevation {
            format!("sudo {SUDO_ARGS} {command}")
        } else {
            command
        }
    }

    /// Install a package through one specific manager.
    ///
    /// Output is streamed to the controlling terminal unless the caller's
    /// options capture it. A non-zero exit propagates as
    /// [`Error::CommandFailed`].
    pub fn install_package(
        &self,
        package: &str,
        id: &str,
        options: &CommandOptions,
    ) -> Result<CommandResult> {
        let descriptor = self
            .descriptors
            .get(id)
            .ok_or_else(|| Error::PackageManagerUnavailable {
                manager: id.to_string(),
                message: "not registered".to_string(),
            })?;
        let command = Self::full_install_command(descriptor, package);
        tracing::debug!(manager = id, %command, "running package manager install");
        let result = shell::execute(&command, options)?;
        if result.success {
            Ok(result)
        } else {
            Err(Error::CommandFailed {
                command,
                code: result.exit_code,
            })
        }
    }

    /// Try to install across an ordered candidate list, first success wins.
    ///
    /// `candidates` maps manager id to the package name to request from
    /// that manager. Candidates with an empty package name or a manager
    /// that is not installed are skipped. On a candidate failure:
    /// with `continue_on_failure` the failure is logged and the next
    /// candidate is tried; otherwise it propagates immediately and no
    /// further candidates run.
    pub fn install_first_available(
        &self,
        candidates: &[(&str, &str)],
        options: &CommandOptions,
        continue_on_failure: bool,
    ) -> Result<PmInstallOutcome> {
        for &(id, package) in candidates {
            if package.is_empty() {
                continue;
            }
            if !self.is_installed(id) {
                tracing::debug!(manager = id, "not installed, skipping candidate");
                continue;
            }
            match self.install_package(package, id, options) {
                Ok(output) => {
                    return Ok(PmInstallOutcome::Installed {
                        manager: id.to_string(),
                        output,
                    });
                }
                Err(err) if continue_on_failure => {
                    tracing::warn!(manager = id, error = %err, "candidate failed, trying next");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(PmInstallOutcome::NoneSucceeded)
    }
}

impl Default for PackageManagerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
