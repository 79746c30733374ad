//! Installation orchestration.
//!
//! [`Installer`] drives the install state machine: classify the current
//! installation state against a target version, try package managers in
//! priority order, and fall back to the manual
//! download/extract/place/link pipeline when no manager succeeds.
//!
//! Exactly one installer runs per process; running two concurrently
//! against the same destination is unsupported and may race on file
//! moves and links.

pub mod destination;
pub mod download;
pub mod extract;
pub mod version;

pub use version::VersionCheck;

use crate::error::{Error, Result};
use crate::path::SearchPath;
use crate::pm::{ids, PackageManagerDescriptor, PackageManagerRegistry, PmInstallOutcome};
use crate::shell::{self, dist_arch, CommandOptions, Platform};
use once_cell::sync::OnceCell;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// Default Node.js version provisioned when none is requested.
pub const DEFAULT_NODE_VERSION: &str = "22.14.0";

/// Base URL of the Node.js binary distribution host.
pub const NODE_DIST_BASE: &str = "https://nodejs.org/dist";

/// Executable name of the target runtime.
pub const NODE_BINARY: &str = "node";

/// Bootstrap script for pnpm on Windows.
const PNPM_BOOTSTRAP_COMMAND: &str =
    r#"powershell -command "iwr https://get.pnpm.io/install.ps1 -useb | iex" -executionpolicy bypass"#;

/// Post-bootstrap invocation provisioning the runtime through pnpm.
const PNPM_GLOBAL_NODE_COMMAND: &str = "pnpm env use --global latest";

/// Detected system runtime version, memoized for the process lifetime.
///
/// First successful detection wins; there is no invalidation path, so a
/// second install in the same process will not observe an in-between
/// version change.
static SYSTEM_VERSION: OnceCell<Option<Version>> = OnceCell::new();

/// Outcome of an install run, or of a state query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    /// The runtime is in place.
    Installed,
    /// No runtime is present.
    NotInstalled,
    /// A PATH change needs a new shell/session before the runtime
    /// becomes visible.
    RestartRequired,
}

/// Flags steering one install run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Try package managers before the manual path.
    pub use_package_manager: bool,
    /// `--force`: allow the manual path anywhere and force relinking.
    pub force: bool,
    /// `--force-manual-node`: allow the manual path on any platform.
    pub force_manual: bool,
    /// `--force-node-link`: replace differing destination entries.
    pub force_link: bool,
    /// `--no-pnpm`: skip the Windows pnpm bootstrap.
    pub no_pnpm: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            use_package_manager: true,
            force: false,
            force_manual: false,
            force_link: false,
            no_pnpm: false,
        }
    }
}

/// Orchestrates version detection and the multi-stage install fallback.
pub struct Installer {
    version: Version,
    search_path: SearchPath,
    registry: PackageManagerRegistry,
    base_url: String,
    workspace_root: PathBuf,
    home: Option<PathBuf>,
}

impl Installer {
    /// Create an installer targeting `version`, reading the process
    /// environment for the search path and home directory.
    pub fn new(version: Version) -> Self {
        let search_path = SearchPath::from_env();
        let registry = PackageManagerRegistry::new().with_search_path(search_path.clone());
        let workspace_root = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("tmp");
        Self {
            version,
            search_path,
            registry,
            base_url: NODE_DIST_BASE.to_string(),
            workspace_root,
            home: dirs::home_dir(),
        }
    }

    /// Replace the search path (and the registry derived from it).
    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.registry = PackageManagerRegistry::new().with_search_path(search_path.clone());
        self.search_path = search_path;
        self
    }

    /// Replace the distribution host (test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replace the temporary workspace directory.
    pub fn with_workspace_root(mut self, workspace_root: PathBuf) -> Self {
        self.workspace_root = workspace_root;
        self
    }

    /// Replace the home directory used for destination candidates.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// The version this installer provisions.
    pub fn required_version(&self) -> &Version {
        &self.version
    }

    /// Distribution directory/file stem, e.g. `node-v22.14.0-linux-x64`.
    pub(crate) fn dist_base_name(&self) -> String {
        format!(
            "node-v{}-{}-{}",
            self.version,
            Platform::current().dist_name(),
            dist_arch()
        )
    }

    /// Full archive URL for the current platform and architecture.
    pub fn download_url(&self) -> String {
        format!(
            "{}/v{}/{}.{}",
            self.base_url,
            self.version,
            self.dist_base_name(),
            Platform::current().archive_extension()
        )
    }

    /// Detected system runtime version, memoized for the process.
    ///
    /// Absence of the runtime, or any execution failure, yields `None`
    /// rather than an error.
    pub fn system_version(&self) -> Option<Version> {
        SYSTEM_VERSION
            .get_or_init(|| self.detect_system_version())
            .clone()
    }

    /// Uncached version probe: locate the runtime, run its version flag.
    pub(crate) fn detect_system_version(&self) -> Option<Version> {
        let node = self.search_path.find_executable(NODE_BINARY, cfg!(windows))?;
        let result = shell::execute_quiet(&format!("\"{}\" --version", node.display()), None).ok()?;
        if !result.success {
            return None;
        }
        version::parse_reported(&result.stdout)
    }

    /// Classify the system runtime against the required version.
    pub fn check_version(&self) -> VersionCheck {
        version::check(self.system_version().as_ref(), &self.version)
    }

    /// Current install state as seen from the search path.
    pub fn status(&self) -> InstallStatus {
        match self.check_version() {
            VersionCheck::NotInstalled => InstallStatus::NotInstalled,
            VersionCheck::Outdated | VersionCheck::UpToDate => InstallStatus::Installed,
        }
    }

    /// Run the install state machine.
    ///
    /// Package managers are tried first (unless disabled); a failed
    /// manager pass falls through to the manual path rather than
    /// aborting. Workspace, permission, extraction and
    /// unsupported-platform conditions are fatal.
    pub fn install(&mut self, opts: &InstallOptions) -> Result<InstallStatus> {
        if opts.use_package_manager {
            match self.install_via_package_manager()? {
                PmInstallOutcome::Installed { manager, .. } => {
                    tracing::info!(%manager, "runtime installed via package manager");
                    return Ok(InstallStatus::Installed);
                }
                PmInstallOutcome::NoneSucceeded => {
                    tracing::warn!(
                        "could not install nodejs using a package manager - falling back to manual installation"
                    );
                }
            }
        }

        let platform = Platform::current();
        if platform.supports_manual_install() || opts.force || opts.force_manual {
            self.install_manual(opts)?;
            return Ok(InstallStatus::Installed);
        }
        if platform == Platform::Windows {
            return self.bootstrap_windows_pnpm(opts);
        }
        Err(Error::UnsupportedPlatform {
            platform: platform.name().to_string(),
        })
    }

    /// Try the fixed-priority package manager candidate table: the
    /// cross-platform manager first, then OS-native managers.
    fn install_via_package_manager(&mut self) -> Result<PmInstallOutcome> {
        // pnpm provisions the runtime itself rather than installing a
        // package from a repository
        self.registry.register(PackageManagerDescriptor::new(
            ids::PNPM,
            "pnpm -v",
            "pnpm env use --global",
            false,
        ));

        let candidates = [
            (ids::PNPM, "latest"),
            (ids::APT, "nodejs"),
            (ids::PACMAN, "nodejs"),
            (ids::YAY, "nodejs"),
            (ids::PAMAC, "nodejs"),
            (ids::NPM, "node"),
        ];
        self.registry
            .install_first_available(&candidates, &CommandOptions::inherited(), true)
    }

    /// Manual pipeline: workspace, download, destination, extract,
    /// place, link.
    fn install_manual(&self, opts: &InstallOptions) -> Result<()> {
        let platform = Platform::current();

        prepare_workspace(&self.workspace_root)?;

        let url = self.download_url();
        let archive = self
            .workspace_root
            .join(format!("nodejs.{}", platform.archive_extension()));
        let strategy = download::select_strategy(&self.search_path);
        tracing::info!(%url, strategy = strategy.label(), "downloading runtime archive");
        download::fetch(strategy, &url, &archive)?;

        let destination = destination::choose_destination(&self.search_path, self.home.as_deref())?;
        tracing::info!(destination = %destination.display(), "selected destination directory");

        let base = self.dist_base_name();
        let tree = if platform == Platform::Windows {
            extract::unpack_zip(&archive, &self.workspace_root, &base)?
        } else {
            extract::unpack_tarball(&archive, &self.workspace_root, &base)?
        };

        let runtime_dir = destination.join(format!("node-{}", self.version));
        place_runtime(&tree, &runtime_dir)?;
        link_binaries(&runtime_dir, &destination, opts.force || opts.force_link)?;
        Ok(())
    }

    /// Windows-only secondary path: bootstrap pnpm, then provision the
    /// runtime through it. A PATH change from the bootstrap needs a new
    /// shell, reported as [`InstallStatus::RestartRequired`].
    fn bootstrap_windows_pnpm(&self, opts: &InstallOptions) -> Result<InstallStatus> {
        if opts.no_pnpm {
            return Err(Error::PackageManagerUnavailable {
                manager: ids::PNPM.to_string(),
                message:
                    "manual installation is unsupported on this platform and the pnpm bootstrap \
                     was disabled by --no-pnpm"
                        .to_string(),
            });
        }

        if self.search_path.find_executable(ids::PNPM, true).is_none() {
            if let Err(err) = shell::execute(PNPM_BOOTSTRAP_COMMAND, &CommandOptions::inherited()) {
                tracing::warn!(error = %err, "pnpm bootstrap script failed");
            }
            if self.search_path.find_executable(ids::PNPM, true).is_none() {
                return Ok(InstallStatus::RestartRequired);
            }
        }

        let result = shell::execute(PNPM_GLOBAL_NODE_COMMAND, &CommandOptions::inherited())?;
        if result.success {
            Ok(InstallStatus::Installed)
        } else {
            Err(Error::CommandFailed {
                command: PNPM_GLOBAL_NODE_COMMAND.to_string(),
                code: result.exit_code,
            })
        }
    }
}

/// Delete-if-exists then recreate a clean workspace directory.
///
/// A stale workspace from a previous failed run must never leak
/// artifacts into this one.
pub(crate) fn prepare_workspace(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|_| Error::EnvironmentWrite {
            path: dir.to_path_buf(),
        })?;
    }
    fs::create_dir_all(dir).map_err(|_| Error::EnvironmentWrite {
        path: dir.to_path_buf(),
    })
}

/// Move the extracted runtime tree into place, replacing any existing
/// directory of the same versioned name.
pub(crate) fn place_runtime(tree: &Path, runtime_dir: &Path) -> Result<()> {
    if runtime_dir.exists() {
        fs::remove_dir_all(runtime_dir)?;
    }
    if fs::rename(tree, runtime_dir).is_ok() {
        return Ok(());
    }
    // Workspace and destination may be on different filesystems.
    copy_dir_all(tree, runtime_dir)?;
    fs::remove_dir_all(tree)?;
    Ok(())
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_link(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::hard_link(target, link)
}

/// Link every file in the runtime's `bin/` directory into the
/// destination.
///
/// Entries already linking to the correct target are skipped, so a
/// second pass with no changes performs no mutations. A differing entry
/// is replaced only under `force`. On non-Windows, executable bits are
/// set on every linked name regardless of whether the link was fresh.
pub(crate) fn link_binaries(runtime_dir: &Path, destination: &Path, force: bool) -> Result<()> {
    let bin_dir = runtime_dir.join("bin");
    for entry in fs::read_dir(&bin_dir)? {
        let entry = entry?;
        let target = bin_dir.join(entry.file_name());
        let link_path = destination.join(entry.file_name());

        let mut link = true;
        if fs::symlink_metadata(&link_path).is_ok() {
            match fs::read_link(&link_path) {
                Ok(existing) if existing == target => link = false,
                _ if force => fs::remove_file(&link_path)?,
                _ => link = false,
            }
        }
        if link {
            make_link(&target, &link_path)?;
            tracing::debug!(link = %link_path.display(), target = %target.display(), "linked runtime binary");
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&link_path, fs::Permissions::from_mode(0o755))?;
        }
    }
    Ok(())
}
