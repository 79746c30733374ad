//! Package manager descriptors and the built-in catalog.

use regex::Regex;
use std::collections::HashMap;

/// Well-known ids for the built-in package managers.
///
/// Ids are open strings, not a closed enum: callers may register
/// additional managers under any id at runtime. These constants cover
/// the catalog shipped by [`default_catalog`].
pub mod ids {
    /// Arch official repositories.
    pub const PACMAN: &str = "pacman";
    /// Debian official repositories.
    pub const APT: &str = "apt";
    /// AUR helper.
    pub const YAY: &str = "yay";
    /// Node package manager.
    pub const PNPM: &str = "pnpm";
    /// Node package manager.
    pub const YARN: &str = "yarn";
    /// Node package manager.
    pub const NPM: &str = "npm";
    /// AUR helper.
    pub const PAMAC: &str = "pamac";
    /// Chocolatey.
    pub const CHOCO: &str = "choco";
}

/// Pattern extracting a `major.minor.patch` substring from version output.
pub const SEMVER_PATTERN: &str = r"(\d+\.\d+\.\d+)";

/// Compiled default version pattern.
pub fn semver_pattern() -> Regex {
    Regex::new(SEMVER_PATTERN).expect("built-in pattern compiles")
}

/// One package manager's command surface and parsing rules.
#[derive(Debug, Clone)]
pub struct PackageManagerDescriptor {
    /// Stable key, unique within a registry instance.
    pub id: String,
    /// Executable name looked up on the search path.
    pub display_name: String,
    /// Shell invocation producing version text.
    pub version_command: String,
    /// Install command prefix; the package name is appended.
    pub install_command: String,
    /// Whether install commands are wrapped with privilege escalation.
    pub requires_elevation: bool,
    /// Pattern whose first capture group extracts the version substring.
    pub version_pattern: Regex,
}

impl PackageManagerDescriptor {
    /// Create a descriptor with the default semver version pattern.
    ///
    /// The display name defaults to the id, which is also the executable
    /// name probed on the search path.
    pub fn new(
        id: &str,
        version_command: &str,
        install_command: &str,
        requires_elevation: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.to_string(),
            version_command: version_command.to_string(),
            install_command: install_command.to_string(),
            requires_elevation,
            version_pattern: semver_pattern(),
        }
    }

    /// Override the version-extraction pattern.
    pub fn with_version_pattern(mut self, pattern: Regex) -> Self {
        self.version_pattern = pattern;
        self
    }

    /// Override the executable name probed on the search path.
    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = name.to_string();
        self
    }
}

/// The immutable built-in catalog used to initialize registries.
///
/// Registries copy this table at construction; per-instance
/// [`register`](crate::pm::PackageManagerRegistry::register) calls overlay
/// it without affecting other instances.
pub fn default_catalog() -> HashMap<String, PackageManagerDescriptor> {
    let descriptors = [
        PackageManagerDescriptor::new(ids::PACMAN, "pacman -V", "pacman -S --noconfirm", true),
        PackageManagerDescriptor::new(ids::APT, "apt -v", "apt install -y", true),
        // Can require elevation when the package resolves to the AUR
        PackageManagerDescriptor::new(ids::YAY, "yay -V", "yay -S --noconfirm", false)
            .with_version_pattern(Regex::new(r"yay v(\d+\.\d+\.\d+)").expect("built-in pattern compiles")),
        PackageManagerDescriptor::new(ids::PNPM, "pnpm -v", "pnpm install -g", false),
        PackageManagerDescriptor::new(ids::YARN, "yarn -v", "yarn global add", false),
        PackageManagerDescriptor::new(ids::NPM, "npm -v", "npm install -g", false),
        PackageManagerDescriptor::new(ids::PAMAC, "pamac -V", "pamac install --no-confirm", false),
        PackageManagerDescriptor::new(ids::CHOCO, "choco -v", "choco install -y", true),
    ];

    descriptors
        .into_iter()
        .map(|descriptor| (descriptor.id.clone(), descriptor))
        .collect()
}
