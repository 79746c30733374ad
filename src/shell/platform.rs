//! Platform and architecture identification.
//!
//! Maps the compile-time target onto the names used by the Node.js
//! binary distribution (`linux`/`darwin`/`win`, `x64`/`arm64`/...) and
//! gates which platforms support the manual install path.

/// Platform for install-path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Human-readable platform name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Platform component of Node.js distribution file names.
    pub fn dist_name(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "darwin",
            Platform::Windows => "win",
        }
    }

    /// Archive extension used by the distribution for this platform.
    pub fn archive_extension(&self) -> &'static str {
        match self {
            Platform::Windows => "zip",
            _ => "tar.gz",
        }
    }

    /// Whether the manual download/extract/link path is supported
    /// without an explicit override flag.
    pub fn supports_manual_install(&self) -> bool {
        matches!(self, Platform::Linux | Platform::MacOS)
    }
}

/// Architecture component of Node.js distribution file names.
pub fn dist_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "arm" => "armv7l",
        "powerpc64" => "ppc64le",
        other => other,
    }
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}
