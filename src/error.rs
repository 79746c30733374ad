//! Error types for nodestrap operations.
//!
//! This module defines [`Error`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected conditions (runtime not installed, version undetectable,
//!   package manager absent) are values, not errors: `Option`,
//!   [`VersionCheck`](crate::installer::VersionCheck) and
//!   [`PmInstallOutcome`](crate::pm::PmInstallOutcome) variants.
//! - `Error` is reserved for fatal conditions that terminate the run.
//! - All errors name the offending path, command, or platform so the
//!   operator can self-diagnose.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nodestrap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A workspace or destination directory is not writable.
    #[error("Could not write to {path} - you may need to re-run with elevated privileges")]
    EnvironmentWrite { path: PathBuf },

    /// A download transport failed.
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Archive unpacking failed, or an expected extracted path is missing.
    #[error("Archive extraction failed: {message}")]
    Extraction { message: String },

    /// The manual install path was attempted on an unsupported platform.
    #[error("Manual installation is not supported on {platform} (pass --force-manual-node to override)")]
    UnsupportedPlatform { platform: String },

    /// A required package manager is absent with no fallback available.
    #[error("Package manager '{manager}' unavailable: {message}")]
    PackageManagerUnavailable { manager: String, message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for nodestrap operations.
pub type Result<T> = std::result::Result<T, Error>;
