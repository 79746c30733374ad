//! Nodestrap - bootstraps a compatible Node.js runtime on the host machine.
//!
//! Nodestrap detects whether a required Node.js version is already present
//! and, if not, installs it through a native package manager or by
//! downloading and placing a platform-specific binary distribution. It is
//! built for unattended or semi-attended provisioning scripts that must
//! work across Linux, macOS, and Windows without assuming any particular
//! package manager exists.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Version classification and the install state machine
//! - [`path`] - Executable search path modeling and lookup
//! - [`pm`] - Package manager descriptors and the install registry
//! - [`shell`] - Shell command execution and platform identification
//!
//! # Example
//!
//! ```
//! use nodestrap::path::SearchPath;
//!
//! // Duplicate directories collapse to their first occurrence.
//! let mut search = SearchPath::new("");
//! search.set_path("/usr/local/bin:/usr/bin:/usr/local/bin");
//! assert_eq!(search.entries().len(), 2);
//! ```

pub mod cli;
pub mod error;
pub mod installer;
pub mod path;
pub mod pm;
pub mod shell;

pub use error::{Error, Result};
