//! Package manager abstraction.
//!
//! A [`PackageManagerDescriptor`] records one package manager's command
//! templates and version-parsing rules; the [`PackageManagerRegistry`]
//! holds a catalog of descriptors and drives a uniform install/detect
//! protocol over them. Package managers are fungible providers of the
//! same capability (install X): callers express priority through an
//! ordered candidate list, while the descriptor table hides the
//! syntactic differences between managers.

pub mod descriptor;
pub mod registry;

pub use descriptor::{default_catalog, ids, semver_pattern, PackageManagerDescriptor};
pub use registry::{PackageManagerRegistry, PmInstallOutcome};
