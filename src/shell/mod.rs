//! Shell command execution and platform identification.

pub mod command;
pub mod platform;

pub use command::{execute, execute_quiet, CommandOptions, CommandResult};
pub use platform::{dist_arch, is_elevated, Platform};
