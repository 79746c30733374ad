//! Command-line interface and dispatch.

use crate::error::{Error, Result};
use crate::installer::{
    InstallOptions, InstallStatus, Installer, VersionCheck, DEFAULT_NODE_VERSION,
};
use crate::shell::{is_elevated, Platform};
use clap::{Args, Parser, Subcommand};
use console::style;
use semver::Version;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

/// Delay before exiting after the restart-required notice, giving the
/// message time to be read in provisioning terminals.
const RESTART_NOTICE_DELAY_SECS: u64 = 5;

/// Nodestrap CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "nodestrap",
    version,
    about = "Bootstrap a compatible Node.js runtime on the host machine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress informational output
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether the system runtime satisfies the required version
    Check(CheckArgs),
    /// Install or update the runtime
    Install(InstallArgs),
}

/// Arguments for `nodestrap check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Required runtime version
    #[arg(
        long,
        value_name = "VERSION",
        env = "NODESTRAP_NODE_VERSION",
        default_value = DEFAULT_NODE_VERSION
    )]
    pub runtime_version: String,
}

/// Arguments for `nodestrap install`.
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Required runtime version
    #[arg(
        long,
        value_name = "VERSION",
        env = "NODESTRAP_NODE_VERSION",
        default_value = DEFAULT_NODE_VERSION
    )]
    pub runtime_version: String,

    /// Skip package managers and go straight to the manual path
    #[arg(long)]
    pub no_package_manager: bool,

    /// Allow the manual path on any platform and force relinking
    #[arg(long)]
    pub force: bool,

    /// Allow the manual path on unsupported platforms
    #[arg(long = "force-manual-node")]
    pub force_manual_node: bool,

    /// Replace destination entries that do not link to the installed runtime
    #[arg(long = "force-node-link")]
    pub force_node_link: bool,

    /// Skip the pnpm bootstrap on Windows
    #[arg(long = "no-pnpm")]
    pub no_pnpm: bool,
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Check(args) => run_check(args, cli.quiet),
        Commands::Install(args) => run_install(args, cli.quiet),
    }
}

/// Parse a user-supplied version, tolerating a leading `v`.
fn parse_required_version(raw: &str) -> Result<Version> {
    Version::parse(raw.trim_start_matches('v'))
        .map_err(|e| Error::Other(anyhow::anyhow!("invalid version '{raw}': {e}")))
}

fn run_check(args: &CheckArgs, quiet: bool) -> Result<ExitCode> {
    let required = parse_required_version(&args.runtime_version)?;
    let installer = Installer::new(required.clone());
    let detected = installer.system_version();

    match installer.check_version() {
        VersionCheck::UpToDate => {
            if !quiet {
                let detected = detected.map(|v| v.to_string()).unwrap_or_default();
                println!(
                    "{} node {} satisfies required {}",
                    style("ok").green(),
                    detected,
                    required
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        VersionCheck::Outdated => {
            if !quiet {
                let detected = detected.map(|v| v.to_string()).unwrap_or_default();
                println!(
                    "{} node {} is older than required {}",
                    style("outdated").yellow(),
                    detected,
                    required
                );
            }
            Ok(ExitCode::from(1))
        }
        VersionCheck::NotInstalled => {
            if !quiet {
                println!("{} node is not installed", style("missing").red());
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn run_install(args: &InstallArgs, quiet: bool) -> Result<ExitCode> {
    let required = parse_required_version(&args.runtime_version)?;
    let mut installer = Installer::new(required.clone());

    if installer.check_version() == VersionCheck::UpToDate && !args.force {
        if !quiet {
            println!(
                "{} node {} or newer is already installed",
                style("ok").green(),
                required
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let opts = InstallOptions {
        use_package_manager: !args.no_package_manager,
        force: args.force,
        force_manual: args.force_manual_node,
        force_link: args.force_node_link,
        no_pnpm: args.no_pnpm,
    };

    match installer.install(&opts) {
        Ok(InstallStatus::Installed) => {
            if !quiet {
                println!("{} node {} installed", style("ok").green(), required);
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(InstallStatus::RestartRequired) => {
            let target = if Platform::current() == Platform::Windows {
                "system"
            } else {
                "terminal"
            };
            println!("{}", style(format!("Please restart your {target}.")).blue());
            thread::sleep(Duration::from_secs(RESTART_NOTICE_DELAY_SECS));
            Ok(ExitCode::SUCCESS)
        }
        Ok(InstallStatus::NotInstalled) => {
            eprintln!("{} nothing was installed", style("error:").red().bold());
            Ok(ExitCode::from(1))
        }
        Err(err) => {
            if matches!(err, Error::EnvironmentWrite { .. }) && !is_elevated() {
                eprintln!("hint: re-running with elevated privileges usually resolves this");
            }
            Err(err)
        }
    }
}
