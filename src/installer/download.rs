//! Download strategies for fetching the runtime archive.
//!
//! Strategies form a prioritized list evaluated in order; the first one
//! applicable on the current search path is used. External tools are
//! preferred because they stream progress to the terminal natively; the
//! built-in HTTP client is the always-available last resort.

use crate::error::{Error, Result};
use crate::path::SearchPath;
use crate::shell::{self, CommandOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::Path;

/// One way of fetching a URL to a local file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStrategy {
    /// Shell out to `curl`.
    Curl,
    /// Shell out to `wget`.
    Wget,
    /// Built-in blocking HTTP client.
    Builtin,
}

/// Strategies in priority order.
pub const STRATEGIES: &[DownloadStrategy] = &[
    DownloadStrategy::Curl,
    DownloadStrategy::Wget,
    DownloadStrategy::Builtin,
];

impl DownloadStrategy {
    /// Strategy name for log output.
    pub fn label(&self) -> &'static str {
        match self {
            DownloadStrategy::Curl => "curl",
            DownloadStrategy::Wget => "wget",
            DownloadStrategy::Builtin => "builtin",
        }
    }

    fn is_available(&self, search: &SearchPath) -> bool {
        match self {
            DownloadStrategy::Curl => search.has_executable("curl"),
            DownloadStrategy::Wget => search.has_executable("wget"),
            DownloadStrategy::Builtin => true,
        }
    }

    /// Shell command for tool-based strategies, `None` for the built-in.
    pub(crate) fn command(&self, url: &str, dest: &Path) -> Option<String> {
        match self {
            DownloadStrategy::Curl => Some(format!("curl -o \"{}\" {}", dest.display(), url)),
            DownloadStrategy::Wget => Some(format!("wget -O \"{}\" {}", dest.display(), url)),
            DownloadStrategy::Builtin => None,
        }
    }
}

/// Pick the first applicable strategy for the given search path.
pub fn select_strategy(search: &SearchPath) -> DownloadStrategy {
    STRATEGIES
        .iter()
        .copied()
        .find(|strategy| strategy.is_available(search))
        .unwrap_or(DownloadStrategy::Builtin)
}

/// Fetch `url` into `dest` using the given strategy.
pub fn fetch(strategy: DownloadStrategy, url: &str, dest: &Path) -> Result<()> {
    match strategy.command(url, dest) {
        Some(command) => {
            let result = shell::execute(&command, &CommandOptions::inherited())?;
            if result.success {
                Ok(())
            } else {
                Err(Error::Download {
                    url: url.to_string(),
                    message: format!(
                        "{} exited with code {:?}",
                        strategy.label(),
                        result.exit_code
                    ),
                })
            }
        }
        None => http_download(url, dest),
    }
}

/// Built-in download via the blocking HTTP client, with a progress bar.
fn http_download(url: &str, dest: &Path) -> Result<()> {
    let download_err = |message: String| Error::Download {
        url: url.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("nodestrap/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| download_err(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| download_err(e.to_string()))?;
    if !response.status().is_success() {
        return Err(download_err(format!("HTTP {}", response.status())));
    }

    let bar = ProgressBar::new(response.content_length().unwrap_or(0));
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} ({eta})") {
        bar.set_style(style);
    }

    let mut reader = bar.wrap_read(response);
    let mut file = File::create(dest)?;
    std::io::copy(&mut reader, &mut file).map_err(|e| download_err(e.to_string()))?;
    bar.finish_and_clear();
    Ok(())
}
