//! Version classification against a required runtime version.

use semver::Version;
use std::cmp::Ordering;

/// Result of comparing the detected system version to a required one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    /// Detected version is greater than or equal to the required one.
    UpToDate,
    /// A runtime is present but strictly older than required.
    Outdated,
    /// No runtime version could be detected.
    NotInstalled,
}

/// Classify a detected version against the required one.
///
/// Total over all inputs: an absent detected version is `NotInstalled`,
/// never an error. Ordering considers `major.minor.patch` only;
/// pre-release and build metadata are ignored.
pub fn check(detected: Option<&Version>, required: &Version) -> VersionCheck {
    match detected {
        None => VersionCheck::NotInstalled,
        Some(version) => {
            if cmp_release(version, required) == Ordering::Less {
                VersionCheck::Outdated
            } else {
                VersionCheck::UpToDate
            }
        }
    }
}

/// Compare release triples, ignoring pre-release and build metadata.
fn cmp_release(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch).cmp(&(b.major, b.minor, b.patch))
}

/// Parse the version a runtime reports on stdout (e.g. `v22.14.0\n`).
pub fn parse_reported(output: &str) -> Option<Version> {
    let token = output.split_whitespace().next()?;
    Version::parse(token.trim_start_matches('v')).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    #[test]
    fn absent_version_is_not_installed() {
        assert_eq!(check(None, &v("18.0.0")), VersionCheck::NotInstalled);
    }

    #[test]
    fn equal_version_is_up_to_date() {
        assert_eq!(
            check(Some(&v("18.0.0")), &v("18.0.0")),
            VersionCheck::UpToDate
        );
    }

    #[test]
    fn older_version_is_outdated() {
        assert_eq!(
            check(Some(&v("16.2.0")), &v("18.0.0")),
            VersionCheck::Outdated
        );
    }

    #[test]
    fn newer_version_is_up_to_date() {
        assert_eq!(
            check(Some(&v("20.1.0")), &v("18.0.0")),
            VersionCheck::UpToDate
        );
    }

    #[test]
    fn patch_difference_is_ordered() {
        assert_eq!(
            check(Some(&v("18.0.1")), &v("18.0.2")),
            VersionCheck::Outdated
        );
    }

    #[test]
    fn prerelease_metadata_is_ignored_for_ordering() {
        // 18.0.0-beta.1 < 18.0.0 in full semver ordering, but the release
        // triple is equal, so it counts as up to date here.
        assert_eq!(
            check(Some(&v("18.0.0-beta.1")), &v("18.0.0")),
            VersionCheck::UpToDate
        );
    }

    #[test]
    fn parse_reported_strips_v_prefix_and_whitespace() {
        assert_eq!(parse_reported("v22.14.0\n"), Some(v("22.14.0")));
        assert_eq!(parse_reported("18.2.1"), Some(v("18.2.1")));
    }

    #[test]
    fn parse_reported_rejects_garbage() {
        assert_eq!(parse_reported(""), None);
        assert_eq!(parse_reported("command not found"), None);
    }
}
