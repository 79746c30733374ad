//! Public API tests for the install pipeline building blocks.

use nodestrap::installer::destination::choose_destination;
use nodestrap::installer::Installer;
use nodestrap::path::SearchPath;
use nodestrap::pm::{PackageManagerDescriptor, PackageManagerRegistry, PmInstallOutcome};
use nodestrap::shell::CommandOptions;
use semver::Version;
use std::fs::{self, File};
use tempfile::TempDir;

#[test]
fn search_path_lookup_prefers_earliest_directory() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();
    File::create(first.join("tool")).unwrap();
    File::create(second.join("tool")).unwrap();

    let mut search = SearchPath::new("");
    search.add_path(&first);
    search.add_path(&second);

    assert_eq!(
        search.find_executable("tool", false),
        Some(first.join("tool"))
    );
}

#[test]
fn registry_attributes_install_to_the_manager_that_ran() {
    let temp = TempDir::new().unwrap();
    File::create(temp.path().join("only-pm")).unwrap();

    let mut search = SearchPath::new("");
    search.add_path(temp.path());

    let mut registry = PackageManagerRegistry::new().with_search_path(search);
    registry.register(PackageManagerDescriptor::new(
        "missing-pm",
        "echo 1.0.0",
        "echo install-via-missing",
        false,
    ));
    registry.register(PackageManagerDescriptor::new(
        "only-pm",
        "echo 1.0.0",
        "echo install-via-only",
        false,
    ));

    let outcome = registry
        .install_first_available(
            &[("missing-pm", "nodejs"), ("only-pm", "nodejs")],
            &CommandOptions::captured(),
            true,
        )
        .unwrap();

    match outcome {
        PmInstallOutcome::Installed { manager, output } => {
            assert_eq!(manager, "only-pm");
            assert!(output.stdout.contains("install-via-only nodejs"));
        }
        PmInstallOutcome::NoneSucceeded => panic!("expected install"),
    }
}

#[test]
fn destination_probe_skips_unwritable_and_leaves_no_artifacts() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let missing_bin = home.join("bin");
    let writable = temp.path().join("writable");
    fs::create_dir_all(&writable).unwrap();

    let mut search = SearchPath::new("");
    search.add_path(&missing_bin);
    search.add_path(&writable);

    let chosen = choose_destination(&search, Some(home.as_path())).unwrap();
    assert_eq!(chosen, writable);
    assert!(fs::read_dir(&writable).unwrap().next().is_none());
}

#[test]
fn download_url_follows_distribution_layout() {
    let installer = Installer::new(Version::parse("22.14.0").unwrap())
        .with_search_path(SearchPath::new(""))
        .with_base_url("https://mirror.example/dist");

    let url = installer.download_url();
    assert!(url.starts_with("https://mirror.example/dist/v22.14.0/node-v22.14.0-"));
    assert_eq!(installer.required_version().to_string(), "22.14.0");
}
