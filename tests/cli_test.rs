//! Integration tests for the pkgres binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_packages() -> TempDir {
    let temp = TempDir::new().unwrap();
    let packages = temp.path().join("packages");
    fs::create_dir_all(packages.join("foo/1.0")).unwrap();
    fs::create_dir_all(packages.join("foo/2.0")).unwrap();
    fs::write(
        packages.join("foo/1.0/package.yaml"),
        "name: foo\nversion: '1.0'\nrequires: [bar-2+]\n",
    )
    .unwrap();
    fs::write(
        packages.join("foo/2.0/package.yaml"),
        "name: foo\nversion: '2.0'\n",
    )
    .unwrap();
    fs::write(
        packages.join("multi.yaml"),
        "name: multi\nversions:\n  - version: '1.0'\n    tools: [tweak]\n  - version: '1.1'\n    tools: [twerk]\n",
    )
    .unwrap();
    fs::create_dir_all(temp.path().join("dev")).unwrap();
    fs::write(temp.path().join("dev/package.yaml"), "name: devpkg\n").unwrap();
    temp
}

fn pkgres(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("pkgres"));
    cmd.env_remove("PKGRES_PACKAGES_PATH")
        .env_remove("RUST_LOG")
        .arg("--packages-path")
        .arg(temp.path().join("packages"));
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pkgres"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("handle"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pkgres"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn list_versioned_packages() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["list", "--key", "package.versioned"])
        .assert()
        .success()
        .stdout(predicate::str::contains("foo/1.0/package.yaml"))
        .stdout(predicate::str::contains("foo/2.0/package.yaml"))
        .stdout(predicate::str::contains("multi").not());
    Ok(())
}

#[test]
fn list_combined_entries() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["list", "--key", "package.combined", "--var", "name=multi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version=1.0"))
        .stdout(predicate::str::contains("version=1.1"));
    Ok(())
}

#[test]
fn list_without_matches_exits_with_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["list", "--key", "package.versionless"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn load_dev_package_by_filepath() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["load", "--key", "package.dev", "--filepath"])
        .arg(temp.path().join("dev/package.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("name: devpkg"));
    Ok(())
}

#[test]
fn load_prints_yaml() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args([
            "load",
            "--key",
            "package.combined",
            "--var",
            "name=multi",
            "--var",
            "version=1.1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: multi"))
        .stdout(predicate::str::contains("twerk"))
        .stdout(predicate::str::contains("tweak").not());
    Ok(())
}

#[test]
fn load_by_filepath() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    let file = temp.path().join("packages/foo/1.0/package.yaml");
    pkgres(&temp)
        .arg("load")
        .arg("--filepath")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("bar-2+"));
    Ok(())
}

#[test]
fn handle_prints_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .arg("handle")
        .args(["--key", "package.dev", "--search-path"])
        .arg(temp.path().join("dev"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\":\"package.dev\""))
        .stdout(predicate::str::contains("\"ext\":\"yaml\""));
    Ok(())
}

#[test]
fn ambiguous_load_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["load", "--key", "package.versioned"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ambiguous"));
    Ok(())
}

#[test]
fn dev_package_without_search_path_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["list", "--key", "package.dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a search path"));
    Ok(())
}

#[test]
fn unknown_key_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    pkgres(&temp)
        .args(["list", "--key", "non_existent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource key"));
    Ok(())
}

#[test]
fn settings_file_supplies_packages_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    let settings = temp.path().join("settings.yml");
    fs::write(
        &settings,
        format!("packages_path:\n  - {}\n", temp.path().join("packages").display()),
    )?;

    let mut cmd = Command::new(cargo_bin("pkgres"));
    cmd.env_remove("PKGRES_PACKAGES_PATH")
        .arg("--config")
        .arg(&settings)
        .args(["list", "--key", "folder.name"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("folder.name"));
    Ok(())
}

#[test]
fn missing_settings_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    let mut cmd = Command::new(cargo_bin("pkgres"));
    cmd.env_remove("PKGRES_PACKAGES_PATH")
        .arg("--config")
        .arg(temp.path().join("nope.yml"))
        .arg("list");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load settings"));
    Ok(())
}

#[test]
fn packages_path_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_packages();
    let mut cmd = Command::new(cargo_bin("pkgres"));
    cmd.env("PKGRES_PACKAGES_PATH", temp.path().join("packages"))
        .args(["list", "--key", "package_family.combined"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("multi.yaml"));
    Ok(())
}
