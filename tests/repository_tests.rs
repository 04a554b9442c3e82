//! EPEL and Remi handling on CentOS

mod common;

use common::run_pipeline;
use pihole_preflight::config::InstallerConfig;
use pihole_preflight::core::repos::{Repository, EPEL_PACKAGE, REMI_PACKAGE};
use pihole_preflight::test_utils::assertions::{assert_cross, assert_info, assert_tick};
use pihole_preflight::test_utils::mocks::{FakeArtifacts, FakePackages, FakeProbe};
use pihole_preflight::InstallerError;

const OPT_OUT: &str = "User opt-out of PHP 7 upgrade on CentOS. Deprecated PHP may be in use.";

fn centos_packages() -> FakePackages {
    FakePackages::rpm()
        .with_available("php", "5.4.16")
        .with_repository_upgrade("remi-php72", "php-cli", "7.2.10")
}

#[test]
fn test_operator_declines_remi() {
    let probe = FakeProbe::centos(7).answering(false);
    let packages = centos_packages();
    let run = run_pipeline(
        &InstallerConfig::default(),
        &probe,
        &packages,
        &FakeArtifacts::new(),
    );

    let report = run.result.unwrap();
    assert_eq!(probe.prompts_shown(), 1);
    assert_info(&run.sink, OPT_OUT);
    assert_tick(&run.sink, "Installed epel-release");
    assert!(packages.has_installed(EPEL_PACKAGE));
    assert!(!packages.has_installed(REMI_PACKAGE));

    let remi = report
        .repositories
        .iter()
        .find(|d| d.repository == Repository::Remi)
        .unwrap();
    assert_eq!(remi.user_confirmed, Some(false));
}

#[test]
fn test_operator_accepts_remi() {
    let probe = FakeProbe::centos(7).answering(true);
    let packages = centos_packages();
    let run = run_pipeline(
        &InstallerConfig::default(),
        &probe,
        &packages,
        &FakeArtifacts::new(),
    );

    assert!(run.result.is_ok(), "{}", run.sink.transcript());
    assert!(!run.sink.mentions("opt-out"));
    assert_tick(&run.sink, "Remi's RPM repository has been enabled for PHP7");
    assert_tick(&run.sink, "PHP7 installed/updated via Remi's RPM repository");
    assert!(packages.is_enabled("remi-php72"));
}

#[test]
fn test_assume_yes_skips_prompt() {
    let config = InstallerConfig {
        assume_yes: true,
        ..InstallerConfig::default()
    };
    let probe = FakeProbe::centos(7).with_broken_prompt();
    let packages = centos_packages();
    let run = run_pipeline(&config, &probe, &packages, &FakeArtifacts::new());

    assert!(run.result.is_ok());
    assert_eq!(probe.prompts_shown(), 0);
    assert!(packages.has_installed(REMI_PACKAGE));
}

#[test]
fn test_repositories_already_present() {
    let probe = FakeProbe::centos(7).answering(true);
    let packages = centos_packages()
        .with_installed(EPEL_PACKAGE, "7-11")
        .with_installed(REMI_PACKAGE, "7.6-2");
    let run = run_pipeline(
        &InstallerConfig::default(),
        &probe,
        &packages,
        &FakeArtifacts::new(),
    );

    assert!(run.result.is_ok());
    assert_eq!(probe.prompts_shown(), 0);
    assert!(!run.sink.mentions("EPEL"));
    assert!(!run.sink.mentions("Remi"));
}

#[test]
fn test_failed_php_upgrade_aborts_before_selinux() {
    let probe = FakeProbe::centos(7).answering(true).with_selinux("Permissive");
    let packages = FakePackages::rpm().with_available("php", "5.4.16");
    let run = run_pipeline(
        &InstallerConfig::default(),
        &probe,
        &packages,
        &FakeArtifacts::new(),
    );

    let err = run.result.unwrap_err();
    assert!(matches!(err, InstallerError::RepositoryEnableFailure { .. }));
    assert_cross(
        &run.sink,
        "There was a problem updating to PHP7 via Remi's RPM repository",
    );
    assert!(!run.sink.mentions("SELinux"));
}
