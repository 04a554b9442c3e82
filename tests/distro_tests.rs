//! Distribution support decisions as seen through the whole pipeline

mod common;

use common::{packages_for, run_default, run_pipeline};
use pihole_preflight::config::InstallerConfig;
use pihole_preflight::test_utils::assertions::{assert_cross, assert_info, assert_never_mentions};
use pihole_preflight::test_utils::fixtures::{CENTOS6_RELEASE, DEBIAN_OS_RELEASE};
use pihole_preflight::test_utils::mocks::{FakeArtifacts, FakeProbe};
use pihole_preflight::InstallerError;

#[test]
fn test_centos_6_is_rejected_with_upgrade_hint() {
    let probe = FakeProbe::centos(6).with_release(CENTOS6_RELEASE);
    let run = run_default(&probe);

    let err = run.result.unwrap_err();
    assert!(matches!(err, InstallerError::UnsupportedEnvironment { .. }));
    assert_eq!(err.exit_code(), 1);
    assert_cross(&run.sink, "CentOS 6 is not supported.");
    assert!(run.sink.mentions("Please update to CentOS release 7 or later"));
    assert_never_mentions(&run.sink, &["EPEL", "FTL"]);
}

#[test]
fn test_centos_7_passes_and_enables_epel() {
    let probe = FakeProbe::centos(7);
    let run = run_default(&probe);

    assert!(run.result.is_ok(), "{}", run.sink.transcript());
    assert_never_mentions(&run.sink, &["not supported"]);
    assert_info(
        &run.sink,
        "Enabling EPEL package repository (https://fedoraproject.org/wiki/EPEL)",
    );
}

#[test]
fn test_minimum_version_is_configurable() {
    let config = InstallerConfig {
        minimum_centos_version: 8,
        ..InstallerConfig::default()
    };
    let probe = FakeProbe::centos(7);
    let run = run_pipeline(&config, &probe, &packages_for(&probe), &FakeArtifacts::new());

    assert!(run.result.is_err());
    assert_cross(&run.sink, "CentOS 7 is not supported.");
    assert!(run.sink.mentions("Please update to CentOS release 8 or later"));
}

#[test]
fn test_fedora_skips_centos_gate_and_epel() {
    let probe = FakeProbe::fedora(28);
    let run = run_default(&probe);

    let report = run.result.unwrap();
    assert!(report.repositories.is_empty());
    assert_never_mentions(&run.sink, &["CentOS", "EPEL", "Remi"]);
}

#[test]
fn test_debian_family_passes() {
    let probe = FakeProbe::debian(9).with_release(DEBIAN_OS_RELEASE);
    let run = run_default(&probe);

    let report = run.result.unwrap();
    assert_eq!(report.profile.distribution_name, "Debian GNU/Linux");
    assert_eq!(report.profile.distribution_version, 9);
}

#[test]
fn test_no_package_manager_is_unsupported() {
    let run = run_default(&FakeProbe::unsupported());

    let err = run.result.unwrap_err();
    assert_eq!(err.kind(), "unsupported_environment");
    assert_cross(&run.sink, "OS distribution not supported");
}
