#![allow(dead_code)]

use pihole_preflight::config::InstallerConfig;
use pihole_preflight::probe::SystemProbe;
use pihole_preflight::profile::PackageManagerKind;
use pihole_preflight::status::RecordingSink;
use pihole_preflight::test_utils::mocks::{FakeArtifacts, FakePackages, FakeProbe};
use pihole_preflight::{Preflight, PreflightReport, Result};

/// Outcome of a full run against fakes, plus everything it printed
pub struct PipelineRun {
    pub result: Result<PreflightReport>,
    pub sink: RecordingSink,
}

pub fn run_pipeline(
    config: &InstallerConfig,
    probe: &FakeProbe,
    packages: &FakePackages,
    artifacts: &FakeArtifacts,
) -> PipelineRun {
    let mut sink = RecordingSink::new();
    let result = Preflight::new(config, probe, packages, artifacts).run(&mut sink);
    PipelineRun { result, sink }
}

/// Packages matching the probe's package manager; RPM hosts ship PHP 5
pub fn packages_for(probe: &FakeProbe) -> FakePackages {
    match probe.package_manager() {
        PackageManagerKind::Rpm => FakePackages::rpm().with_available("php", "5.4.16"),
        kind => FakePackages::new(kind),
    }
}

/// Run with default settings and throwaway package and artifact fakes
pub fn run_default(probe: &FakeProbe) -> PipelineRun {
    run_pipeline(
        &InstallerConfig::default(),
        probe,
        &packages_for(probe),
        &FakeArtifacts::new(),
    )
}
