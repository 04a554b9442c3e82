//! The preflight pipeline.
//!
//! Stages run in a fixed order and any `Err` stops the run. Nothing is rolled
//! back; every stage is safe to run again.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::InstallerConfig;
use crate::core::ipv6::{candidates_from, select_ipv6_blocking, Ipv6Selection};
use crate::core::packages::update_package_cache;
use crate::core::repos::{apply_repositories, decide_repositories, RepositoryDecision};
use crate::core::{distro, selinux};
use crate::error::Result;
use crate::ftl::{self, ArtifactInstaller};
use crate::probe::{PackageManager, SystemProbe};
use crate::profile::{ArchitectureProfile, SystemProfile};
use crate::setup_vars::SetupVars;
use crate::status::StatusSink;

/// Everything a successful run decided
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub generated_at: DateTime<Utc>,
    pub profile: SystemProfile,
    pub repositories: Vec<RepositoryDecision>,
    pub architecture: ArchitectureProfile,
    pub ftl_artifact: Option<String>,
    pub ipv6: Ipv6Selection,
}

pub struct Preflight<'a> {
    config: &'a InstallerConfig,
    probe: &'a dyn SystemProbe,
    packages: &'a dyn PackageManager,
    artifacts: &'a dyn ArtifactInstaller,
}

impl<'a> Preflight<'a> {
    pub fn new(
        config: &'a InstallerConfig,
        probe: &'a dyn SystemProbe,
        packages: &'a dyn PackageManager,
        artifacts: &'a dyn ArtifactInstaller,
    ) -> Self {
        Self {
            config,
            probe,
            packages,
            artifacts,
        }
    }

    /// Run every stage in order
    pub fn run(&self, sink: &mut dyn StatusSink) -> Result<PreflightReport> {
        crate::logging::log_system_info();
        let start = std::time::Instant::now();

        let profile = SystemProfile::detect(self.probe)?;
        distro::classify_distribution(&profile, self.config.minimum_centos_version, sink)?;

        let repositories =
            decide_repositories(&profile, self.packages, self.probe, self.config, sink)?;
        apply_repositories(&repositories, &profile, self.packages, self.config, sink)?;

        selinux::check_selinux(&profile, sink)?;

        if self.config.update_package_cache {
            update_package_cache(self.packages, sink)?;
        }

        let (architecture, ftl_artifact) = self.check_architecture(true, sink)?;
        let ipv6 = self.select_ipv6(sink)?;

        crate::logging::log_performance("preflight", start.elapsed().as_millis() as u64);
        Ok(PreflightReport {
            generated_at: Utc::now(),
            profile,
            repositories,
            architecture,
            ftl_artifact,
            ipv6,
        })
    }

    /// Detect the system and run the distribution check alone
    pub fn check_distribution(&self, sink: &mut dyn StatusSink) -> Result<SystemProfile> {
        let profile = SystemProfile::detect(self.probe)?;
        distro::classify_distribution(&profile, self.config.minimum_centos_version, sink)?;
        Ok(profile)
    }

    pub fn check_selinux(&self, sink: &mut dyn StatusSink) -> Result<SystemProfile> {
        let profile = SystemProfile::detect(self.probe)?;
        selinux::check_selinux(&profile, sink)?;
        Ok(profile)
    }

    /// Resolve the architecture and, when `install` is set, fetch FTL for it
    pub fn check_architecture(
        &self,
        install: bool,
        sink: &mut dyn StatusSink,
    ) -> Result<(ArchitectureProfile, Option<String>)> {
        let architecture = ArchitectureProfile::detect(self.probe)?;
        let policy = self.config.unknown_architecture;

        let artifact = if install {
            ftl::detect_and_install(&architecture, self.artifacts, policy, sink)?
        } else {
            ftl::select_artifact(&architecture, policy, sink)?.map(str::to_string)
        };
        Ok((architecture, artifact))
    }

    pub fn select_ipv6(&self, sink: &mut dyn StatusSink) -> Result<Ipv6Selection> {
        let addresses = self.probe.ipv6_addresses().unwrap_or_else(|e| {
            tracing::debug!(error = %format!("{e:#}"), "IPv6 address listing unavailable");
            Vec::new()
        });
        let selection = select_ipv6_blocking(&candidates_from(&addresses), sink);
        tracing::debug!(?selection, "IPv6 selection");
        Ok(selection)
    }

    /// Record the IPv6 decision in the setup variables file
    pub fn write_setup_vars(&self, selection: &Ipv6Selection) -> Result<SetupVars> {
        let path = &self.config.setup_vars_path;
        let mut vars = SetupVars::load(path)?;
        vars.record_ipv6(selection.address());
        vars.save(path)?;
        Ok(vars)
    }
}
