//! Environment profiles computed once per install run.

use serde::Serialize;
use std::fmt;

use crate::core::{arch, distro, selinux};
use crate::error::{InstallerError, Result};
use crate::probe::SystemProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Apt,
    Rpm,
    None,
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManagerKind::Apt => write!(f, "apt"),
            PackageManagerKind::Rpm => write!(f, "rpm"),
            PackageManagerKind::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelinuxState {
    Enforcing,
    Permissive,
    Disabled,
    NotDetected,
}

impl fmt::Display for SelinuxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelinuxState::Enforcing => write!(f, "Enforcing"),
            SelinuxState::Permissive => write!(f, "Permissive"),
            SelinuxState::Disabled => write!(f, "Disabled"),
            SelinuxState::NotDetected => write!(f, "Not detected"),
        }
    }
}

/// What the installer knows about the host operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemProfile {
    pub package_manager: PackageManagerKind,
    pub distribution_name: String,
    pub distribution_version: u32,
    pub selinux_state: SelinuxState,
}

impl SystemProfile {
    /// Probe the host once. The result is never updated afterwards.
    pub fn detect(probe: &dyn SystemProbe) -> Result<Self> {
        let package_manager = probe.package_manager();

        let (distribution_name, distribution_version) = match probe
            .release_identifier()
            .map_err(|e| InstallerError::probe_failed("release identifier", format!("{e:#}")))?
        {
            Some(text) => distro::parse_release_identifier(&text),
            None => (String::new(), 0),
        };

        let selinux_state = if probe.selinux_config_present() {
            let raw = probe
                .selinux_enforcement()
                .map_err(|e| InstallerError::probe_failed("getenforce", format!("{e:#}")))?;
            selinux::parse_enforcement(&raw)?
        } else {
            SelinuxState::NotDetected
        };

        let profile = Self {
            package_manager,
            distribution_name,
            distribution_version,
            selinux_state,
        };
        tracing::debug!(?profile, "System profile detected");
        Ok(profile)
    }

    pub fn is_centos(&self) -> bool {
        self.package_manager == PackageManagerKind::Rpm
            && self.distribution_name.to_lowercase().contains("centos")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryVariant {
    X86_64,
    Aarch64,
    ArmHfLow,
    ArmHfV7Plus,
    Unknown,
}

/// CPU architecture as reported by the host, plus the variant it resolves to.
///
/// Only [`ArchitectureProfile::resolve`] builds one, so the variant always
/// agrees with the two probe strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchitectureProfile {
    raw_arch: String,
    linker_identity: String,
    resolved_variant: BinaryVariant,
}

impl ArchitectureProfile {
    pub fn resolve(raw_arch: &str, linker_identity: &str) -> Self {
        let raw_arch = raw_arch.trim().to_string();
        let linker_identity = linker_identity.trim().to_string();
        let resolved_variant = arch::resolve_variant(&raw_arch, &linker_identity);
        Self {
            raw_arch,
            linker_identity,
            resolved_variant,
        }
    }

    pub fn detect(probe: &dyn SystemProbe) -> Result<Self> {
        let raw_arch = probe
            .machine_architecture()
            .map_err(|e| InstallerError::probe_failed("uname -m", format!("{e:#}")))?;
        // Only the ARM rows read the loader, so a failed ldd leaves the table to decide
        let linker = match probe.linker_identity() {
            Ok(ldd_output) => arch::parse_linker_identity(&ldd_output),
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "ldd probe failed");
                String::new()
            }
        };
        Ok(Self::resolve(&raw_arch, &linker))
    }

    pub fn raw_arch(&self) -> &str {
        &self.raw_arch
    }

    pub fn linker_identity(&self) -> &str {
        &self.linker_identity
    }

    pub fn resolved_variant(&self) -> BinaryVariant {
        self.resolved_variant
    }

    /// Binary artifact to download, `None` for unknown architectures
    pub fn artifact_name(&self) -> Option<&'static str> {
        arch::artifact_name(self.resolved_variant)
    }
}
