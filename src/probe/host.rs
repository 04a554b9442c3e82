use anyhow::{Context, Result};
use dialoguer::Confirm;
use std::fs;
use std::path::{Path, PathBuf};

use super::{command, SystemProbe};
use crate::core::ipv6::extract_inet6_addresses;
use crate::profile::PackageManagerKind;

const REDHAT_RELEASE: &str = "etc/redhat-release";
const OS_RELEASE: &str = "etc/os-release";
const SELINUX_CONFIG: &str = "etc/selinux/config";

/// [`SystemProbe`] backed by the running machine.
///
/// Files are resolved below `root`, which is `/` outside of tests.
#[derive(Debug, Clone)]
pub struct HostProbe {
    root: PathBuf,
}

impl HostProbe {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn read_optional(path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for HostProbe {
    fn package_manager(&self) -> PackageManagerKind {
        if command::exists("apt-get") {
            PackageManagerKind::Apt
        } else if command::exists("rpm") {
            PackageManagerKind::Rpm
        } else {
            PackageManagerKind::None
        }
    }

    fn release_identifier(&self) -> Result<Option<String>> {
        if let Some(text) = Self::read_optional(&self.path(REDHAT_RELEASE))? {
            return Ok(Some(text.trim().to_string()));
        }
        Self::read_optional(&self.path(OS_RELEASE))
    }

    fn selinux_config_present(&self) -> bool {
        self.path(SELINUX_CONFIG).is_file()
    }

    fn selinux_enforcement(&self) -> Result<String> {
        command::run_checked("getenforce", &[])
    }

    fn machine_architecture(&self) -> Result<String> {
        command::run_checked("uname", &["-m"])
    }

    fn linker_identity(&self) -> Result<String> {
        command::run_checked("ldd", &["/bin/ls"])
    }

    fn ipv6_addresses(&self) -> Result<Vec<String>> {
        let listing = match command::capture("ip", &["-6", "address"]) {
            Ok(listing) => listing.unwrap_or_default(),
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "ip -6 address unavailable");
                String::new()
            }
        };
        Ok(extract_inet6_addresses(&listing))
    }

    fn confirm(&self, title: &str, prompt: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(format!("{title}\n{prompt}"))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        Ok(answer)
    }
}
