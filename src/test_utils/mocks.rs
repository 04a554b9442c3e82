//! Scriptable fakes for the host seams
//!
//! `FakeProbe` and `FakePackages` stand in for a real machine so the
//! decision engine can be driven end to end without touching the system.

use anyhow::{bail, Result};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::fixtures::X86_64_LDD;
use crate::ftl::ArtifactInstaller;
use crate::probe::{PackageManager, SystemProbe};
use crate::profile::PackageManagerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptAnswer {
    Yes,
    No,
    Broken,
}

/// A host whose every observation is set up front
#[derive(Debug, Clone)]
pub struct FakeProbe {
    package_manager: PackageManagerKind,
    release: Option<String>,
    selinux: Option<String>,
    raw_arch: String,
    ldd_output: Option<String>,
    ipv6: Option<Vec<String>>,
    answer: PromptAnswer,
    prompts: Cell<usize>,
}

impl FakeProbe {
    pub fn new(package_manager: PackageManagerKind) -> Self {
        Self {
            package_manager,
            release: None,
            selinux: None,
            raw_arch: "x86_64".to_string(),
            ldd_output: Some(X86_64_LDD.to_string()),
            ipv6: Some(Vec::new()),
            answer: PromptAnswer::No,
            prompts: Cell::new(0),
        }
    }

    pub fn centos(version: u32) -> Self {
        Self::new(PackageManagerKind::Rpm)
            .with_release(format!("CentOS Linux release {version}.6.1810 (Core)"))
    }

    pub fn fedora(version: u32) -> Self {
        Self::new(PackageManagerKind::Rpm)
            .with_release(format!("Fedora release {version} (Twenty Eight)"))
    }

    pub fn debian(version: u32) -> Self {
        Self::new(PackageManagerKind::Apt).with_release(format!(
            "PRETTY_NAME=\"Debian GNU/Linux {version}\"\nNAME=\"Debian GNU/Linux\"\nVERSION_ID=\"{version}\"\nID=debian\n"
        ))
    }

    /// No supported package manager at all
    pub fn unsupported() -> Self {
        Self::new(PackageManagerKind::None)
    }

    pub fn with_release(mut self, text: impl Into<String>) -> Self {
        self.release = Some(text.into());
        self
    }

    /// Create the SELinux config and make `getenforce` print `state`
    pub fn with_selinux(mut self, state: impl Into<String>) -> Self {
        self.selinux = Some(state.into());
        self
    }

    pub fn with_architecture(mut self, raw_arch: &str, ldd_output: &str) -> Self {
        self.raw_arch = raw_arch.to_string();
        self.ldd_output = Some(ldd_output.to_string());
        self
    }

    /// `ldd` cannot be run
    pub fn with_failing_linker(mut self) -> Self {
        self.ldd_output = None;
        self
    }

    pub fn with_ipv6<S: AsRef<str>>(mut self, addresses: &[S]) -> Self {
        self.ipv6 = Some(addresses.iter().map(|a| a.as_ref().to_string()).collect());
        self
    }

    /// `ip` is missing
    pub fn with_failing_ipv6(mut self) -> Self {
        self.ipv6 = None;
        self
    }

    pub fn answering(mut self, yes: bool) -> Self {
        self.answer = if yes { PromptAnswer::Yes } else { PromptAnswer::No };
        self
    }

    /// Prompts fail as if no terminal were attached
    pub fn with_broken_prompt(mut self) -> Self {
        self.answer = PromptAnswer::Broken;
        self
    }

    pub fn prompts_shown(&self) -> usize {
        self.prompts.get()
    }
}

impl SystemProbe for FakeProbe {
    fn package_manager(&self) -> PackageManagerKind {
        self.package_manager
    }

    fn release_identifier(&self) -> Result<Option<String>> {
        Ok(self.release.clone())
    }

    fn selinux_config_present(&self) -> bool {
        self.selinux.is_some()
    }

    fn selinux_enforcement(&self) -> Result<String> {
        match &self.selinux {
            Some(state) => Ok(format!("{state}\n")),
            None => bail!("getenforce: command not found"),
        }
    }

    fn machine_architecture(&self) -> Result<String> {
        Ok(format!("{}\n", self.raw_arch))
    }

    fn linker_identity(&self) -> Result<String> {
        match &self.ldd_output {
            Some(output) => Ok(output.clone()),
            None => bail!("ldd: command not found"),
        }
    }

    fn ipv6_addresses(&self) -> Result<Vec<String>> {
        match &self.ipv6 {
            Some(addresses) => Ok(addresses.clone()),
            None => bail!("Failed to execute ip"),
        }
    }

    fn confirm(&self, _title: &str, _prompt: &str) -> Result<bool> {
        self.prompts.set(self.prompts.get() + 1);
        match self.answer {
            PromptAnswer::Yes => Ok(true),
            PromptAnswer::No => Ok(false),
            PromptAnswer::Broken => bail!("not a terminal"),
        }
    }
}

#[derive(Debug, Default)]
struct PackageState {
    installed: HashMap<String, String>,
    available: HashMap<String, String>,
    repository_upgrades: Vec<(String, String, String)>,
    enabled: HashSet<String>,
    failing: HashSet<String>,
    fail_cache_update: bool,
    cache_updates: usize,
}

/// An in-memory package database
#[derive(Debug)]
pub struct FakePackages {
    kind: PackageManagerKind,
    state: RefCell<PackageState>,
}

impl FakePackages {
    pub fn new(kind: PackageManagerKind) -> Self {
        Self {
            kind,
            state: RefCell::new(PackageState::default()),
        }
    }

    pub fn rpm() -> Self {
        Self::new(PackageManagerKind::Rpm)
    }

    pub fn apt() -> Self {
        Self::new(PackageManagerKind::Apt)
    }

    pub fn with_installed(self, package: &str, version: &str) -> Self {
        self.state
            .borrow_mut()
            .installed
            .insert(package.to_string(), version.to_string());
        self
    }

    pub fn with_available(self, package: &str, version: &str) -> Self {
        self.state
            .borrow_mut()
            .available
            .insert(package.to_string(), version.to_string());
        self
    }

    /// Enabling `repository` makes `package` available at `version`
    pub fn with_repository_upgrade(self, repository: &str, package: &str, version: &str) -> Self {
        self.state.borrow_mut().repository_upgrades.push((
            repository.to_string(),
            package.to_string(),
            version.to_string(),
        ));
        self
    }

    pub fn failing_install(self, package: &str) -> Self {
        self.state.borrow_mut().failing.insert(package.to_string());
        self
    }

    pub fn failing_cache_update(self) -> Self {
        self.state.borrow_mut().fail_cache_update = true;
        self
    }

    pub fn has_installed(&self, package: &str) -> bool {
        self.state.borrow().installed.contains_key(package)
    }

    pub fn is_enabled(&self, repository: &str) -> bool {
        self.state.borrow().enabled.contains(repository)
    }

    pub fn cache_updates(&self) -> usize {
        self.state.borrow().cache_updates
    }

    pub fn installed_packages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.borrow().installed.keys().cloned().collect();
        names.sort();
        names
    }
}

/// `https://host/path/remi-release-7.rpm` -> `remi-release`
fn package_name(source: &str) -> &str {
    let file = source.rsplit('/').next().unwrap_or(source);
    let Some(stem) = file.strip_suffix(".rpm") else {
        return file;
    };
    match stem.rsplit_once('-') {
        Some((name, version)) if version.chars().all(|c| c.is_ascii_digit()) => name,
        _ => stem,
    }
}

impl PackageManager for FakePackages {
    fn cache_update_command(&self) -> String {
        match self.kind {
            PackageManagerKind::Apt => "apt-get update".to_string(),
            _ => ":".to_string(),
        }
    }

    fn update_cache(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.cache_updates += 1;
        if state.fail_cache_update {
            bail!("Temporary failure resolving 'deb.debian.org'");
        }
        Ok(())
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self.has_installed(package))
    }

    fn installed_version(&self, package: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().installed.get(package).cloned())
    }

    fn candidate_version(&self, package: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().available.get(package).cloned())
    }

    fn install(&self, packages: &[&str]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let names: Vec<&str> = packages.iter().map(|p| package_name(p)).collect();

        if let Some(name) = names.iter().find(|n| state.failing.contains(**n)) {
            bail!("No package {name} available.");
        }

        for name in names {
            let version = state
                .available
                .get(name)
                .cloned()
                .unwrap_or_else(|| "1.0.0".to_string());
            state.installed.insert(name.to_string(), version);
        }
        Ok(())
    }

    fn enable_repository(&self, repository: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.enabled.insert(repository.to_string());

        let upgrades: Vec<(String, String)> = state
            .repository_upgrades
            .iter()
            .filter(|(repo, _, _)| repo == repository)
            .map(|(_, package, version)| (package.clone(), version.clone()))
            .collect();
        state.available.extend(upgrades);
        Ok(())
    }
}

/// Records requested artifacts instead of downloading them
#[derive(Debug, Default)]
pub struct FakeArtifacts {
    requested: RefCell<Vec<String>>,
    fail: bool,
}

impl FakeArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ArtifactInstaller for FakeArtifacts {
    fn install(&self, artifact: &str) -> Result<PathBuf> {
        self.requested.borrow_mut().push(artifact.to_string());
        if self.fail {
            bail!("Download failed with status: 404 Not Found");
        }
        Ok(PathBuf::from("/usr/bin/pihole-FTL"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_from_rpm_url() {
        assert_eq!(
            package_name("https://rpms.remirepo.net/enterprise/remi-release-7.rpm"),
            "remi-release"
        );
        assert_eq!(package_name("epel-release"), "epel-release");
        assert_eq!(package_name("local/foo.rpm"), "foo");
    }

    #[test]
    fn test_repository_upgrade_applies_on_enable() {
        let packages = FakePackages::rpm().with_repository_upgrade("remi-php72", "php-cli", "7.2.10");
        assert_eq!(packages.candidate_version("php-cli").unwrap(), None);

        packages.enable_repository("remi-php72").unwrap();
        packages.install(&["php-cli"]).unwrap();
        assert_eq!(
            packages.installed_version("php-cli").unwrap().as_deref(),
            Some("7.2.10")
        );
    }

    #[test]
    fn test_failed_install_changes_nothing() {
        let packages = FakePackages::rpm().failing_install("yum-utils");
        assert!(packages.install(&["epel-release", "yum-utils"]).is_err());
        assert!(packages.installed_packages().is_empty());
    }

    #[test]
    fn test_probe_counts_prompts() {
        let probe = FakeProbe::centos(7).answering(true);
        assert!(probe.confirm("t", "p").unwrap());
        assert!(FakeProbe::centos(7).with_broken_prompt().confirm("t", "p").is_err());
        assert_eq!(probe.prompts_shown(), 1);
    }
}
