//! Injected access to the host system.
//!
//! The decision code never spawns processes or reads files itself; it asks a
//! [`SystemProbe`] or a [`PackageManager`]. The host implementations live in
//! [`host`] and [`packages`]; tests use the fakes in `test_utils::mocks`.

pub mod command;
pub mod host;
pub mod packages;

use anyhow::Result;

use crate::profile::PackageManagerKind;

pub use host::HostProbe;
pub use packages::HostPackages;

/// Read-only questions about the host
pub trait SystemProbe {
    /// Which family of package manager binaries is present
    fn package_manager(&self) -> PackageManagerKind;

    /// Raw release text (`/etc/redhat-release` line or `/etc/os-release`)
    fn release_identifier(&self) -> Result<Option<String>>;

    fn selinux_config_present(&self) -> bool;

    /// Output of `getenforce`
    fn selinux_enforcement(&self) -> Result<String>;

    /// Output of `uname -m`
    fn machine_architecture(&self) -> Result<String>;

    /// Output of `ldd /bin/ls`
    fn linker_identity(&self) -> Result<String>;

    /// Every IPv6 address configured on the host, without prefix length
    fn ipv6_addresses(&self) -> Result<Vec<String>>;

    /// Ask the operator a yes/no question. `Ok(false)` and `Err` both mean no.
    fn confirm(&self, title: &str, prompt: &str) -> Result<bool>;
}

/// Package operations used by the repository enabler and cache update
pub trait PackageManager {
    /// Shell command shown to the operator when the cache update fails
    fn cache_update_command(&self) -> String;

    fn update_cache(&self) -> Result<()>;

    fn is_installed(&self, package: &str) -> Result<bool>;

    fn installed_version(&self, package: &str) -> Result<Option<String>>;

    /// Version the configured repositories would install
    fn candidate_version(&self, package: &str) -> Result<Option<String>>;

    fn install(&self, packages: &[&str]) -> Result<()>;

    fn enable_repository(&self, repository: &str) -> Result<()>;
}
