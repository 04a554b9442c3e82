use anyhow::{Context, Result};

use super::{command, PackageManager};
use crate::core::packages::parse_info_version;
use crate::logging;
use crate::profile::PackageManagerKind;

/// Front end used to drive RPM installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RpmFrontend {
    Dnf,
    Yum,
}

impl RpmFrontend {
    fn command(&self) -> &'static str {
        match self {
            RpmFrontend::Dnf => "dnf",
            RpmFrontend::Yum => "yum",
        }
    }
}

/// [`PackageManager`] that shells out to apt/dpkg or dnf/yum/rpm
#[derive(Debug, Clone)]
pub struct HostPackages {
    kind: PackageManagerKind,
    rpm_frontend: RpmFrontend,
}

impl HostPackages {
    pub fn new(kind: PackageManagerKind) -> Self {
        let rpm_frontend = if command::exists("dnf") {
            RpmFrontend::Dnf
        } else {
            RpmFrontend::Yum
        };
        Self { kind, rpm_frontend }
    }

    fn unsupported(&self) -> anyhow::Error {
        anyhow::anyhow!("No supported package manager available")
    }
}

impl PackageManager for HostPackages {
    fn cache_update_command(&self) -> String {
        match self.kind {
            PackageManagerKind::Apt => "apt-get update".to_string(),
            // yum and dnf refresh metadata on demand
            PackageManagerKind::Rpm => ":".to_string(),
            PackageManagerKind::None => String::new(),
        }
    }

    fn update_cache(&self) -> Result<()> {
        match self.kind {
            PackageManagerKind::Apt => command::run_checked("apt-get", &["update"]).map(|_| ()),
            PackageManagerKind::Rpm => Ok(()),
            PackageManagerKind::None => Err(self.unsupported()),
        }
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        match self.kind {
            PackageManagerKind::Apt => {
                let status =
                    command::capture("dpkg-query", &["-W", "-f=${Status}", package])?;
                Ok(status.is_some_and(|s| s.contains("ok installed")))
            }
            PackageManagerKind::Rpm => Ok(command::succeeds("rpm", &["-q", package])),
            PackageManagerKind::None => Err(self.unsupported()),
        }
    }

    fn installed_version(&self, package: &str) -> Result<Option<String>> {
        let version = match self.kind {
            PackageManagerKind::Apt => {
                command::capture("dpkg-query", &["-W", "-f=${Version}", package])?
            }
            PackageManagerKind::Rpm => {
                command::capture("rpm", &["-q", "--queryformat", "%{VERSION}", package])?
            }
            PackageManagerKind::None => return Err(self.unsupported()),
        };
        Ok(version.filter(|v| !v.is_empty()))
    }

    fn candidate_version(&self, package: &str) -> Result<Option<String>> {
        match self.kind {
            PackageManagerKind::Apt => {
                let policy = command::capture("apt-cache", &["policy", package])?;
                Ok(policy.and_then(|text| {
                    text.lines()
                        .find_map(|line| line.trim().strip_prefix("Candidate:"))
                        .map(|v| v.trim().to_string())
                        .filter(|v| v != "(none)")
                }))
            }
            PackageManagerKind::Rpm => {
                let info = command::capture(self.rpm_frontend.command(), &["info", package])?;
                Ok(info.as_deref().and_then(parse_info_version))
            }
            PackageManagerKind::None => Err(self.unsupported()),
        }
    }

    fn install(&self, packages: &[&str]) -> Result<()> {
        let (program, mut args): (&str, Vec<&str>) = match self.kind {
            PackageManagerKind::Apt => (
                "apt-get",
                vec!["-qq", "--no-install-recommends", "install", "-y"],
            ),
            PackageManagerKind::Rpm => (self.rpm_frontend.command(), vec!["install", "-y"]),
            PackageManagerKind::None => return Err(self.unsupported()),
        };
        args.extend_from_slice(packages);

        let result = command::run_checked(program, &args)
            .with_context(|| format!("Failed to install {}", packages.join(" ")));
        logging::log_package_action("install", &packages.join(" "), result.is_ok());
        result.map(|_| ())
    }

    fn enable_repository(&self, repository: &str) -> Result<()> {
        let result = match (self.kind, self.rpm_frontend) {
            (PackageManagerKind::Rpm, RpmFrontend::Yum) => {
                command::run_checked("yum-config-manager", &["--enable", repository])
            }
            (PackageManagerKind::Rpm, RpmFrontend::Dnf) => {
                command::run_checked("dnf", &["config-manager", "--set-enabled", repository])
            }
            _ => Err(anyhow::anyhow!(
                "Repository {repository} can only be enabled on RPM based systems"
            )),
        };
        logging::log_package_action("enable_repository", repository, result.is_ok());
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_update_command() {
        let apt = HostPackages::new(PackageManagerKind::Apt);
        assert_eq!(apt.cache_update_command(), "apt-get update");

        let rpm = HostPackages::new(PackageManagerKind::Rpm);
        assert_eq!(rpm.cache_update_command(), ":");
        assert!(rpm.update_cache().is_ok());
    }

    #[test]
    fn test_no_package_manager_refuses_work() {
        let none = HostPackages::new(PackageManagerKind::None);
        assert!(none.update_cache().is_err());
        assert!(none.is_installed("php").is_err());
        assert!(none.install(&["php"]).is_err());
    }

    #[test]
    fn test_enable_repository_requires_rpm() {
        let apt = HostPackages::new(PackageManagerKind::Apt);
        let err = apt.enable_repository("remi-php72").unwrap_err();
        assert!(err.to_string().contains("RPM"));
    }
}
