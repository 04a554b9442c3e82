//! Extra package repositories for CentOS (EPEL and Remi's PHP builds).
//!
//! Deciding and applying are separate steps: [`decide_repositories`] only
//! reads package state and asks the operator, [`apply_repositories`] performs
//! the installs. Fedora and Debian-family systems never get a decision.

use serde::Serialize;

use crate::config::InstallerConfig;
use crate::core::packages::major_version;
use crate::error::{ErrorBuilder, InstallerError, Result};
use crate::logging;
use crate::probe::{PackageManager, SystemProbe};
use crate::profile::SystemProfile;
use crate::status::StatusSink;

pub const EPEL_PACKAGE: &str = "epel-release";
pub const REMI_PACKAGE: &str = "remi-release";
const YUM_UTILS_PACKAGE: &str = "yum-utils";
const PHP_PACKAGE: &str = "php";
const PHP_CLI_PACKAGE: &str = "php-cli";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Repository {
    Epel,
    Remi,
}

impl Repository {
    pub fn name(&self) -> &'static str {
        match self {
            Repository::Epel => "epel",
            Repository::Remi => "remi",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDecision {
    pub repository: Repository,
    pub should_enable: bool,
    pub user_confirmed: Option<bool>,
}

impl RepositoryDecision {
    pub fn repository_name(&self) -> &'static str {
        self.repository.name()
    }
}

fn query_failed(err: anyhow::Error) -> InstallerError {
    InstallerError::probe_failed("package query", format!("{err:#}"))
}

pub fn decide_repositories(
    profile: &SystemProfile,
    packages: &dyn PackageManager,
    probe: &dyn SystemProbe,
    config: &InstallerConfig,
    sink: &mut dyn StatusSink,
) -> Result<Vec<RepositoryDecision>> {
    if !profile.is_centos() {
        return Ok(Vec::new());
    }

    let epel_installed = packages.is_installed(EPEL_PACKAGE).map_err(query_failed)?;
    let mut decisions = vec![RepositoryDecision {
        repository: Repository::Epel,
        should_enable: !epel_installed,
        user_confirmed: None,
    }];

    if let Some(remi) = decide_remi(packages, probe, config, sink)? {
        decisions.push(remi);
    }

    tracing::debug!(?decisions, "Repository decisions");
    Ok(decisions)
}

fn decide_remi(
    packages: &dyn PackageManager,
    probe: &dyn SystemProbe,
    config: &InstallerConfig,
    sink: &mut dyn StatusSink,
) -> Result<Option<RepositoryDecision>> {
    if packages.is_installed(REMI_PACKAGE).map_err(query_failed)? {
        return Ok(None);
    }

    let current = match packages.installed_version(PHP_PACKAGE).map_err(query_failed)? {
        Some(version) => Some(version),
        None => packages.candidate_version(PHP_PACKAGE).map_err(query_failed)?,
    };
    let target = config.php_target_major;
    if current
        .as_deref()
        .and_then(major_version)
        .is_some_and(|major| major >= target)
    {
        return Ok(None);
    }

    let confirmed = config.assume_yes || ask_for_upgrade(probe, target);
    if !confirmed {
        sink.info(&format!(
            "User opt-out of PHP {target} upgrade on CentOS. Deprecated PHP may be in use."
        ));
    }

    Ok(Some(RepositoryDecision {
        repository: Repository::Remi,
        should_enable: confirmed,
        user_confirmed: Some(confirmed),
    }))
}

/// A prompt that cannot be shown counts as a refusal
fn ask_for_upgrade(probe: &dyn SystemProbe, target: u64) -> bool {
    let title = format!("PHP {target} Update (recommended)");
    let prompt = format!(
        "PHP {target}.x is recommended for both security and language features.\n\
         Would you like to install PHP{target} via Remi's RPM repository?\n\n\
         See: https://rpms.remirepo.net for more information"
    );

    match probe.confirm(&title, &prompt) {
        Ok(answer) => answer,
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "Confirmation unavailable, opting out");
            false
        }
    }
}

pub fn apply_repositories(
    decisions: &[RepositoryDecision],
    profile: &SystemProfile,
    packages: &dyn PackageManager,
    config: &InstallerConfig,
    sink: &mut dyn StatusSink,
) -> Result<()> {
    for decision in decisions.iter().filter(|d| d.should_enable) {
        let result = match decision.repository {
            Repository::Epel => enable_epel(packages, sink),
            Repository::Remi => enable_remi(profile, packages, config, sink),
        };
        logging::log_stage_outcome(decision.repository_name(), result.is_ok());
        result?;
    }
    Ok(())
}

fn enable_epel(packages: &dyn PackageManager, sink: &mut dyn StatusSink) -> Result<()> {
    sink.info("Enabling EPEL package repository (https://fedoraproject.org/wiki/EPEL)");
    packages.install(&[EPEL_PACKAGE]).map_err(|err| {
        sink.cross(&format!("Failed to install {EPEL_PACKAGE}"));
        ErrorBuilder::repository(Repository::Epel.name())
            .caused_by(&err)
            .build()
    })?;
    sink.tick(&format!("Installed {EPEL_PACKAGE}"));
    Ok(())
}

fn enable_remi(
    profile: &SystemProfile,
    packages: &dyn PackageManager,
    config: &InstallerConfig,
    sink: &mut dyn StatusSink,
) -> Result<()> {
    let target = config.php_target_major;
    let failure = |err: anyhow::Error| {
        ErrorBuilder::repository(Repository::Remi.name())
            .caused_by(&err)
            .build()
    };

    sink.info("Enabling Remi's RPM repository (https://rpms.remirepo.net)");
    let release_rpm = remi_release_url(profile.distribution_version);
    packages
        .install(&[release_rpm.as_str(), YUM_UTILS_PACKAGE])
        .map_err(failure)?;
    packages
        .enable_repository(&config.remi_repository)
        .map_err(failure)?;
    sink.tick(&format!(
        "Remi's RPM repository has been enabled for PHP{target}"
    ));

    let upgraded = upgrade_php(packages);

    match upgraded {
        Ok(Some(version)) if major_version(&version) == Some(target) => {
            sink.tick(&format!(
                "PHP{target} installed/updated via Remi's RPM repository"
            ));
            Ok(())
        }
        other => {
            sink.cross(&format!(
                "There was a problem updating to PHP{target} via Remi's RPM repository"
            ));
            let message = match other {
                Ok(Some(version)) => format!("Installed PHP is {version}, expected {target}.x"),
                Ok(None) => format!("{PHP_PACKAGE} is not installed"),
                Err(err) => format!("{err:#}"),
            };
            Err(ErrorBuilder::repository(Repository::Remi.name())
                .message(message)
                .build())
        }
    }
}

/// Install PHP from the enabled repository and report the version of the
/// package the decision was made on: `php` when present, else `php-cli`.
fn upgrade_php(packages: &dyn PackageManager) -> anyhow::Result<Option<String>> {
    let php_installed = packages.is_installed(PHP_PACKAGE)?;
    if php_installed {
        packages.install(&[PHP_PACKAGE, PHP_CLI_PACKAGE])?;
    } else {
        packages.install(&[PHP_CLI_PACKAGE])?;
    }

    match packages.installed_version(PHP_PACKAGE)? {
        Some(version) => Ok(Some(version)),
        None => packages.installed_version(PHP_CLI_PACKAGE),
    }
}

pub fn remi_release_url(rhel_major: u32) -> String {
    format!("https://rpms.remirepo.net/enterprise/remi-release-{rhel_major}.rpm")
}
