//! Package cache refresh and version helpers

use crate::error::{InstallerError, Result};
use crate::logging;
use crate::probe::PackageManager;
use crate::status::StatusSink;

const UPDATE_CACHE: &str = "Update local cache of available packages";

/// Refresh the package index. Failures are reported and not retried.
pub fn update_package_cache(
    packages: &dyn PackageManager,
    sink: &mut dyn StatusSink,
) -> Result<()> {
    match packages.update_cache() {
        Ok(()) => {
            sink.tick(UPDATE_CACHE);
            logging::log_stage_outcome("package_cache", true);
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "Package cache update failed");
            let command = packages.cache_update_command();
            sink.cross(UPDATE_CACHE);
            sink.detail(&format!(
                "Error: Unable to update package cache. Please try \"{command}\""
            ));
            logging::log_stage_outcome("package_cache", false);
            Err(InstallerError::package_cache_update(command))
        }
    }
}

/// `Version : 5.4.16` from `yum info` / `dnf info` output
pub fn parse_info_version(info: &str) -> Option<String> {
    info.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("version") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Major component of a distribution package version.
///
/// Handles plain semver (`7.2.34`), short forms (`5.4`) and Debian epochs
/// (`1:7.0+49`).
pub fn major_version(version: &str) -> Option<u64> {
    let version = version.trim();
    if let Ok(parsed) = semver::Version::parse(version) {
        return Some(parsed.major);
    }

    let without_epoch = version
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(version);
    let digits: String = without_epoch
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
