//! Supported operating system check

use crate::error::{ErrorBuilder, Result};
use crate::logging;
use crate::profile::{PackageManagerKind, SystemProfile};
use crate::status::StatusSink;

/// Decide whether the installer can run on this distribution.
///
/// Supported systems produce no output; every rejection is reported with a
/// cross line before the error is returned.
pub fn classify_distribution(
    profile: &SystemProfile,
    minimum_centos_version: u32,
    sink: &mut dyn StatusSink,
) -> Result<()> {
    let outcome = match profile.package_manager {
        PackageManagerKind::None => {
            sink.cross("OS distribution not supported");
            Err(ErrorBuilder::unsupported("OS distribution not supported")
                .remediation("A distribution with apt-get or rpm is required")
                .build())
        }
        PackageManagerKind::Apt => Ok(()),
        PackageManagerKind::Rpm if profile.is_centos() => {
            check_centos_release(profile.distribution_version, minimum_centos_version, sink)
        }
        PackageManagerKind::Rpm => Ok(()),
    };

    logging::log_stage_outcome("distribution", outcome.is_ok());
    outcome
}

fn check_centos_release(version: u32, minimum: u32, sink: &mut dyn StatusSink) -> Result<()> {
    let remediation = format!("Please update to CentOS release {minimum} or later");

    if version == 0 {
        let reason = "Unable to determine the CentOS release version";
        sink.cross(reason);
        sink.detail(&remediation);
        return Err(ErrorBuilder::unsupported(reason)
            .remediation(remediation)
            .build());
    }

    if version < minimum {
        let reason = format!("CentOS {version} is not supported.");
        sink.cross(&reason);
        sink.detail(&remediation);
        return Err(ErrorBuilder::unsupported(&reason)
            .remediation(remediation)
            .build());
    }

    Ok(())
}

/// Extract `(distribution name, major version)` from release text.
///
/// Accepts a `redhat-release` line such as `CentOS Linux release 7.4.1708 (Core)`
/// or an `os-release` document. Unknown versions come back as 0.
pub fn parse_release_identifier(text: &str) -> (String, u32) {
    if text.lines().any(|line| line.contains('=')) {
        return parse_os_release(text);
    }

    let line = text.lines().next().unwrap_or("").trim();
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.iter().position(|w| w.eq_ignore_ascii_case("release")) {
        Some(idx) => {
            let name = words[..idx].join(" ");
            let version = words[idx + 1..]
                .iter()
                .find_map(|w| parse_major(w))
                .unwrap_or(0);
            (name, version)
        }
        None => {
            let version = words.iter().find_map(|w| parse_major(w)).unwrap_or(0);
            let name = words
                .iter()
                .take_while(|w| parse_major(w).is_none())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            (name, version)
        }
    }
}

fn parse_os_release(text: &str) -> (String, u32) {
    let mut name = String::new();
    let mut version = 0;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        match key.trim() {
            "NAME" => name = value.to_string(),
            "VERSION_ID" => version = parse_major(value).unwrap_or(0),
            _ => {}
        }
    }

    (name, version)
}

fn parse_major(token: &str) -> Option<u32> {
    let digits: String = token
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
