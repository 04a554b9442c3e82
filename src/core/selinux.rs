//! SELinux posture check

use crate::error::{InstallerError, Result};
use crate::logging;
use crate::profile::{SelinuxState, SystemProfile};
use crate::status::StatusSink;

/// Enforcing SELinux stops the install; every other state continues.
pub fn check_selinux(profile: &SystemProfile, sink: &mut dyn StatusSink) -> Result<()> {
    let outcome = match profile.selinux_state {
        SelinuxState::NotDetected => {
            sink.info("SELinux not detected");
            Ok(())
        }
        SelinuxState::Enforcing => {
            sink.cross("Current SELinux: Enforcing");
            sink.cross("SELinux Enforcing detected, exiting installer");
            Err(InstallerError::security_policy_blocked("Enforcing"))
        }
        state @ (SelinuxState::Permissive | SelinuxState::Disabled) => {
            sink.tick(&format!("Current SELinux: {state}"));
            Ok(())
        }
    };

    logging::log_stage_outcome("selinux", outcome.is_ok());
    outcome
}

/// Interpret `getenforce` output
pub fn parse_enforcement(raw: &str) -> Result<SelinuxState> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "enforcing" => Ok(SelinuxState::Enforcing),
        "permissive" => Ok(SelinuxState::Permissive),
        "disabled" => Ok(SelinuxState::Disabled),
        other => Err(InstallerError::probe_failed(
            "getenforce",
            format!("Unrecognised SELinux state: {other:?}"),
        )),
    }
}
