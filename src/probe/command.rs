//! Process helpers shared by the host probe and package adapters

use anyhow::{Context, Result};
use std::process::Command;

use crate::logging;

/// Run a command and return trimmed stdout when it exits successfully
pub fn capture(command: &str, args: &[&str]) -> Result<Option<String>> {
    let output = Command::new(command)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {command}"))?;

    logging::log_probe(command, args, output.status.success());

    if !output.status.success() {
        return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Some(stdout.trim().to_string()))
}

/// Run a command, failing with its stderr when it exits non-zero
pub fn run_checked(command: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(command)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {command}"))?;

    logging::log_probe(command, args, output.status.success());

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "{} {} exited with {}: {}",
            command,
            args.join(" "),
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a command and report only whether it succeeded
pub fn succeeds(command: &str, args: &[&str]) -> bool {
    Command::new(command)
        .args(args)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Check if a command is on PATH
pub fn exists(command: &str) -> bool {
    which::which(command).is_ok()
}
