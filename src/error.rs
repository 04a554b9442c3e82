use colored::Colorize;
use std::fmt;

pub mod builder;

pub use builder::ErrorBuilder;

/// Every way the preflight pipeline can stop.
///
/// Each variant except `ConfigError` is a fatal abort of the install run
/// (exit code 1).
#[derive(Debug)]
pub enum InstallerError {
    UnsupportedEnvironment {
        reason: String,
        remediation: Option<String>,
    },
    SecurityPolicyBlocked {
        state: String,
    },
    UnknownArchitecture {
        raw_arch: String,
    },
    RepositoryEnableFailure {
        repository: String,
        message: String,
    },
    PackageCacheUpdate {
        command: String,
    },
    ArtifactInstall {
        artifact: String,
        message: String,
    },
    ProbeFailed {
        probe: String,
        message: String,
    },
    ConfigError {
        path: String,
        message: String,
    },
    IoError {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl InstallerError {
    pub fn unsupported_environment(
        reason: impl Into<String>,
        remediation: Option<String>,
    ) -> Self {
        Self::UnsupportedEnvironment {
            reason: reason.into(),
            remediation,
        }
    }

    pub fn security_policy_blocked(state: impl Into<String>) -> Self {
        Self::SecurityPolicyBlocked {
            state: state.into(),
        }
    }

    pub fn unknown_architecture(raw_arch: impl Into<String>) -> Self {
        Self::UnknownArchitecture {
            raw_arch: raw_arch.into(),
        }
    }

    pub fn repository_enable_failure(
        repository: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RepositoryEnableFailure {
            repository: repository.into(),
            message: message.into(),
        }
    }

    pub fn package_cache_update(command: impl Into<String>) -> Self {
        Self::PackageCacheUpdate {
            command: command.into(),
        }
    }

    pub fn artifact_install(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactInstall {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    pub fn probe_failed(probe: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProbeFailed {
            probe: probe.into(),
            message: message.into(),
        }
    }

    pub fn config_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io_error(
        operation: impl Into<String>,
        path: Option<String>,
        source: std::io::Error,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// Process exit status: 1 aborts the install, 2 is a usage/configuration problem
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigError { .. } => 2,
            _ => 1,
        }
    }

    /// Short machine-readable name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedEnvironment { .. } => "unsupported_environment",
            Self::SecurityPolicyBlocked { .. } => "security_policy_blocked",
            Self::UnknownArchitecture { .. } => "unknown_architecture",
            Self::RepositoryEnableFailure { .. } => "repository_enable_failure",
            Self::PackageCacheUpdate { .. } => "package_cache_update",
            Self::ArtifactInstall { .. } => "artifact_install",
            Self::ProbeFailed { .. } => "probe_failed",
            Self::ConfigError { .. } => "config_error",
            Self::IoError { .. } => "io_error",
            Self::Other(_) => "other",
        }
    }
}

impl fmt::Display for InstallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedEnvironment {
                reason,
                remediation,
            } => {
                writeln!(
                    f,
                    "{} Unsupported environment: {}",
                    "✗".red().bold(),
                    reason.yellow()
                )?;
                if let Some(hint) = remediation {
                    writeln!(f, "  {} {}", "→".blue(), hint)?;
                }
                Ok(())
            }
            Self::SecurityPolicyBlocked { state } => {
                writeln!(
                    f,
                    "{} SELinux is {}, the installer cannot continue",
                    "✗".red().bold(),
                    state.yellow()
                )?;
                writeln!(
                    f,
                    "  {} Set SELinux to permissive or disabled and re-run",
                    "→".blue()
                )?;
                Ok(())
            }
            Self::UnknownArchitecture { raw_arch } => {
                writeln!(
                    f,
                    "{} No FTL binary for architecture: {}",
                    "✗".red().bold(),
                    raw_arch.yellow()
                )?;
                Ok(())
            }
            Self::RepositoryEnableFailure {
                repository,
                message,
            } => {
                writeln!(
                    f,
                    "{} Failed to enable repository: {}",
                    "✗".red().bold(),
                    repository.yellow()
                )?;
                writeln!(f, "  {} {}", "→".blue(), message)?;
                Ok(())
            }
            Self::PackageCacheUpdate { command } => {
                writeln!(
                    f,
                    "{} Unable to update package cache",
                    "✗".red().bold()
                )?;
                writeln!(f, "  {} Please try: {}", "→".blue(), command.cyan())?;
                Ok(())
            }
            Self::ArtifactInstall { artifact, message } => {
                writeln!(
                    f,
                    "{} Failed to install artifact: {}",
                    "✗".red().bold(),
                    artifact.yellow()
                )?;
                writeln!(f, "  {} {}", "→".blue(), message)?;
                Ok(())
            }
            Self::ProbeFailed { probe, message } => {
                writeln!(
                    f,
                    "{} System probe failed: {}",
                    "✗".red().bold(),
                    probe.yellow()
                )?;
                writeln!(f, "  {} {}", "→".blue(), message)?;
                Ok(())
            }
            Self::ConfigError { path, message } => {
                writeln!(f, "{} Configuration error", "✗".red().bold())?;
                writeln!(f, "  {} Path: {}", "→".blue(), path.yellow())?;
                writeln!(f, "  {} Error: {}", "→".blue(), message)?;
                Ok(())
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                writeln!(f, "  {} Error: {}", "→".blue(), source)?;
                Ok(())
            }
            Self::Other(err) => write!(f, "{} {}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for InstallerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for InstallerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

impl From<dialoguer::Error> for InstallerError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Other(anyhow::anyhow!("Dialog error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;
