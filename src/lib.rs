//! Environment checks and decisions that run before a Pi-hole install.
//!
//! The host is only reached through the [`probe::SystemProbe`],
//! [`probe::PackageManager`] and [`ftl::ArtifactInstaller`] seams, so the
//! whole pipeline in [`install::Preflight`] can be driven by fakes.

pub mod config;
pub mod core;
pub mod error;
pub mod ftl;
pub mod install;
pub mod logging;
pub mod probe;
pub mod profile;
pub mod setup_vars;
pub mod status;
pub mod test_utils;
pub mod utils;

pub use config::InstallerConfig;
pub use error::{InstallerError, Result};
pub use install::{Preflight, PreflightReport};
