//! FTL binary selection and installation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::PathBuf;

use crate::config::{InstallerConfig, UnknownArchitecturePolicy};
use crate::core::arch::detection_message;
use crate::error::InstallerError;
use crate::logging;
use crate::profile::ArchitectureProfile;
use crate::status::StatusSink;
use crate::utils::atomic_write;

const INSTALL_FTL: &str = "Downloading and Installing FTL";
const MAX_PREALLOCATION: u64 = 64 << 20;

/// Fetches and installs a named FTL artifact
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactInstaller {
    fn install(&self, artifact: &str) -> Result<PathBuf>;
}

/// Announce the detected architecture and pick the FTL artifact for it.
///
/// Unknown architectures follow `policy`: abort, or skip with `Ok(None)`.
pub fn select_artifact(
    profile: &ArchitectureProfile,
    policy: UnknownArchitecturePolicy,
    sink: &mut dyn StatusSink,
) -> crate::error::Result<Option<&'static str>> {
    sink.info("FTL Checks...");
    let message = detection_message(profile.resolved_variant(), profile.raw_arch());

    match profile.artifact_name() {
        Some(artifact) => {
            sink.tick(&message);
            Ok(Some(artifact))
        }
        None => {
            sink.info(&message);
            logging::log_stage_outcome("architecture", false);
            match policy {
                UnknownArchitecturePolicy::Abort => {
                    Err(InstallerError::unknown_architecture(profile.raw_arch()))
                }
                UnknownArchitecturePolicy::Skip => Ok(None),
            }
        }
    }
}

/// Run the FTL stage: select the artifact, then download and install it.
///
/// Returns the installed artifact name, or `None` when the architecture is
/// unknown and the policy says to skip.
pub fn detect_and_install(
    profile: &ArchitectureProfile,
    installer: &dyn ArtifactInstaller,
    policy: UnknownArchitecturePolicy,
    sink: &mut dyn StatusSink,
) -> crate::error::Result<Option<String>> {
    let Some(artifact) = select_artifact(profile, policy, sink)? else {
        return Ok(None);
    };

    match installer.install(artifact) {
        Ok(path) => {
            sink.tick(INSTALL_FTL);
            tracing::info!(artifact, path = %path.display(), "FTL installed");
            logging::log_stage_outcome("ftl", true);
            Ok(Some(artifact.to_string()))
        }
        Err(err) => {
            sink.cross(INSTALL_FTL);
            logging::log_stage_outcome("ftl", false);
            Err(InstallerError::artifact_install(artifact, format!("{err:#}")))
        }
    }
}

/// Downloads FTL release artifacts over HTTPS
pub struct FtlDownloader {
    config: InstallerConfig,
    client: Client,
}

impl FtlDownloader {
    pub fn new(config: &InstallerConfig) -> Self {
        Self {
            config: config.clone(),
            client: Client::new(),
        }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "pihole-preflight")
            .send()
            .with_context(|| format!("Failed to start download of {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed with status: {}", response.status());
        }

        let total_size = response.content_length().unwrap_or(0);
        let pb = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }

        let mut content = Vec::with_capacity(preallocation(total_size));
        pb.wrap_read(response)
            .read_to_end(&mut content)
            .context("Failed to read response body")?;
        pb.finish_and_clear();

        Ok(content)
    }

    fn install_bytes(&self, contents: &[u8]) -> Result<PathBuf> {
        let target = &self.config.ftl.install_path;
        atomic_write::write_with_mode(target, contents, atomic_write::EXECUTABLE)
            .with_context(|| format!("Failed to install FTL to {}", target.display()))?;
        Ok(target.clone())
    }
}

/// Buffer size to reserve up front; Content-Length is only a hint
fn preallocation(content_length: u64) -> usize {
    usize::try_from(content_length.min(MAX_PREALLOCATION)).unwrap_or(0)
}

pub fn verify_checksum(contents: &[u8], expected: &str) -> Result<()> {
    let actual = hex::encode(Sha256::digest(contents));
    if !actual.eq_ignore_ascii_case(expected) {
        anyhow::bail!("Checksum mismatch: expected {expected}, got {actual}");
    }
    Ok(())
}

impl ArtifactInstaller for FtlDownloader {
    fn install(&self, artifact: &str) -> Result<PathBuf> {
        let url = self
            .config
            .ftl_download_url(artifact)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        let start = std::time::Instant::now();

        let contents = self.download(url.as_str())?;
        if let Some(expected) = &self.config.ftl.expected_sha256 {
            verify_checksum(&contents, expected)?;
        }
        let path = self.install_bytes(&contents)?;

        logging::log_performance("ftl_download", start.elapsed().as_millis() as u64);
        Ok(path)
    }
}
