//! Atomic file replacement with explicit permissions.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Mode for files other users must be able to read (`setupVars.conf`)
pub const SHARED_READ: u32 = 0o644;
/// Mode for installed executables
pub const EXECUTABLE: u32 = 0o755;

/// Replace `path` with `contents`, creating parent directories as needed.
///
/// The data is written to a temporary file in the target directory and
/// renamed into place, so readers see either the old file or the new one.
pub fn write_with_mode(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let temp_file = NamedTempFile::new_in(parent).context("Failed to create temporary file")?;
    fs::write(temp_file.path(), contents).context("Failed to write to temporary file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(temp_file.path())?.permissions();
        perms.set_mode(mode);
        fs::set_permissions(temp_file.path(), perms).context("Failed to set file permissions")?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file to {}", path.display()))?;

    Ok(())
}
