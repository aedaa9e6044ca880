use std::path::Path;

use anyhow::{Result, bail};

/// Error unless `path` is an existing regular file.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Error if `path` is stdout ("-"), a directory, or an existing file and `force` is off.
pub fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported.");
    }
    if path.is_dir() {
        bail!("Output path is a directory: {}", path.display());
    }
    if path.exists() && !force {
        bail!("Output file already exists (use --force to overwrite): {}", path.display());
    }
    Ok(())
}
