//! Whole-file output.

use std::fs;
use std::path::Path;

use tracing::info;
use vesper_core::ContainerError;

/// Write `bytes` to `path` in one call, creating missing parent directories.
pub fn write_to_file(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), ContainerError> {
    let path = path.as_ref();
    let io_error = |source| ContainerError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, bytes).map_err(io_error)?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote container");
    Ok(())
}
