//! Committing encoded payloads to disk

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};

/// Write `bytes` to `path` in one buffered pass
///
/// The payload is staged in a temporary file next to `path` and renamed
/// over it once flushed, so an existing export survives a failed write.
pub fn commit(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(io_error)?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        writer.write_all(bytes).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
    }

    // Dropping the staged file on error removes it
    staged.persist(path).map_err(|e| io_error(e.error))?;

    tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}
