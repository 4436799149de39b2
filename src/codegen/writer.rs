//! Writes generated source, replacing any previous file in one step.

use crate::error::CodegenError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Create missing parent directories, then write `contents` to a uniquely
/// named staging file beside `dest` and persist it over `dest`.
pub fn write_output(dest: impl AsRef<Path>, contents: &str) -> Result<(), CodegenError> {
    let dest = dest.as_ref();
    let dir = match dest.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| CodegenError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;
            dir
        }
        None => Path::new("."),
    };

    let write_err = |source| CodegenError::Write {
        path: dest.display().to_string(),
        source,
    };
    // Dropping the staging file on any error below removes it.
    let mut staging = NamedTempFile::new_in(dir).map_err(write_err)?;
    staging.write_all(contents.as_bytes()).map_err(write_err)?;
    staging.persist(dest).map_err(|err| write_err(err.error))?;

    tracing::debug!(path = %dest.display(), bytes = contents.len(), "wrote generated output");
    Ok(())
}
