//! Whole-image file loading and storing.
//!
//! Images are read in full before any view is built over them, and written
//! back in full. Loading memory-maps the file read-only and copies it into
//! owned storage, since views need a mutable buffer.

pub mod error;

use crate::config::IoConfig;
use crate::io::error::{IoError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Reads the complete image at `path`.
///
/// # Errors
///
/// Returns `IoError::FileTooLarge` if the file exceeds `config.max_file_size`,
/// and passes any underlying I/O error through unchanged.
pub fn load_image<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();

    debug!(
        path = %path.display(),
        size = file_size,
        max_file_size = config.max_file_size,
        "Loading image"
    );

    if file_size > config.max_file_size {
        warn!(
            path = %path.display(),
            size = file_size,
            limit = config.max_file_size,
            "Image is too large"
        );
        return Err(IoError::FileTooLarge {
            limit: config.max_file_size,
            found: file_size,
        });
    }

    // memmap cannot map empty files.
    if file_size == 0 {
        return Ok(Vec::new());
    }

    // Safety: the map is read-only and copied out before the file is dropped.
    let map = unsafe { Mmap::map(&file)? };
    Ok(map.to_vec())
}

/// Writes `bytes` to `path` in one piece, replacing any existing file.
///
/// The image is written to a temporary file next to `path` and renamed over
/// it, so a failed write leaves the previous file intact.
pub fn store_image<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), size = bytes.len(), "Storing image");
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(std::io::Error::from)?;
    Ok(())
}
