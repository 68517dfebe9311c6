//! Bounded, read-only file mapping.
//!
//! `MappedImage` is the only place the loader touches the filesystem. It
//! memory-maps the input once and hands the back-end a byte slice; everything
//! extracted from that slice is copied out before the image is dropped.

use crate::config::IOLimits;
use crate::error::{LoaderError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A read-only memory map of a candidate executable.
pub struct MappedImage {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    file_size: u64,
}

impl MappedImage {
    /// Opens and maps a file, enforcing `limits.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, limits: &IOLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoaderError::from_io(path, e))?;
        let metadata = file.metadata().map_err(|e| LoaderError::from_io(path, e))?;
        if metadata.is_dir() {
            return Err(LoaderError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "is a directory"),
            });
        }
        let file_size = metadata.len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = limits.max_file_size,
            "Mapping file"
        );

        if file_size > limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "File is too large"
            );
            return Err(LoaderError::FileTooLarge {
                path: path.to_path_buf(),
                limit: limits.max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: read-only map of a regular file; the map never outlives `self`.
            Some(unsafe { Mmap::map(&file) }.map_err(|e| LoaderError::from_io(path, e))?)
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            file_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the total size of the underlying file in bytes.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    pub fn is_empty(&self) -> bool {
        self.file_size == 0
    }

    /// The mapped file contents (empty for a zero-length file).
    pub fn data(&self) -> &[u8] {
        match &self.mmap {
            Some(m) => &m[..],
            None => &[],
        }
    }
}

impl std::fmt::Debug for MappedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedImage")
            .field("path", &self.path)
            .field("file_size", &self.file_size)
            .finish()
    }
}
