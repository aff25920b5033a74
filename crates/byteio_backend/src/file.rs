//! File-based backend.

use crate::backend::{Backend, Whence};
use crate::error::{BackendError, BackendResult};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A backend over an operating-system file.
///
/// Files are seekable and report their size directly, so a buffered
/// stream over a `FileBackend` never needs the forward-only replay path.
///
/// # Durability
///
/// - `write` hands bytes to the OS
/// - `close` calls `File::sync_all()` if the file was opened for writing
///
/// # Example
///
/// ```no_run
/// use byteio_backend::{Backend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::create(Path::new("out.bin")).unwrap();
/// backend.write(b"persistent data").unwrap();
/// backend.close().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: Option<PathBuf>,
    file: File,
    writable: bool,
}

impl FileBackend {
    /// Wraps an already opened file.
    #[must_use]
    pub fn from_file(file: File, writable: bool) -> Self {
        Self {
            path: None,
            file,
            writable,
        }
    }

    /// Opens an existing file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> BackendResult<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file,
            writable: false,
        })
    }

    /// Creates (or truncates) a file for writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> BackendResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file,
            writable: true,
        })
    }

    /// Returns the path the file was opened from, if known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Consumes the backend and returns the file.
    #[must_use]
    pub fn into_file(self) -> File {
        self.file
    }
}

impl Backend for FileBackend {
    fn read(&mut self, buf: &mut [u8]) -> BackendResult<usize> {
        Ok(self.file.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> BackendResult<usize> {
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> BackendResult<u64> {
        let pos = match whence {
            Whence::Start => SeekFrom::Start(
                u64::try_from(offset).map_err(|_| BackendError::InvalidSeek { offset })?,
            ),
            Whence::Current => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };
        Ok(self.file.seek(pos)?)
    }

    fn size(&mut self) -> BackendResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn close(&mut self) -> BackendResult<()> {
        if self.writable {
            self.file.flush()?;
            self.file.sync_all()?;
        }
        Ok(())
    }
}
