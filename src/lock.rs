//! Advisory lock serializing invocations that share one base directory.
//!
//! The host may fire invocations back to back; without a lock two of them
//! could interleave their cursor and playlist writes. On Unix the lock is an
//! exclusive `flock(2)` on `<base>/lock`, held until the guard is dropped
//! (closing the descriptor releases it, even if the process dies). Elsewhere
//! the guard only holds the file open and sequential invocation is assumed.

use log::debug;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Held for the duration of one invocation.
#[derive(Debug)]
pub struct StateLock {
    _file: File,
    path: PathBuf,
}

impl StateLock {
    /// Open (creating if needed) the lock file and block until it is ours.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or locked.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        lock_exclusive(&file).map_err(|e| Error::io(path, e))?;
        debug!("Acquired state lock {}", path.display());

        Ok(Self {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn flock(file: &File, operation: libc::c_int) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    loop {
        // SAFETY: the descriptor is owned by `file` and stays open for the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), operation) };
        if rc == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    flock(file, libc::LOCK_EX)
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("lock");

        let lock = StateLock::acquire(&path).expect("acquire");
        assert!(path.exists());
        assert_eq!(lock.path(), path);
    }

    #[test]
    fn test_lock_can_be_reacquired_after_drop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("lock");

        drop(StateLock::acquire(&path).expect("first acquire"));
        assert!(StateLock::acquire(&path).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_holder_is_excluded() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("lock");
        let _held = StateLock::acquire(&path).expect("acquire");

        let other = File::open(&path).expect("open");
        let err = flock(&other, libc::LOCK_EX | libc::LOCK_NB).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = StateLock::acquire(&temp_dir.path().join("missing").join("lock"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
