//! # Persistent State
//!
//! Two small text files carry the station across invocations:
//!
//! - **Playlist store** - the current rotation, one absolute path per line
//! - **Cursor store** - the index of the last served track, as decimal text
//!
//! A missing or unparsable file is not an error: it is how the station learns
//! that it has to build a fresh playlist. Only real I/O failures (permissions,
//! full disk) are surfaced.
//!
//! Both files are replaced through a temporary file in the same directory and
//! an atomic rename, so a reader never observes a half-written playlist.

use log::{debug, error, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::playlist::Playlist;

/// Replace `path` with `contents` via temp file + rename.
///
/// # Errors
///
/// Returns [`Error::Io`] if the temporary file cannot be created, written,
/// flushed, or renamed over `path`.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(contents).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Persisted playlist file.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored playlist.
    ///
    /// Returns `Ok(None)` when the file is absent, empty, or not UTF-8: each
    /// of those means the playlist has to be rebuilt.
    ///
    /// # Errors
    ///
    /// Any other read failure is returned as [`Error::Io`].
    pub fn load(&self) -> Result<Option<Playlist>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No playlist at {}", self.path.display());
                return Ok(None);
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Playlist {} is not valid UTF-8, discarding it", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let playlist = Playlist::parse(&text);
        if playlist.is_empty() {
            warn!("Playlist {} is empty, discarding it", self.path.display());
            return Ok(None);
        }
        Ok(Some(playlist))
    }

    /// Atomically replace the stored playlist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn save(&self, playlist: &Playlist) -> Result<()> {
        write_atomically(&self.path, playlist.render().as_bytes())
    }
}

/// Cursor state as found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// No position file, or one that does not hold an integer
    Missing,
    /// Index of the most recently emitted track
    LastServed(usize),
}

impl Cursor {
    /// Position the next invocation should start from.
    #[must_use]
    pub fn next_index(self) -> usize {
        match self {
            Cursor::Missing => 0,
            Cursor::LastServed(n) => n.saturating_add(1),
        }
    }

    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(self, Cursor::Missing)
    }

    #[must_use]
    pub fn last_served(self) -> Option<usize> {
        match self {
            Cursor::Missing => None,
            Cursor::LastServed(n) => Some(n),
        }
    }
}

/// Persisted position file.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored cursor.
    ///
    /// # Errors
    ///
    /// Absent or corrupt files yield [`Cursor::Missing`]; other read failures
    /// are returned as [`Error::Io`].
    pub fn load(&self) -> Result<Cursor> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Cursor::Missing),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Position file {} is not text", self.path.display());
                return Ok(Cursor::Missing);
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        match text.trim().parse::<usize>() {
            Ok(n) => Ok(Cursor::LastServed(n)),
            Err(_) => {
                warn!(
                    "Position file {} holds {:?}, not an index",
                    self.path.display(),
                    text.trim()
                );
                Ok(Cursor::Missing)
            }
        }
    }

    /// Overwrite the stored cursor with `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written; the failure is
    /// also logged.
    pub fn save(&self, position: usize) -> Result<()> {
        write_atomically(&self.path, position.to_string().as_bytes()).map_err(|e| {
            error!("Could not save position {position} to {}: {e}", self.path.display());
            e
        })
    }
}
