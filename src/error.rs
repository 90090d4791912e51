//! Error types shared by the playlist stores, the builder and the advancer.
//!
//! Library code returns [`Error`] so callers can tell recoverable conditions
//! apart; the binary wraps everything in `anyhow` with extra context.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The music directory chosen for a build holds no audio files.
    #[error("no audio files found in {}", dir.display())]
    NoAudioFiles { dir: PathBuf },

    /// An empty playlist reached the advancer.
    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
