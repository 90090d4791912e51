//! # Station
//!
//! One invocation of the playlist generator, end to end:
//!
//! 1. Take the state lock for the base directory
//! 2. Load the cursor; a missing cursor forces a fresh playlist
//! 3. Load the stored playlist, rebuilding it if it is missing or empty
//! 4. Advance: emit the next tracks, repairing stale entries and refreshing
//!    the rotation after a full lap
//! 5. Persist the new cursor
//!
//! Every recoverable condition is handled here; the host only ever sees
//! valid track paths or a failed process.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use log::{debug, error, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::fs;
use std::path::PathBuf;

use crate::advancer::{self, Rebuild};
use crate::builder;
use crate::config::Config;
use crate::lock::StateLock;
use crate::playlist::Playlist;
use crate::schedule;
use crate::store::{CursorStore, PlaylistStore};

/// Outcome of one [`Station::serve`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    /// Tracks to report, the one to play now first
    pub tracks: Vec<PathBuf>,
    /// Cursor value persisted for the next invocation
    pub position: usize,
    /// Playlists built and saved during this call
    pub rebuilds: usize,
}

/// The playlist generator bound to one configuration.
#[derive(Debug)]
pub struct Station<R: Rng = ThreadRng> {
    config: Config,
    playlists: PlaylistStore,
    cursor: CursorStore,
    rng: R,
}

impl Station<ThreadRng> {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> Station<R> {
    /// Station using an explicit random source (seeded in tests).
    pub fn with_rng(config: Config, rng: R) -> Self {
        let playlists = PlaylistStore::new(config.playlist_path());
        let cursor = CursorStore::new(config.position_path());
        Self {
            config,
            playlists,
            cursor,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build, persist and return a fresh playlist for time of day `now`.
    ///
    /// # Errors
    ///
    /// Fails if the selected directories cannot be scanned, hold no music,
    /// or the playlist cannot be written.
    pub fn rebuild(&mut self, now: NaiveTime) -> Result<Playlist> {
        self.build_and_save(now)
            .with_context(|| format!("Failed to rebuild {}", self.playlists.path().display()))
    }

    fn build_and_save(&mut self, now: NaiveTime) -> crate::error::Result<Playlist> {
        let dirs = schedule::select_directories(now, &self.config, &mut self.rng);
        let playlist = builder::build(
            &dirs,
            &self.config.extension,
            self.config.jingle_factor,
            &mut self.rng,
        )?;

        if let Err(e) = self.playlists.save(&playlist) {
            let args: Vec<String> = std::env::args().collect();
            error!(
                "Could not create or write playlist {}: {e}. Invocation: {:?}",
                self.playlists.path().display(),
                args
            );
            return Err(e);
        }
        Ok(playlist)
    }

    /// Serve the next `count` tracks and move the cursor on by one.
    ///
    /// # Errors
    ///
    /// Returns an error for unrecoverable filesystem failures: the base
    /// directory or lock cannot be created, a directory cannot be scanned,
    /// or state cannot be written.
    pub fn next_tracks(&mut self, count: usize, now: NaiveTime) -> Result<Vec<PathBuf>> {
        self.serve(count, now).map(|served| served.tracks)
    }

    /// Like [`Station::next_tracks`], also reporting the persisted cursor and
    /// how many playlists were built along the way.
    ///
    /// A `count` above `max_track_count` is replaced by
    /// `default_track_count`.
    ///
    /// # Errors
    ///
    /// Same as [`Station::next_tracks`].
    pub fn serve(&mut self, count: usize, now: NaiveTime) -> Result<Served> {
        let count = if count > self.config.max_track_count {
            warn!(
                "Requested {count} tracks, more than the limit of {}. Taking {} tracks by default.",
                self.config.max_track_count, self.config.default_track_count
            );
            self.config.default_track_count
        } else {
            count
        };

        let base = &self.config.base_directory;
        fs::create_dir_all(base)
            .with_context(|| format!("Failed to create base directory {}", base.display()))?;
        let _lock = StateLock::acquire(&self.config.lock_path())?;

        let cursor = self.cursor.load()?;
        debug!("Loaded cursor {cursor:?}");

        let stored = if cursor.is_missing() {
            info!("No position found, building a new playlist");
            None
        } else {
            self.playlists.load()?
        };
        let mut rebuilds = 0;
        // A freshly built playlist always starts from its first entry.
        let (playlist, position) = match stored {
            Some(playlist) => (playlist, cursor.next_index()),
            None => {
                rebuilds += 1;
                (self.rebuild(now)?, 0)
            }
        };

        let advance = advancer::advance(playlist, position, count, || self.build_and_save(now))
            .context("Failed to advance playlist")?;

        match advance.rebuilt {
            Some(Rebuild::StaleEntry) => info!("Playlist rebuilt after a missing track"),
            Some(Rebuild::Wraparound) => info!("Playlist rebuilt after a full rotation"),
            None => {}
        }
        if advance.rebuilt.is_some() {
            rebuilds += 1;
        }
        info!(
            "Serving position {} of {}",
            advance.position,
            advance.playlist.len()
        );

        self.cursor.save(advance.position)?;
        Ok(Served {
            tracks: advance.tracks,
            position: advance.position,
            rebuilds,
        })
    }
}
