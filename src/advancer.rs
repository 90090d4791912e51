//! # Playback Advancer
//!
//! Turns a playlist and a position into the tracks the host should hear next.
//!
//! Per call:
//!
//! - **Integrity check**: the track at `position mod len` must still be a
//!   regular file. If it was removed, the playlist is rebuilt and emission
//!   starts at index 0 of the new list.
//! - **Emission**: `count` entries starting at `position mod len`, wrapping
//!   cyclically (a request longer than the playlist repeats entries).
//! - **Wraparound**: once the final entry of the rotation has been served,
//!   the playlist is rebuilt so the next call starts a fresh shuffle. The
//!   tracks emitted by this call still come from the old list.
//!
//! Rebuilding is delegated to the caller through a closure, which keeps this
//! module free of directory selection and persistence.

use log::{info, warn};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::playlist::Playlist;

/// Why a call rebuilt the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuild {
    /// The next track no longer exists on disk
    StaleEntry,
    /// The final entry of the rotation was served
    Wraparound,
}

/// Outcome of one [`advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Tracks to report, the one to play now first
    pub tracks: Vec<PathBuf>,
    /// Cursor value to persist
    pub position: usize,
    /// Playlist the next call should use
    pub playlist: Playlist,
    /// Set when this call replaced the playlist
    pub rebuilt: Option<Rebuild>,
}

fn ensure_not_empty(playlist: &Playlist) -> Result<()> {
    if playlist.is_empty() {
        return Err(Error::EmptyPlaylist);
    }
    Ok(())
}

/// Emit `count` tracks from `playlist` starting at `position`.
///
/// `rebuild` is called at most once: either before emission when the next
/// track is gone, or after emission when the rotation is complete.
///
/// # Errors
///
/// Returns [`Error::EmptyPlaylist`] if `playlist` (or a rebuilt one) is
/// empty, and propagates any error returned by `rebuild`.
///
/// # Examples
///
/// ```
/// use shufflecast::advancer::advance;
/// use shufflecast::playlist::Playlist;
///
/// let dir = tempfile::tempdir()?;
/// let paths: Vec<_> = ["a.mp3", "b.mp3", "c.mp3"]
///     .iter()
///     .map(|name| {
///         let path = dir.path().join(name);
///         std::fs::write(&path, b"").unwrap();
///         path
///     })
///     .collect();
/// let playlist = Playlist::new(paths.clone());
///
/// let next = advance(playlist, 0, 4, || unreachable!())?;
/// assert_eq!(next.tracks, vec![
///     paths[0].clone(), paths[1].clone(), paths[2].clone(), paths[0].clone(),
/// ]);
/// assert_eq!(next.position, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn advance<F>(
    mut playlist: Playlist,
    mut position: usize,
    count: usize,
    mut rebuild: F,
) -> Result<Advance>
where
    F: FnMut() -> Result<Playlist>,
{
    ensure_not_empty(&playlist)?;
    let mut rebuilt = None;

    let next_exists = playlist.cyclic(position).is_some_and(|path| path.is_file());
    if !next_exists {
        warn!(
            "Next track {:?} no longer exists, rebuilding playlist",
            playlist.cyclic(position)
        );
        playlist = rebuild()?;
        ensure_not_empty(&playlist)?;
        position = 0;
        rebuilt = Some(Rebuild::StaleEntry);
    }

    let len = playlist.len();
    let index = position % len;
    let tracks = (0..count)
        .map(|i| playlist.entries()[(index + i) % len].clone())
        .collect();

    if position > 0 && index == len - 1 {
        info!("Rotation of {len} tracks complete, rebuilding playlist");
        playlist = rebuild()?;
        ensure_not_empty(&playlist)?;
        return Ok(Advance {
            tracks,
            position: 0,
            playlist,
            rebuilt: Some(Rebuild::Wraparound),
        });
    }

    Ok(Advance {
        tracks,
        position: index,
        playlist,
        rebuilt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// `n` real files named `<prefix>N.mp3` inside `dir`.
    fn make_playlist(dir: &TempDir, prefix: &str, n: usize) -> Playlist {
        let entries = (0..n)
            .map(|i| {
                let path = dir.path().join(format!("{prefix}{i}.mp3"));
                fs::write(&path, b"ID3").expect("Failed to create track");
                path
            })
            .collect();
        Playlist::new(entries)
    }

    fn indices(playlist: &Playlist, tracks: &[PathBuf]) -> Vec<usize> {
        tracks
            .iter()
            .map(|t| playlist.entries().iter().position(|e| e == t).expect("known track"))
            .collect()
    }

    #[test]
    fn test_over_request_repeats_cyclically() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "t", 3);

        let next = advance(playlist.clone(), 0, 7, || panic!("no rebuild expected")).expect("advance");

        assert_eq!(indices(&playlist, &next.tracks), vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(next.position, 0);
        assert_eq!(next.rebuilt, None);
    }

    #[test]
    fn test_wraparound_emits_old_list_then_rebuilds() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "old", 5);
        let fresh = make_playlist(&dir, "new", 5);
        let calls = Cell::new(0);

        let next = advance(playlist.clone(), 4, 2, || {
            calls.set(calls.get() + 1);
            Ok(fresh.clone())
        })
        .expect("advance");

        assert_eq!(indices(&playlist, &next.tracks), vec![4, 0]);
        assert_eq!(calls.get(), 1);
        assert_eq!(next.rebuilt, Some(Rebuild::Wraparound));
        assert_eq!(next.position, 0);
        assert_eq!(next.playlist, fresh);
    }

    #[test]
    fn test_position_beyond_length_is_reduced() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "t", 5);

        let next = advance(playlist.clone(), 7, 1, || panic!("no rebuild expected")).expect("advance");

        assert_eq!(indices(&playlist, &next.tracks), vec![2]);
        assert_eq!(next.position, 2);
    }

    #[test]
    fn test_position_zero_never_wraps() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let single = make_playlist(&dir, "only", 1);

        let next = advance(single.clone(), 0, 3, || panic!("no rebuild expected")).expect("advance");

        assert_eq!(next.tracks.len(), 3);
        assert_eq!(next.position, 0);
        assert_eq!(next.rebuilt, None);
    }

    #[test]
    fn test_stale_entry_rebuilds_before_emission() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "old", 4);
        let fresh = make_playlist(&dir, "new", 3);
        fs::remove_file(&playlist.entries()[2]).expect("Failed to remove track");

        let next = advance(playlist, 2, 2, || Ok(fresh.clone())).expect("advance");

        assert_eq!(next.rebuilt, Some(Rebuild::StaleEntry));
        assert_eq!(indices(&fresh, &next.tracks), vec![0, 1]);
        assert_eq!(next.position, 0);
    }

    #[test]
    fn test_directory_in_place_of_track_counts_as_stale() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "old", 2);
        let fresh = make_playlist(&dir, "new", 2);
        fs::remove_file(&playlist.entries()[1]).expect("Failed to remove track");
        fs::create_dir(&playlist.entries()[1]).expect("Failed to create dir");

        let next = advance(playlist, 1, 1, || Ok(fresh.clone())).expect("advance");
        assert_eq!(next.rebuilt, Some(Rebuild::StaleEntry));
    }

    #[test]
    fn test_cycle_covers_every_entry_once() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "t", 6);
        let rebuilds = Cell::new(0);
        let mut served = Vec::new();
        let mut position = 0;

        for call in 1..=playlist.len() {
            let next = advance(playlist.clone(), position, 1, || {
                rebuilds.set(rebuilds.get() + 1);
                Ok(playlist.clone())
            })
            .expect("advance");
            served.extend(indices(&playlist, &next.tracks));

            let expected = usize::from(call == playlist.len());
            assert_eq!(rebuilds.get(), expected, "call {call}");
            position = next.position + 1;
        }

        assert_eq!(served, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_playlist_is_an_error() {
        let result = advance(Playlist::default(), 0, 1, || panic!("no rebuild expected"));
        assert!(matches!(result, Err(Error::EmptyPlaylist)));
    }

    #[test]
    fn test_rebuild_failure_propagates() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let playlist = make_playlist(&dir, "t", 2);
        fs::remove_file(&playlist.entries()[0]).expect("Failed to remove track");

        let result = advance(playlist, 0, 1, || {
            Err(Error::NoAudioFiles {
                dir: PathBuf::from("/music/Funk"),
            })
        });
        assert!(result.is_err());
    }
}
