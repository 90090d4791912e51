//! # Playlist Builder
//!
//! Builds a fresh rotation from one music directory and one jingle
//! directory:
//!
//! 1. Collect the audio files of each directory (non-recursive, matched by
//!    case-sensitive suffix).
//! 2. Shuffle both lists independently.
//! 3. Walk the music list and splice a random jingle after every
//!    `jingle_factor` tracks.
//!
//! With `M` music files and factor `F > 0` the result holds exactly
//! `M / F` jingles, at music positions `F, 2F, 3F, ...`. Jingles are drawn
//! with replacement, so a short jingle list simply repeats.

use log::{info, warn};
use path_absolutize::Absolutize;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::playlist::Playlist;
use crate::schedule::DirectoryPair;

/// Audio files directly inside `dir` whose name ends with `extension`.
///
/// Entries are absolute paths, sorted so the scan itself is deterministic;
/// ordering is randomized later by the shuffle.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be listed.
pub fn scan_audio_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.absolutize().map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();

    for entry in fs::read_dir(&dir).map_err(|e| Error::io(&*dir, e))? {
        let entry = entry.map_err(|e| Error::io(&*dir, e))?;
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!("Skipping {}: file name is not valid UTF-8", path.display());
            continue;
        };
        if name.ends_with(extension) && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Interleave `jingles` into `music` after every `jingle_factor` tracks.
///
/// Pure apart from the random jingle draw. An empty jingle list or a zero
/// factor returns the music unchanged.
pub fn interleave_jingles<R: Rng + ?Sized>(
    music: Vec<PathBuf>,
    jingles: &[PathBuf],
    jingle_factor: usize,
    rng: &mut R,
) -> Vec<PathBuf> {
    if jingle_factor == 0 || jingles.is_empty() {
        return music;
    }

    let mut entries = Vec::with_capacity(music.len() + music.len() / jingle_factor);
    let mut countdown = jingle_factor;
    for track in music {
        entries.push(track);
        countdown -= 1;
        if countdown == 0 {
            if let Some(jingle) = jingles.choose(rng) {
                entries.push(jingle.clone());
            }
            countdown = jingle_factor;
        }
    }
    entries
}

fn scan_jingles(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    match scan_audio_files(dir, extension) {
        Ok(files) => Ok(files),
        Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            warn!("Jingle directory {} does not exist", dir.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Build a new shuffled, jingle-interleaved playlist in memory.
///
/// # Errors
///
/// Returns [`Error::Io`] if the music directory (or an existing jingle
/// directory) cannot be listed, and [`Error::NoAudioFiles`] if the music
/// directory holds no audio files.
pub fn build<R: Rng + ?Sized>(
    dirs: &DirectoryPair,
    extension: &str,
    jingle_factor: usize,
    rng: &mut R,
) -> Result<Playlist> {
    let mut music = scan_audio_files(&dirs.music, extension)?;
    if music.is_empty() {
        return Err(Error::NoAudioFiles {
            dir: dirs.music.clone(),
        });
    }

    let mut jingles = if jingle_factor > 0 {
        scan_jingles(&dirs.jingles, extension)?
    } else {
        Vec::new()
    };
    if jingle_factor > 0 && jingles.is_empty() {
        warn!(
            "No jingles in {}, building playlist without jingles",
            dirs.jingles.display()
        );
    }

    music.shuffle(rng);
    jingles.shuffle(rng);

    let music_count = music.len();
    let playlist = Playlist::new(interleave_jingles(music, &jingles, jingle_factor, rng));
    info!(
        "Built playlist: {} music tracks from {}, {} jingle slots from {}",
        music_count,
        dirs.music.display(),
        playlist.len() - music_count,
        dirs.jingles.display()
    );
    Ok(playlist)
}
