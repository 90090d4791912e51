//! # Command-Line Interface Module
//!
//! The transcoder runs `shufflecast [COUNT]` once per playback request and
//! reads the upcoming track paths from stdout, one per line. `COUNT` is kept
//! as a raw string so that a malformed value degrades to the configured
//! default instead of aborting the invocation.
//!
//! ## Examples
//!
//! ```bash
//! shufflecast            # default number of tracks
//! shufflecast 5          # five upcoming tracks
//! shufflecast --config /srv/radio/shufflecast.json 1
//! ```

use clap::Parser;
use log::warn;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "shufflecast")]
#[command(about = "Shufflecast: persistent shuffled playlists with jingles for streaming transcoders")]
#[command(version)]
pub struct Args {
    /// Number of upcoming tracks to print
    ///
    /// Falls back to `default_track_count` from the config when missing,
    /// not a positive integer, or above `max_track_count`.
    #[arg(value_name = "COUNT", allow_hyphen_values = true)]
    pub count: Option<String>,

    /// JSON config file
    ///
    /// Defaults to `<config dir>/shufflecast/config.json` when that file
    /// exists, otherwise built-in defaults are used.
    #[arg(long, env = "SHUFFLECAST_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Number of tracks to print for the raw `COUNT` argument.
///
/// Counts above `max` are treated like malformed input.
///
/// # Examples
///
/// ```
/// use shufflecast::cli::resolve_track_count;
///
/// assert_eq!(resolve_track_count(Some("5"), 3, 100), 5);
/// assert_eq!(resolve_track_count(Some("five"), 3, 100), 3);
/// assert_eq!(resolve_track_count(Some("500"), 3, 100), 3);
/// assert_eq!(resolve_track_count(None, 3, 100), 3);
/// ```
#[must_use]
pub fn resolve_track_count(raw: Option<&str>, default: usize, max: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 && count <= max => count,
        _ => {
            warn!("Argument {raw:?} is not a valid number of tracks. Taking {default} tracks by default.");
            default
        }
    }
}
