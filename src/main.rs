//! # Shufflecast
//!
//! Playlist generator for a streaming transcoder. Each run prints the next
//! tracks of a persistent shuffled rotation to stdout, one absolute path per
//! line, and moves the rotation on by one track.
//!
//! ## Usage
//!
//! ```bash
//! # From the transcoder's playlist hook
//! shufflecast 3
//!
//! # Start a new rotation on the next run
//! rm ~/.local/share/shufflecast/position
//! ```

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use std::io::{self, Write};

use shufflecast::cli;
use shufflecast::config::Config;
use shufflecast::logging;
use shufflecast::station::Station;

/// Main entry point.
///
/// Diagnostics go to the rotating log file; stdout carries nothing but
/// track paths. Unrecoverable errors propagate out of `main`, giving a
/// non-zero exit status the host can react to.
fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = Config::load(args.config.as_deref())?;

    if let Err(e) = logging::init(&config.log, &config.log_path()) {
        logging::init_stderr();
        warn!("{e:#}; logging to stderr instead");
    }
    info!(
        "Invoked with count argument {:?}",
        args.count.as_deref().unwrap_or("<none>")
    );

    let count = cli::resolve_track_count(
        args.count.as_deref(),
        config.default_track_count,
        config.max_track_count,
    );
    let mut station = Station::new(config);
    let tracks = station
        .next_tracks(count, Local::now().time())
        .map_err(|e| {
            error!("{e:#}");
            e
        })?;

    let mut out = io::stdout().lock();
    for track in &tracks {
        writeln!(out, "{}", track.display())?;
    }
    out.flush()?;
    Ok(())
}
