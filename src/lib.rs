//! Persistent shuffled playlists with jingles for streaming transcoders.
//!
//! Core modules:
//! - [`builder`] - Scan, shuffle and jingle interleaving
//! - [`advancer`] - Next-track emission, stale entry repair, wraparound
//! - [`store`] - Playlist and cursor files
//! - [`station`] - One invocation, end to end
//!
//! ### Supporting Modules
//!
//! - [`config`] - Startup configuration and state file layout
//! - [`schedule`] - Time-of-day directory rotation
//! - [`playlist`] - In-memory playlist type
//! - [`lock`] - Advisory lock around one invocation
//! - [`logging`] - Rotating log file behind `env_logger`
//! - [`cli`] - Command-line interface definitions
//! - [`error`] - Library error type
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use shufflecast::config::Config;
//! use shufflecast::station::Station;
//!
//! let config = Config::with_base_directory("/srv/radio".into());
//! let mut station = Station::new(config);
//!
//! for track in station.next_tracks(3, chrono::Local::now().time())? {
//!     println!("{}", track.display());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## State Machine
//!
//! Each call loads the cursor (index of the last served track), serves from
//! the following index, and stores the new index. The playlist is rebuilt
//! from a fresh shuffle when:
//!
//! - the cursor or playlist file is missing or corrupt
//! - the next track has been deleted from disk
//! - the last entry of the rotation has just been served
//!
//! A rebuild resets the cursor to 0.

pub mod advancer;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod playlist;
pub mod schedule;
pub mod station;
pub mod store;
