//! Time-of-day directory rotation.
//!
//! The station plays a different mood depending on the hour. Each
//! [`ScheduleSlot`] maps a half-open interval of the day to a set of music
//! categories; [`select_directories`] picks one category at random from the
//! slot covering `now`, plus a jingle category. Time and randomness are both
//! passed in, so selection is a pure function of its arguments.

use chrono::NaiveTime;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// A named interval `[start, end)` of the day with its music categories.
///
/// When `start > end` the slot wraps past midnight. `start == end` covers the
/// whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub categories: Vec<String>,
}

impl ScheduleSlot {
    #[must_use]
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.start == self.end {
            true
        } else if self.start < self.end {
            self.start <= now && now < self.end
        } else {
            now >= self.start || now < self.end
        }
    }
}

/// Music and jingle directories chosen for one playlist build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    pub music: PathBuf,
    pub jingles: PathBuf,
}

fn on_the_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

fn slot(name: &str, start: u32, end: u32, categories: &[&str]) -> ScheduleSlot {
    ScheduleSlot {
        name: name.to_string(),
        start: on_the_hour(start),
        end: on_the_hour(end),
        categories: categories.iter().map(|c| (*c).to_string()).collect(),
    }
}

/// The stock rotation: four slots covering the whole day.
#[must_use]
pub fn default_schedule() -> Vec<ScheduleSlot> {
    let nights = ["Remix", "Funk", "Deep House", "Electronica", "Disco"];
    vec![
        slot("night", 22, 7, &nights),
        slot(
            "morning",
            7,
            12,
            &["Dance", "Funk", "Deep House Casual", "Indie Electro"],
        ),
        slot(
            "afternoon",
            12,
            17,
            &[
                "Deep House",
                "Indie Pop",
                "Dance Londinense",
                "Electro Swing",
                "Electronica",
            ],
        ),
        slot("evening", 17, 22, &nights),
    ]
}

/// First slot whose interval contains `now`.
#[must_use]
pub fn slot_for(schedule: &[ScheduleSlot], now: NaiveTime) -> Option<&ScheduleSlot> {
    schedule.iter().find(|slot| slot.contains(now))
}

fn pick_category<R: Rng + ?Sized>(root: &Path, categories: &[String], rng: &mut R) -> PathBuf {
    match categories.choose(rng) {
        Some(category) => root.join(category),
        None => root.to_path_buf(),
    }
}

/// Choose the music and jingle directories for a build happening at `now`.
///
/// Falls back to the bare music root when no slot covers `now` or the
/// covering slot lists no categories, and to the bare jingles root when no
/// jingle categories are configured.
pub fn select_directories<R: Rng + ?Sized>(
    now: NaiveTime,
    config: &Config,
    rng: &mut R,
) -> DirectoryPair {
    let music_root = config.music_root();
    let music = match slot_for(&config.schedule, now) {
        Some(slot) => {
            if slot.categories.is_empty() {
                warn!("Schedule slot '{}' has no categories, using {}", slot.name, music_root.display());
            }
            pick_category(&music_root, &slot.categories, rng)
        }
        None => {
            warn!(
                "No schedule slot covers {}, using {}",
                now.format("%H:%M"),
                music_root.display()
            );
            music_root
        }
    };
    let jingles = pick_category(&config.jingles_root(), &config.jingle_categories, rng);

    info!("The current music directory is: {}", music.display());
    info!("The current jingles directory is: {}", jingles.display());

    DirectoryPair { music, jingles }
}
