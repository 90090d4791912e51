//! The in-memory playlist: an ordered list of absolute track paths.

use std::path::{Path, PathBuf};

/// Ordered sequence of track entries (music and jingles mixed).
///
/// Serialized as one path per line. Blank lines are ignored when parsing so a
/// trailing newline, or a hand-edited file, round-trips cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<PathBuf>,
}

impl Playlist {
    #[must_use]
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { entries }
    }

    /// Newline-terminated text form, one path per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_string_lossy());
            text.push('\n');
        }
        text
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Entry at `index` modulo the playlist length. `None` only when empty.
    #[must_use]
    pub fn cyclic(&self, index: usize) -> Option<&Path> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries[index % self.entries.len()].as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let playlist = Playlist::parse("/music/a.mp3\n\n/music/b.mp3\n");
        assert_eq!(
            playlist.entries(),
            &[PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.mp3")]
        );
    }

    #[test]
    fn test_render_one_path_per_line() {
        let playlist = Playlist::new(vec![
            PathBuf::from("/music/Funk/a.mp3"),
            PathBuf::from("/jingles/Saludos/id.mp3"),
        ]);
        assert_eq!(playlist.render(), "/music/Funk/a.mp3\n/jingles/Saludos/id.mp3\n");
        assert_eq!(Playlist::parse(&playlist.render()), playlist);
    }

    #[test]
    fn test_paths_with_spaces_survive() {
        let playlist = Playlist::parse("/music/Deep House Casual/track one.mp3\n");
        assert_eq!(
            playlist.cyclic(0),
            Some(Path::new("/music/Deep House Casual/track one.mp3"))
        );
    }

    #[test]
    fn test_cyclic_wraps_and_handles_empty() {
        let playlist = Playlist::parse("/a.mp3\n/b.mp3\n/c.mp3\n");
        assert_eq!(playlist.cyclic(4), Some(Path::new("/b.mp3")));
        assert_eq!(Playlist::default().cyclic(0), None);
    }
}
