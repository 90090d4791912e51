//! # Diagnostic Logging
//!
//! Shufflecast runs as a short-lived child of the transcoder, whose stdout is
//! reserved for track paths. Diagnostics therefore go to a log file inside
//! the base directory, formatted as
//!
//! ```text
//! [24-05-01 21:14:03] shufflecast::station [INFO]: Serving position 12 of 48
//! ```
//!
//! The file is rotated by size: when the next record would push it past
//! `max_bytes`, `playlist.log` becomes `playlist.log.1`, `.1` becomes `.2`
//! and so on, keeping at most `max_files` backups.
//!
//! Verbosity follows `RUST_LOG` (default `info`):
//! - `RUST_LOG=debug shufflecast` - include cursor and lock details
//! - `RUST_LOG=shufflecast::builder=debug shufflecast` - module-specific logging

use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Builder, Env, Target, WriteStyle};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::LogConfig;

/// Append-only file writer with size-based rotation.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_files: usize,
    file: File,
    size: u64,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RotatingFile {
    /// Open `path` for appending, continuing from its current size.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            max_files,
            file,
            size,
        })
    }

    /// `<path>.<n>`
    #[must_use]
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_files == 0 {
            self.file = File::create(&self.path)?;
            self.size = 0;
            return Ok(());
        }

        match fs::remove_file(self.backup_path(self.max_files)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        for n in (1..self.max_files).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} [{}]: {}",
            Local::now().format("%y-%m-%d %H:%M:%S"),
            record.target(),
            record.level(),
            record.args()
        )
    });
    builder
}

/// Route all `log` output into the rotating file at `path`.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created, or if a
/// logger is already installed.
pub fn init(config: &LogConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let writer = RotatingFile::open(path, config.max_bytes, config.max_files)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    builder()
        .target(Target::Pipe(Box::new(writer)))
        .write_style(WriteStyle::Never)
        .try_init()
        .context("Logger already initialized")
}

/// Same format on stderr, for when the log file is unavailable.
pub fn init_stderr() {
    let _ = builder().target(Target::Stderr).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(n: usize) -> Vec<u8> {
        format!("[record {n:03}] 0123456789\n").into_bytes()
    }

    #[test]
    fn test_appends_below_cap() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("playlist.log");
        let mut log = RotatingFile::open(&path, 1024, 3).expect("open");

        log.write_all(&record(1)).expect("write");
        log.write_all(&record(2)).expect("write");
        log.flush().expect("flush");

        let content = fs::read_to_string(&path).expect("read");
        assert_eq!(content.lines().count(), 2);
        assert!(!log.backup_path(1).exists());
    }

    #[test]
    fn test_rotates_when_cap_would_be_exceeded() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("playlist.log");
        let line_len = record(0).len() as u64;
        let mut log = RotatingFile::open(&path, line_len * 2, 3).expect("open");

        for n in 0..3 {
            log.write_all(&record(n)).expect("write");
        }
        log.flush().expect("flush");

        let current = fs::read_to_string(&path).expect("read");
        let backup = fs::read_to_string(log.backup_path(1)).expect("read backup");
        assert_eq!(current, String::from_utf8(record(2)).unwrap());
        assert_eq!(backup.lines().count(), 2);
        assert!(backup.starts_with("[record 000]"));
    }

    #[test]
    fn test_keeps_at_most_max_files_backups() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("playlist.log");
        let line_len = record(0).len() as u64;
        let mut log = RotatingFile::open(&path, line_len, 2).expect("open");

        for n in 0..6 {
            log.write_all(&record(n)).expect("write");
        }
        log.flush().expect("flush");

        assert!(log.backup_path(1).exists());
        assert!(log.backup_path(2).exists());
        assert!(!log.backup_path(3).exists());
        // Newest backup holds the record before the current one.
        let newest = fs::read_to_string(log.backup_path(1)).expect("read");
        assert!(newest.starts_with("[record 004]"));
        let oldest = fs::read_to_string(log.backup_path(2)).expect("read");
        assert!(oldest.starts_with("[record 003]"));
    }

    #[test]
    fn test_zero_backups_truncates_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("playlist.log");
        let line_len = record(0).len() as u64;
        let mut log = RotatingFile::open(&path, line_len, 0).expect("open");

        for n in 0..3 {
            log.write_all(&record(n)).expect("write");
        }
        log.flush().expect("flush");

        assert_eq!(fs::read_to_string(&path).expect("read").lines().count(), 1);
        assert!(!log.backup_path(1).exists());
    }

    #[test]
    fn test_resumes_size_of_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("playlist.log");
        fs::write(&path, record(0)).expect("seed log");
        let line_len = record(0).len() as u64;

        let mut log = RotatingFile::open(&path, line_len, 1).expect("open");
        log.write_all(&record(1)).expect("write");
        log.flush().expect("flush");

        assert!(log.backup_path(1).exists());
    }
}
