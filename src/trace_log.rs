// src/trace_log.rs

//! Append-only plain text sink for offline traffic analysis.
//!
//! Each recorded transfer becomes one line, `"<integer seconds> <size in KiB>"`.
//! Failing to open or write the file is reported through `tracing` and otherwise
//! ignored, so a missing disk never stops the throttle.

// dependencies
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug)]
pub struct TrafficLog {
    path: PathBuf,
    // serializes appends coming from several throttles sharing one file
    lock: Mutex<()>,
}

impl TrafficLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event. Returns whether the line reached the file.
    pub fn append(&self, time: f64, size: u64) -> bool {
        let _guard = self.lock.lock();
        let mut file = match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "can't open traffic log");
                return false;
            }
        };
        if let Err(err) = writeln!(file, "{}", format_line(time, size)) {
            warn!(path = %self.path.display(), error = %err, "can't write traffic log");
            return false;
        }
        true
    }
}

pub(crate) fn format_line(time: f64, size: u64) -> String {
    format!("{} {}", time as i64, size / 1024)
}
