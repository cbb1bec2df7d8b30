//! Append-only failure log.
//!
//! One line per recoverable failure, stamped with local time, e.g.
//! `Monday, 19 Oct 2026 09:15:02 PM +05:00: Found more than 1 movie for Heat`.
//! Writing never fails the caller; every entry is mirrored to `tracing`.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%A, %d %b %Y %I:%M:%S %p %:z";

#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    path: Option<PathBuf>,
}

impl DiagnosticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Log only through `tracing`.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::warn!("{message}");

        let Some(path) = &self.path else {
            return;
        };
        let line = format!("{}: {}\n", Local::now().format(TIMESTAMP_FORMAT), message);
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = written {
            tracing::error!(path = %path.display(), error = %e, "could not write diagnostic log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let log = DiagnosticLog::new(&path);

        log.log("first failure");
        log.log("second failure");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": first failure"));
        assert!(lines[1].ends_with(": second failure"));
        // Weekday prefix
        assert!(lines[0].split(", ").next().unwrap().ends_with("day"));
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("missing").join("log.txt"));
        log.log("dropped");
    }

    #[test]
    fn test_disabled_has_no_path() {
        let log = DiagnosticLog::disabled();
        assert!(log.path().is_none());
        log.log("only traced");
    }
}
