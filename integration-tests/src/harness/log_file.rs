use chrono::DateTime;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An access log inside its own temp directory.
pub struct LogFile {
    _dir: TempDir,
    path: PathBuf,
}

impl LogFile {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("access.log");
        File::create(&path).expect("failed to create log file");

        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append<S: AsRef<str>>(&self, lines: &[S]) {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .expect("failed to open log file");

        for line in lines {
            writeln!(f, "{}", line.as_ref()).expect("failed to write log line");
        }
        f.flush().expect("failed to flush log file");
    }

    pub fn truncate(&self) {
        File::create(&self.path).expect("failed to truncate log file");
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a Common Log Format line stamped at `ts` (Unix seconds, UTC).
pub fn clf_line(ts: i64, method: &str, path: &str, status: u16, bytes: &str) -> String {
    let time = DateTime::from_timestamp(ts, 0)
        .expect("timestamp in range")
        .format("%d/%b/%Y:%H:%M:%S %z");

    format!(r#"127.0.0.1 - james [{time}] "{method} {path} HTTP/1.0" {status} {bytes}"#)
}
