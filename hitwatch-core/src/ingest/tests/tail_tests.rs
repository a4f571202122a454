use crate::ingest::{LineSink, LogTailer, TailOptions, follow_reader};
use pretty_assertions::assert_eq;
use std::fs::{File, OpenOptions};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::sync::watch;

#[derive(Default)]
struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl LineSink for CollectingSink {
    fn on_new_lines(&self, lines: &[String]) {
        self.lines.lock().unwrap().extend_from_slice(lines);
    }
}

fn options(from_start: bool) -> TailOptions {
    TailOptions {
        from_start,
        poll_interval: Duration::from_millis(10),
    }
}

fn append(path: &Path, text: &str) {
    let mut f = OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(text.as_bytes()).unwrap();
    f.flush().unwrap();
}

#[test]
fn starts_at_end_of_existing_file() {
    // Arrange
    let file = NamedTempFile::new().unwrap();
    append(file.path(), "old line\n");
    let mut tailer = LogTailer::open(file.path(), &options(false)).unwrap();

    // Act
    append(file.path(), "new line\n");
    let lines = tailer.poll().unwrap();

    // Assert
    assert_eq!(lines, vec!["new line".to_string()]);
}

#[test]
fn from_start_reads_existing_lines() {
    // Arrange
    let file = NamedTempFile::new().unwrap();
    append(file.path(), "one\ntwo\n");

    // Act
    let mut tailer = LogTailer::open(file.path(), &options(true)).unwrap();
    let lines = tailer.poll().unwrap();

    // Assert
    assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    assert!(tailer.poll().unwrap().is_empty());
}

#[test]
fn partial_line_is_held_until_complete() {
    // Arrange
    let file = NamedTempFile::new().unwrap();
    let mut tailer = LogTailer::open(file.path(), &options(false)).unwrap();

    // Act
    append(file.path(), "first half");
    let before = tailer.poll().unwrap();
    append(file.path(), " second half\nnext\n");
    let after = tailer.poll().unwrap();

    // Assert
    assert!(before.is_empty());
    assert_eq!(
        after,
        vec!["first half second half".to_string(), "next".to_string()]
    );
}

#[test]
fn blank_lines_are_skipped() {
    let file = NamedTempFile::new().unwrap();
    let mut tailer = LogTailer::open(file.path(), &options(false)).unwrap();

    append(file.path(), "a\n\n   \nb\n");

    assert_eq!(tailer.poll().unwrap(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn truncated_file_is_read_from_start() {
    // Arrange
    let file = NamedTempFile::new().unwrap();
    let mut tailer = LogTailer::open(file.path(), &options(false)).unwrap();
    append(file.path(), "a fairly long first line\n");
    tailer.poll().unwrap();

    // Act
    File::create(file.path()).unwrap();
    append(file.path(), "short\n");
    let lines = tailer.poll().unwrap();

    // Assert
    assert_eq!(lines, vec!["short".to_string()]);
}

#[test]
fn missing_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();

    let res = LogTailer::open(&dir.path().join("nope.log"), &options(false));

    assert!(res.is_err());
}

#[test]
fn run_delivers_lines_until_shutdown() {
    // Arrange
    let file = NamedTempFile::new().unwrap();
    let tailer = LogTailer::open(file.path(), &options(false)).unwrap();
    let sink = CollectingSink::default();
    let (tx, rx) = watch::channel(false);

    // Act
    std::thread::scope(|s| {
        let worker = s.spawn(|| tailer.run(&sink, rx));

        append(file.path(), "x\ny\n");
        for _ in 0..200 {
            if sink.lines.lock().unwrap().len() == 2 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        tx.send(true).unwrap();
        worker.join().unwrap().unwrap();
    });

    // Assert
    assert_eq!(
        *sink.lines.lock().unwrap(),
        vec!["x".to_string(), "y".to_string()]
    );
}

#[test]
fn follow_reader_delivers_each_line_once() {
    // Arrange
    let input = Cursor::new("a\n\nb\nc");
    let sink = CollectingSink::default();
    let (_tx, rx) = watch::channel(false);

    // Act
    follow_reader(input, &sink, rx).unwrap();

    // Assert
    assert_eq!(
        *sink.lines.lock().unwrap(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}
