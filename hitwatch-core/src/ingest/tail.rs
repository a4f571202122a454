use crate::ingest::LineSink;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
pub enum TailError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct TailOptions {
    /// Read what is already in the file instead of only new lines.
    pub from_start: bool,
    pub poll_interval: Duration,
}

/// Follows a growing log file and hands out each newly completed line once.
///
/// A trailing line without its newline is held back until it is finished.
/// If the file shrinks below the read position it is read again from the top.
pub struct LogTailer {
    path: PathBuf,
    reader: BufReader<File>,
    position: u64,
    partial: Vec<u8>,
    poll_interval: Duration,
}

impl LogTailer {
    pub fn open(path: &Path, options: &TailOptions) -> Result<Self, TailError> {
        let open_err = |source| TailError::Open {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(open_err)?;
        let position = if options.from_start {
            0
        } else {
            file.seek(SeekFrom::End(0)).map_err(open_err)?
        };

        tracing::debug!(path = %path.display(), position, "tailing log file");

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            position,
            partial: Vec::new(),
            poll_interval: options.poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every complete line appended since the last call.
    pub fn poll(&mut self) -> Result<Vec<String>, TailError> {
        let len = self
            .reader
            .get_ref()
            .metadata()
            .map_err(|e| self.read_err(e))?
            .len();

        if len < self.position {
            tracing::info!(path = %self.path.display(), "log file truncated; reading from start");
            self.reader
                .seek(SeekFrom::Start(0))
                .map_err(|e| self.read_err(e))?;
            self.position = 0;
            self.partial.clear();
        }

        let mut lines = Vec::new();
        loop {
            let n = self
                .reader
                .read_until(b'\n', &mut self.partial)
                .map_err(|e| TailError::Read {
                    path: self.path.clone(),
                    source: e,
                })?;
            if n == 0 {
                break;
            }
            self.position += n as u64;

            if self.partial.last() == Some(&b'\n') {
                let line = String::from_utf8_lossy(&self.partial);
                let line = line.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
                self.partial.clear();
            }
        }

        Ok(lines)
    }

    /// Polls until `shutdown` is set, delivering each batch of new lines to `sink`.
    pub fn run<S: LineSink>(
        mut self,
        sink: &S,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), TailError> {
        while !stop_requested(&shutdown) {
            let lines = self.poll()?;
            if lines.is_empty() {
                thread::sleep(self.poll_interval);
                continue;
            }
            sink.on_new_lines(&lines);
        }

        tracing::debug!(path = %self.path.display(), "tailer stopped");
        Ok(())
    }

    fn read_err(&self, source: io::Error) -> TailError {
        TailError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

/// Delivers lines from a reader (e.g. stdin) one at a time until EOF or shutdown.
///
/// Bytes that are not UTF-8 are replaced rather than rejected, so a corrupt
/// line reaches the sink (and is counted there) instead of ending the stream.
pub fn follow_reader<R: BufRead, S: LineSink>(
    mut reader: R,
    sink: &S,
    shutdown: watch::Receiver<bool>,
) -> io::Result<()> {
    let mut buf = Vec::new();

    while !stop_requested(&shutdown) {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if !line.is_empty() {
            sink.on_new_lines(&[line.to_string()]);
        }
    }
    Ok(())
}

fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}
