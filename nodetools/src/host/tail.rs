//! Log file tailing for the log tab.
//!
//! Each subscription runs a small thread that wakes on filesystem events
//! (debounced) or on the poll interval, reads whatever was appended since the
//! last read, and hands it to the dispatch loop over a channel.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use nodetools_core::{Subscription, TailWatcher, WatchedLogTarget};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Appended bytes tagged with the subscription that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailChunk {
    pub generation: u64,
    pub bytes: Vec<u8>,
}

/// Byte-offset cursor into a growing file.
#[derive(Debug, Clone)]
pub struct FileTail {
    path: PathBuf,
    offset: u64,
}

impl FileTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes written since the previous read.
    ///
    /// A missing file yields nothing. A file shorter than the cursor was
    /// truncated or replaced, so reading restarts from the beginning.
    pub fn read_appended(&mut self) -> io::Result<Vec<u8>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let len = file.metadata()?.len();
        if len < self.offset {
            debug!(path = %self.path.display(), "log file shrank; rewinding");
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::new();
        file.take(len - self.offset).read_to_end(&mut buf)?;
        self.offset += buf.len() as u64;
        Ok(buf)
    }
}

/// Keeps a tail thread running; dropping it stops the thread.
pub struct TailHandle {
    stop: Arc<AtomicBool>,
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl Subscription for TailHandle {}

impl Drop for TailHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

pub struct NotifyTailWatcher {
    chunk_tx: mpsc::Sender<TailChunk>,
    poll_interval: Duration,
    debounce: Duration,
}

impl NotifyTailWatcher {
    pub fn new(chunk_tx: mpsc::Sender<TailChunk>, poll_interval: Duration, debounce: Duration) -> Self {
        Self {
            chunk_tx,
            poll_interval,
            debounce,
        }
    }
}

impl TailWatcher for NotifyTailWatcher {
    type Subscription = TailHandle;

    fn watch(&mut self, target: &WatchedLogTarget, generation: u64) -> io::Result<TailHandle> {
        let (tx, rx) = std_mpsc::channel();
        let mut debouncer = new_debouncer(self.debounce, tx).map_err(io::Error::other)?;

        // The log directory usually appears only once the app first writes,
        // so watch the closest directory that exists and rely on polling for
        // the rest.
        if let Some(dir) = target.log_dir().and_then(nearest_existing_dir) {
            debouncer
                .watcher()
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(io::Error::other)?;
            debug!(dir = %dir.display(), generation, "watching log directory");
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let chunk_tx = self.chunk_tx.clone();
        let poll_interval = self.poll_interval;
        let mut tail = FileTail::new(target.file_path());

        std::thread::spawn(move || {
            loop {
                if thread_stop.load(Ordering::Relaxed) {
                    return;
                }
                match tail.read_appended() {
                    Ok(bytes) if !bytes.is_empty() => {
                        if chunk_tx.blocking_send(TailChunk { generation, bytes }).is_err() {
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!(path = %tail.path().display(), error = %e, "log read failed"),
                }
                match rx.recv_timeout(poll_interval) {
                    Ok(Ok(_events)) => {}
                    Ok(Err(e)) => warn!(error = ?e, "log watch error"),
                    Err(std_mpsc::RecvTimeoutError::Timeout) => {}
                    Err(std_mpsc::RecvTimeoutError::Disconnected) => return,
                }
            }
        });

        Ok(TailHandle {
            stop,
            _debouncer: debouncer,
        })
    }
}

fn nearest_existing_dir(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|candidate| candidate.is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn append(path: &Path, text: &str) {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn read_appended_returns_only_new_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("0.txt");
        let mut tail = FileTail::new(&path);

        append(&path, "first\n");
        assert_eq!(tail.read_appended().unwrap(), b"first\n");
        assert!(tail.read_appended().unwrap().is_empty());

        append(&path, "second\n");
        assert_eq!(tail.read_appended().unwrap(), b"second\n");
        assert_eq!(tail.offset(), 13);
    }

    #[test]
    fn read_appended_tolerates_missing_file() {
        let temp = TempDir::new().unwrap();
        let mut tail = FileTail::new(temp.path().join("server.js.logs").join("0.txt"));
        assert!(tail.read_appended().unwrap().is_empty());
        assert_eq!(tail.offset(), 0);
    }

    #[test]
    fn read_appended_rewinds_after_truncation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("0.txt");
        let mut tail = FileTail::new(&path);

        append(&path, "a long first line\n");
        tail.read_appended().unwrap();

        std::fs::write(&path, "new\n").unwrap();
        assert_eq!(tail.read_appended().unwrap(), b"new\n");
    }

    #[test]
    fn nearest_existing_dir_walks_up() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("index.js.logs");
        assert_eq!(nearest_existing_dir(&missing), Some(temp.path().to_path_buf()));
    }

    #[tokio::test]
    async fn watcher_streams_late_created_log_file() {
        let temp = TempDir::new().unwrap();
        let target = WatchedLogTarget::for_entry(temp.path(), "server.js");
        let (tx, mut rx) = mpsc::channel(8);
        let mut watcher =
            NotifyTailWatcher::new(tx, Duration::from_millis(20), Duration::from_millis(10));

        let _handle = watcher.watch(&target, 7).unwrap();

        std::fs::create_dir_all(target.log_dir().unwrap()).unwrap();
        append(target.file_path(), "ready\n");

        let chunk = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for log chunk")
            .expect("channel closed");
        assert_eq!(chunk.generation, 7);
        assert_eq!(chunk.bytes, b"ready\n");
    }
}
