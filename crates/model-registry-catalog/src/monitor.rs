//! Path change monitor
//!
//! One filesystem watcher is shared by every catalog that follows a file.
//! The watcher observes the parent directory of each path, so a file that is
//! replaced by rename or deleted and recreated keeps being followed.
//!
//! Each subscription is a single-slot channel holding a change counter: a
//! burst of events while the subscriber is busy collapses into one wake-up.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};

static GLOBAL_MONITOR: OnceCell<PathMonitor> = OnceCell::new();

/// Shared filesystem watcher fanning change events out to per-path streams
pub struct PathMonitor {
    subscribers: Arc<Subscribers>,
    watcher: Mutex<RecommendedWatcher>,
    watched_dirs: Mutex<HashSet<PathBuf>>,
}

#[derive(Default)]
struct Subscribers {
    by_path: Mutex<HashMap<PathBuf, Vec<watch::Sender<u64>>>>,
}

impl Subscribers {
    fn dispatch(&self, result: notify::Result<Event>) {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Filesystem watcher reported an error");
                return;
            }
        };
        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }

        let mut by_path = self.by_path.lock();
        for path in &event.paths {
            let Some(senders) = by_path.get_mut(path) else {
                continue;
            };
            senders.retain(|sender| !sender.is_closed());
            for sender in senders.iter() {
                sender.send_modify(|count| *count = count.wrapping_add(1));
            }
            debug!(path = %path.display(), subscribers = senders.len(), "Path changed");
        }
        by_path.retain(|_, senders| !senders.is_empty());
    }
}

impl PathMonitor {
    /// Create a standalone monitor with its own watcher
    pub fn new() -> CatalogResult<Self> {
        let subscribers = Arc::new(Subscribers::default());
        let handler = Arc::clone(&subscribers);
        let watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            handler.dispatch(result)
        })?;

        Ok(Self {
            subscribers,
            watcher: Mutex::new(watcher),
            watched_dirs: Mutex::new(HashSet::new()),
        })
    }

    /// Process-wide monitor, created on first use
    pub fn global() -> CatalogResult<&'static PathMonitor> {
        GLOBAL_MONITOR.get_or_try_init(PathMonitor::new)
    }

    /// Subscribe to changes of `path`.
    ///
    /// The path must be absolute and its parent directory must exist. Every
    /// call returns an independent stream.
    pub fn watch(&self, path: &Path) -> CatalogResult<PathChanges> {
        if !path.is_absolute() {
            return Err(CatalogError::InvalidArgument(format!(
                "watched path must be absolute: {}",
                path.display()
            )));
        }
        let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
            return Err(CatalogError::InvalidArgument(format!(
                "watched path has no file name: {}",
                path.display()
            )));
        };

        // Events report paths under the directory as registered with the OS
        let dir = dir.canonicalize().map_err(|e| {
            CatalogError::Watch(format!("cannot resolve {}: {}", dir.display(), e))
        })?;
        let key = dir.join(file_name);

        {
            let mut watched = self.watched_dirs.lock();
            if !watched.contains(&dir) {
                self.watcher
                    .lock()
                    .watch(&dir, RecursiveMode::NonRecursive)?;
                debug!(dir = %dir.display(), "Watching directory");
                watched.insert(dir);
            }
        }

        let (sender, receiver) = watch::channel(0u64);
        self.subscribers
            .by_path
            .lock()
            .entry(key)
            .or_default()
            .push(sender);

        Ok(PathChanges { receiver })
    }

    /// Number of live subscriptions for `path`
    pub fn subscriber_count(&self, path: &Path) -> usize {
        let key = match (path.parent().map(Path::canonicalize), path.file_name()) {
            (Some(Ok(dir)), Some(file_name)) => dir.join(file_name),
            _ => return 0,
        };
        self.subscribers
            .by_path
            .lock()
            .get(&key)
            .map(|senders| senders.iter().filter(|s| !s.is_closed()).count())
            .unwrap_or(0)
    }
}

/// Change notifications for one watched path
#[derive(Debug)]
pub struct PathChanges {
    receiver: watch::Receiver<u64>,
}

impl PathChanges {
    /// Wait for the next change.
    ///
    /// Returns the number of changes seen so far, or `None` once the monitor
    /// has stopped delivering to this stream.
    pub async fn changed(&mut self) -> Option<u64> {
        self.receiver.changed().await.ok()?;
        let count = *self.receiver.borrow_and_update();
        Some(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn next_change(changes: &mut PathChanges) -> Option<u64> {
        tokio::time::timeout(Duration::from_secs(10), changes.changed())
            .await
            .ok()
            .flatten()
    }

    #[test]
    fn test_relative_path_rejected() {
        let monitor = PathMonitor::new().unwrap();
        let err = monitor.watch(Path::new("catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_directory_is_watch_error() {
        let monitor = PathMonitor::new().unwrap();
        let err = monitor
            .watch(Path::new("/definitely/not/here/catalog.yaml"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Watch(_)));
    }

    #[tokio::test]
    async fn test_write_notifies_every_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, "source: a\n").unwrap();

        let monitor = PathMonitor::new().unwrap();
        let mut first = monitor.watch(&path).unwrap();
        let mut second = monitor.watch(&path).unwrap();
        assert_eq!(monitor.subscriber_count(&path), 2);

        std::fs::write(&path, "source: b\n").unwrap();

        assert!(next_change(&mut first).await.is_some());
        assert!(next_change(&mut second).await.is_some());
    }

    #[tokio::test]
    async fn test_other_files_do_not_notify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, "source: a\n").unwrap();

        let monitor = PathMonitor::new().unwrap();
        let mut changes = monitor.watch(&path).unwrap();

        std::fs::write(dir.path().join("unrelated.yaml"), "x: 1\n").unwrap();
        let quiet = tokio::time::timeout(Duration::from_millis(300), changes.changed()).await;
        assert!(quiet.is_err());
    }

    #[tokio::test]
    async fn test_dropped_stream_is_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, "source: a\n").unwrap();

        let monitor = PathMonitor::new().unwrap();
        let mut kept = monitor.watch(&path).unwrap();
        drop(monitor.watch(&path).unwrap());
        assert_eq!(monitor.subscriber_count(&path), 1);

        std::fs::write(&path, "source: b\n").unwrap();
        assert!(next_change(&mut kept).await.is_some());
    }
}
