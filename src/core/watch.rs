//! File system watching for live candidate refresh.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};

use super::path::WorkspaceRoot;

/// Events emitted by the workspace watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// Files changed, re-enumeration needed.
    Changed,
}

/// Watches a workspace so the candidate list can be re-enumerated when files
/// appear or vanish mid-session.
pub struct WorkspaceWatcher {
    /// Receiver for watch events.
    rx: Receiver<WatchEvent>,
    /// Keep watcher alive. Dropping this stops watching.
    _watcher: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl WorkspaceWatcher {
    /// Create a new watcher for the given workspace root.
    ///
    /// Watches recursively, ignoring version-control metadata directories.
    /// Events are debounced (200ms window) and coalesced into
    /// `WatchEvent::Changed`.
    pub fn new(root: &WorkspaceRoot) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let workspace_path = root.path().to_path_buf();

        // Create debouncer with 200ms timeout
        let mut debouncer = new_debouncer(
            Duration::from_millis(200),
            move |res: DebounceEventResult| {
                if let Ok(events) = res {
                    let relevant = events
                        .iter()
                        .any(|e| !is_ignored_path(&e.path, &workspace_path));

                    if relevant {
                        // Coalesce all events into single Changed signal
                        let _ = tx.send(WatchEvent::Changed);
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root.path(), RecursiveMode::Recursive)?;

        Ok(Self {
            rx,
            _watcher: debouncer,
        })
    }

    /// Poll for watch events without blocking.
    ///
    /// Returns `Some(WatchEvent)` if files changed, `None` if no events pending.
    pub fn poll(&self) -> Option<WatchEvent> {
        match self.rx.try_recv() {
            Ok(event) => {
                // Drain any additional pending events (debouncer may send multiple)
                while self.rx.try_recv().is_ok() {}
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Check if a path should be ignored for watching.
fn is_ignored_path(path: &Path, workspace_root: &Path) -> bool {
    let rel = match path.strip_prefix(workspace_root) {
        Ok(r) => r,
        Err(_) => return false,
    };

    for component in rel.components() {
        if let std::path::Component::Normal(name) = component {
            let name = name.to_string_lossy();
            if name == ".git" || name == ".hg" || name == ".svn" {
                return true;
            }
        }
    }

    false
}
