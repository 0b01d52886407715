//! Preview session state machine.
//!
//! One controller lives for the process; one session runs per picker
//! invocation. While a session is `Browsing`, candidate views are "soft":
//! they are registered as suppressed in the history store and never disturb
//! committed ordering. Accepting commits exactly one entry; cancelling
//! restores whatever was active before the session began.

use std::path::PathBuf;

use thiserror::Error;

use super::history::{HistoryStore, SharedHistory, WriteMode};
use super::path::{CandidatePath, RelPath};

/// Errors surfaced by host document operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    /// The document no longer exists (deleted mid-session).
    #[error("document vanished: {0}")]
    Missing(PathBuf),
    /// I/O error opening or restoring a document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Any other host-side failure.
    #[error("{0}")]
    Other(String),
}

/// Opaque handle to a host-side document view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u64);

/// Snapshot of the active document captured when a session opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFileSnapshot {
    /// Workspace-relative path.
    pub rel: RelPath,
    /// Absolute path.
    pub abs: PathBuf,
    /// Cursor line at capture time.
    pub line: u32,
    /// Cursor column at capture time.
    pub col: u32,
}

/// Host surface for opening and restoring documents.
///
/// The core only decides which path/position to request and whether the
/// request is soft (preview) or hard (committed); the host renders.
pub trait DocumentHost {
    /// The document currently active in the host, if any.
    fn active_file(&self) -> Option<ActiveFileSnapshot>;

    /// Open a candidate non-committingly (transient view).
    fn open_preview(
        &mut self,
        candidate: &CandidatePath,
        line: u32,
        col: u32,
    ) -> Result<ViewHandle, HostError>;

    /// Open a candidate as a persistent document.
    fn open_committed(
        &mut self,
        candidate: &CandidatePath,
        line: u32,
        col: u32,
    ) -> Result<ViewHandle, HostError>;

    /// Restore a previously captured active document.
    fn restore(&mut self, snapshot: &ActiveFileSnapshot) -> Result<(), HostError>;
}

/// Host surface for transient line decorations.
pub trait DecorationSink {
    /// Apply a whole-line highlight to a view.
    fn highlight_line(&mut self, handle: ViewHandle, line: u32);

    /// Remove all highlights from a view.
    fn clear_highlights(&mut self, handle: ViewHandle);
}

/// What populated the session's candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerMode {
    /// Full workspace candidate set.
    #[default]
    Standard,
    /// History entries only.
    RecentFiles,
}

/// External events driving the session state machine.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    /// The picker opened.
    Opened {
        /// Candidate-list mode for this session.
        mode: PickerMode,
    },
    /// The highlighted candidate changed.
    ActiveChanged {
        /// Newly highlighted candidate.
        candidate: &'a CandidatePath,
    },
    /// The user accepted a candidate.
    Accepted {
        /// The accepted candidate.
        candidate: &'a CandidatePath,
    },
    /// The picker was dismissed without acceptance.
    Cancelled,
}

/// Session states. Committing and cancelling are transient: both land back in
/// `Idle` within a single transition.
#[derive(Debug)]
enum SessionState {
    Idle,
    Browsing(BrowseState),
}

#[derive(Debug)]
struct BrowseState {
    mode: PickerMode,
    previously_active: Option<ActiveFileSnapshot>,
    /// Currently previewed candidate and its view, if the last soft open
    /// succeeded.
    current: Option<(CandidatePath, ViewHandle)>,
}

/// Coordinates preview browsing against the shared history store.
///
/// Holds a reference to the store, never ownership; the store's preview flag
/// is released on every exit path, including drop mid-session.
pub struct SessionController<S: HistoryStore> {
    history: SharedHistory<S>,
    state: SessionState,
}

impl<S: HistoryStore> SessionController<S> {
    /// Create a controller over a shared history store.
    pub fn new(history: SharedHistory<S>) -> Self {
        Self {
            history,
            state: SessionState::Idle,
        }
    }

    /// Whether a session is currently browsing.
    pub fn is_browsing(&self) -> bool {
        matches!(self.state, SessionState::Browsing(_))
    }

    /// The active session's mode, if browsing.
    pub fn mode(&self) -> Option<PickerMode> {
        match &self.state {
            SessionState::Browsing(b) => Some(b.mode),
            SessionState::Idle => None,
        }
    }

    /// Single transition function for all session events.
    ///
    /// Events that do not apply in the current state (accept or cancel while
    /// idle, re-open while browsing) are no-ops, never errors.
    pub fn handle<H>(&mut self, event: SessionEvent<'_>, host: &mut H)
    where
        H: DocumentHost + DecorationSink,
    {
        match event {
            SessionEvent::Opened { mode } => self.on_opened(mode, host),
            SessionEvent::ActiveChanged { candidate } => self.on_active_changed(candidate, host),
            SessionEvent::Accepted { candidate } => self.on_accepted(candidate, host),
            SessionEvent::Cancelled => self.on_cancelled(host),
        }
    }

    fn on_opened<H: DocumentHost>(&mut self, mode: PickerMode, host: &mut H) {
        if self.is_browsing() {
            return;
        }
        let previously_active = host.active_file();
        self.history.lock().set_preview_mode(true);
        self.state = SessionState::Browsing(BrowseState {
            mode,
            previously_active,
            current: None,
        });
    }

    fn on_active_changed<H>(&mut self, candidate: &CandidatePath, host: &mut H)
    where
        H: DocumentHost + DecorationSink,
    {
        let SessionState::Browsing(browse) = &mut self.state else {
            return;
        };

        if let Some((_, handle)) = browse.current.take() {
            host.clear_highlights(handle);
        }

        let (line, col) = {
            let mut history = self.history.lock();
            let pos = history
                .entry(&candidate.rel)
                .map(|e| (e.line, e.col))
                .unwrap_or((0, 0));
            history.record(&candidate.rel, &candidate.abs, pos.0, pos.1, WriteMode::Suppressed);
            pos
        };

        match host.open_preview(candidate, line, col) {
            Ok(handle) => {
                host.highlight_line(handle, line);
                browse.current = Some((candidate.clone(), handle));
            }
            Err(e) => {
                // Keep browsing; the prior highlight is already cleared, so
                // no stale decoration is left behind.
                eprintln!("Warning: preview failed for {}: {}", candidate.rel, e);
            }
        }
    }

    fn on_accepted<H>(&mut self, candidate: &CandidatePath, host: &mut H)
    where
        H: DocumentHost + DecorationSink,
    {
        let SessionState::Browsing(browse) =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return;
        };

        if let Some((_, handle)) = browse.current {
            host.clear_highlights(handle);
        }

        let (line, col) = {
            let mut history = self.history.lock();
            // Disabling preview first clears the suppression set; the forced
            // record below is what makes the acceptance stick regardless.
            history.set_preview_mode(false);
            let pos = history
                .entry(&candidate.rel)
                .map(|e| (e.line, e.col))
                .unwrap_or((0, 0));
            history.record_forced(&candidate.rel, &candidate.abs, pos.0, pos.1);
            pos
        };

        if let Err(e) = host.open_committed(candidate, line, col) {
            eprintln!("Warning: open failed for {}: {}", candidate.rel, e);
        }
    }

    fn on_cancelled<H>(&mut self, host: &mut H)
    where
        H: DocumentHost + DecorationSink,
    {
        let SessionState::Browsing(browse) =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return;
        };

        if let Some((_, handle)) = browse.current {
            host.clear_highlights(handle);
        }

        self.history.lock().set_preview_mode(false);

        if let Some(snapshot) = browse.previously_active {
            if let Err(e) = host.restore(&snapshot) {
                eprintln!("Warning: failed to restore {}: {}", snapshot.rel, e);
            }
        }
    }
}

impl<S: HistoryStore> Drop for SessionController<S> {
    fn drop(&mut self) {
        // The preview flag must not outlive the controller.
        if self.is_browsing() {
            self.history.lock().set_preview_mode(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::{HistoryEntry, MemoryHistoryStore};
    use crate::core::path::WorkspaceRoot;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Arc;

    /// In-process host double; never touches a terminal or the filesystem.
    #[derive(Default)]
    struct MockHost {
        active: Option<ActiveFileSnapshot>,
        next_handle: u64,
        previews: Vec<(String, u32)>,
        committed: Vec<(String, u32)>,
        restored: Vec<ActiveFileSnapshot>,
        highlights: Vec<(ViewHandle, u32)>,
        cleared: Vec<ViewHandle>,
        fail_preview: HashSet<String>,
    }

    impl MockHost {
        fn live_highlights(&self) -> usize {
            self.highlights.len() - self.cleared.len()
        }
    }

    impl DocumentHost for MockHost {
        fn active_file(&self) -> Option<ActiveFileSnapshot> {
            self.active.clone()
        }

        fn open_preview(
            &mut self,
            candidate: &CandidatePath,
            line: u32,
            _col: u32,
        ) -> Result<ViewHandle, HostError> {
            if self.fail_preview.contains(candidate.rel.as_str()) {
                return Err(HostError::Missing(candidate.abs.clone()));
            }
            self.next_handle += 1;
            self.previews.push((candidate.rel.as_str().to_string(), line));
            Ok(ViewHandle(self.next_handle))
        }

        fn open_committed(
            &mut self,
            candidate: &CandidatePath,
            line: u32,
            _col: u32,
        ) -> Result<ViewHandle, HostError> {
            self.next_handle += 1;
            self.committed.push((candidate.rel.as_str().to_string(), line));
            Ok(ViewHandle(self.next_handle))
        }

        fn restore(&mut self, snapshot: &ActiveFileSnapshot) -> Result<(), HostError> {
            self.restored.push(snapshot.clone());
            Ok(())
        }
    }

    impl DecorationSink for MockHost {
        fn highlight_line(&mut self, handle: ViewHandle, line: u32) {
            self.highlights.push((handle, line));
        }

        fn clear_highlights(&mut self, handle: ViewHandle) {
            self.cleared.push(handle);
        }
    }

    fn candidate(rel: &str) -> CandidatePath {
        let root = WorkspaceRoot::open(Path::new("/")).unwrap();
        CandidatePath::from_rel(&root, RelPath::new(rel))
    }

    fn snapshot(rel: &str, line: u32) -> ActiveFileSnapshot {
        ActiveFileSnapshot {
            rel: RelPath::new(rel),
            abs: PathBuf::from("/").join(rel),
            line,
            col: 0,
        }
    }

    fn controller() -> (
        SessionController<MemoryHistoryStore>,
        SharedHistory<MemoryHistoryStore>,
    ) {
        let history = Arc::new(Mutex::new(MemoryHistoryStore::new()));
        (SessionController::new(Arc::clone(&history)), history)
    }

    #[test]
    fn open_enables_preview_and_captures_snapshot() {
        let (mut ctl, history) = controller();
        let mut host = MockHost {
            active: Some(snapshot("b.ts", 10)),
            ..MockHost::default()
        };

        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );

        assert!(ctl.is_browsing());
        assert_eq!(ctl.mode(), Some(PickerMode::Standard));
        assert!(history.lock().preview_mode());
    }

    #[test]
    fn browsing_previews_and_suppresses() {
        let (mut ctl, history) = controller();
        let mut host = MockHost::default();

        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );
        ctl.handle(
            SessionEvent::ActiveChanged {
                candidate: &candidate("a.rs"),
            },
            &mut host,
        );
        ctl.handle(
            SessionEvent::ActiveChanged {
                candidate: &candidate("b.rs"),
            },
            &mut host,
        );

        assert_eq!(host.previews.len(), 2);
        // Highlight for the first preview was cleared when the second opened.
        assert_eq!(host.live_highlights(), 1);
        let history = history.lock();
        assert!(history.is_suppressed(&RelPath::new("a.rs")));
        assert!(history.is_suppressed(&RelPath::new("b.rs")));
        assert!(history.ordered().is_empty());
    }

    #[test]
    fn preview_opens_at_last_known_line() {
        let (mut ctl, history) = controller();
        history.lock().record_forced(
            &RelPath::new("known.rs"),
            Path::new("/known.rs"),
            42,
            3,
        );
        let mut host = MockHost::default();

        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );
        ctl.handle(
            SessionEvent::ActiveChanged {
                candidate: &candidate("known.rs"),
            },
            &mut host,
        );

        assert_eq!(host.previews, vec![("known.rs".to_string(), 42)]);
        assert_eq!(host.highlights.last().unwrap().1, 42);
    }

    #[test]
    fn accept_commits_exactly_the_accepted_path() {
        let (mut ctl, history) = controller();
        // Previously committed entry stays put.
        history.lock().record_forced(
            &RelPath::new("old.rs"),
            Path::new("/old.rs"),
            0,
            0,
        );
        let mut host = MockHost {
            active: Some(snapshot("b.ts", 10)),
            ..MockHost::default()
        };

        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );
        for rel in ["x.ts", "y.ts", "a.ts"] {
            ctl.handle(
                SessionEvent::ActiveChanged {
                    candidate: &candidate(rel),
                },
                &mut host,
            );
        }
        ctl.handle(
            SessionEvent::Accepted {
                candidate: &candidate("a.ts"),
            },
            &mut host,
        );

        assert!(!ctl.is_browsing());
        assert_eq!(host.committed, vec![("a.ts".to_string(), 0)]);
        assert_eq!(host.live_highlights(), 0);

        let history = history.lock();
        assert!(!history.preview_mode());
        let rels: Vec<&str> = history.ordered().iter().map(|e| e.rel.as_str()).collect();
        // Front entry is the accepted file; browsed-only candidates absent.
        assert_eq!(rels, vec!["a.ts", "old.rs"]);
    }

    #[test]
    fn cancel_restores_snapshot_and_leaves_history_unchanged() {
        let (mut ctl, history) = controller();
        history.lock().record_forced(
            &RelPath::new("old.rs"),
            Path::new("/old.rs"),
            5,
            1,
        );
        let before: Vec<HistoryEntry> = history.lock().ordered().to_vec();

        let mut host = MockHost {
            active: Some(snapshot("b.ts", 10)),
            ..MockHost::default()
        };
        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );
        for rel in ["p.rs", "q.rs", "r.rs"] {
            ctl.handle(
                SessionEvent::ActiveChanged {
                    candidate: &candidate(rel),
                },
                &mut host,
            );
        }
        ctl.handle(SessionEvent::Cancelled, &mut host);

        assert!(!ctl.is_browsing());
        assert_eq!(host.restored, vec![snapshot("b.ts", 10)]);
        assert_eq!(host.live_highlights(), 0);

        let history = history.lock();
        assert!(!history.preview_mode());
        assert_eq!(history.ordered(), before.as_slice());
    }

    #[test]
    fn accept_and_cancel_are_noops_when_idle() {
        let (mut ctl, history) = controller();
        let mut host = MockHost::default();

        ctl.handle(
            SessionEvent::Accepted {
                candidate: &candidate("a.rs"),
            },
            &mut host,
        );
        ctl.handle(SessionEvent::Cancelled, &mut host);

        assert!(host.committed.is_empty());
        assert!(host.restored.is_empty());
        assert!(history.lock().ordered().is_empty());
    }

    #[test]
    fn failed_preview_keeps_browsing_without_stale_decorations() {
        let (mut ctl, _history) = controller();
        let mut host = MockHost::default();
        host.fail_preview.insert("gone.rs".to_string());

        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );
        ctl.handle(
            SessionEvent::ActiveChanged {
                candidate: &candidate("ok.rs"),
            },
            &mut host,
        );
        ctl.handle(
            SessionEvent::ActiveChanged {
                candidate: &candidate("gone.rs"),
            },
            &mut host,
        );

        assert!(ctl.is_browsing());
        // The ok.rs highlight was cleared and nothing replaced it.
        assert_eq!(host.live_highlights(), 0);

        // Browsing continues after the failure.
        ctl.handle(
            SessionEvent::ActiveChanged {
                candidate: &candidate("next.rs"),
            },
            &mut host,
        );
        assert_eq!(host.live_highlights(), 1);
    }

    #[test]
    fn reopen_while_browsing_is_ignored() {
        let (mut ctl, _history) = controller();
        let mut host = MockHost {
            active: Some(snapshot("b.ts", 10)),
            ..MockHost::default()
        };

        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::Standard,
            },
            &mut host,
        );
        ctl.handle(
            SessionEvent::Opened {
                mode: PickerMode::RecentFiles,
            },
            &mut host,
        );

        assert_eq!(ctl.mode(), Some(PickerMode::Standard));
    }

    #[test]
    fn drop_mid_session_releases_preview_flag() {
        let history = Arc::new(Mutex::new(MemoryHistoryStore::new()));
        {
            let mut ctl = SessionController::new(Arc::clone(&history));
            let mut host = MockHost::default();
            ctl.handle(
                SessionEvent::Opened {
                    mode: PickerMode::Standard,
                },
                &mut host,
            );
            assert!(history.lock().preview_mode());
        }
        assert!(!history.lock().preview_mode());
    }
}
