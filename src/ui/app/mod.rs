//! Application state and lifecycle.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{
    CandidatePath, ExclusionFilter, FileHistoryStore, HistoryStore, PickerConfig, PickerMode,
    ScoredCandidate, SessionController, SessionEvent, SharedHistory, WorkspaceRoot,
    WorkspaceWalker, WorkspaceWatcher,
};

use super::worker::{spawn_rank_worker, RankResponse, RankWorker};

mod external;
mod host;
mod navigation;
mod query;
mod state;

pub use external::launch_editor;
pub use host::{PreviewPane, TuiHost};
pub use state::{ResultsState, UiState};

/// Application state.
pub struct App {
    /// Workspace root.
    pub root: WorkspaceRoot,
    /// Picker configuration snapshot.
    pub config: PickerConfig,
    /// Candidate-list mode for this session.
    pub mode: PickerMode,
    /// Current query text.
    pub query: String,
    /// Current ranked results.
    pub results: Vec<ScoredCandidate>,
    /// Results list navigation state.
    pub list: ResultsState,
    /// UI messages and dirty flag.
    pub ui: UiState,
    /// Host surface (preview pane, deferred opens).
    pub host: TuiHost,
    /// Should the app quit?
    pub should_quit: bool,

    /// Candidate snapshot in default (history-first) order.
    candidates: Arc<Vec<CandidatePath>>,
    walker: WorkspaceWalker,
    filter: ExclusionFilter,
    history: SharedHistory<FileHistoryStore>,
    session: SessionController<FileHistoryStore>,
    worker: RankWorker,
    next_request_id: u64,
    pending_request_id: Option<u64>,
    watcher: Option<WorkspaceWatcher>,
}

impl App {
    /// Create a new App over a workspace, loading history from the default
    /// location.
    pub fn new(
        root: WorkspaceRoot,
        config: PickerConfig,
        mode: PickerMode,
        initial_query: Option<String>,
    ) -> anyhow::Result<Self> {
        let history = FileHistoryStore::new(root.as_str())?;
        Ok(Self::with_history(root, config, mode, initial_query, history))
    }

    /// Create a new App with an explicitly constructed history store
    /// (used by tests to point persistence at a temp directory).
    pub fn with_history(
        root: WorkspaceRoot,
        config: PickerConfig,
        mode: PickerMode,
        initial_query: Option<String>,
        history: FileHistoryStore,
    ) -> Self {
        let filter = ExclusionFilter::compile(&config);
        let walker = WorkspaceWalker::new(root.clone());
        let walked = walker.enumerate(&filter);
        let candidates = Arc::new(default_order(mode, walked, &history));

        let history: SharedHistory<FileHistoryStore> = Arc::new(Mutex::new(history));
        let session = SessionController::new(Arc::clone(&history));
        let worker = spawn_rank_worker();

        let watcher = match WorkspaceWatcher::new(&root) {
            Ok(w) => Some(w),
            Err(e) => {
                eprintln!("Warning: file watching disabled: {}", e);
                None
            }
        };

        let mut app = Self {
            root,
            config,
            mode,
            query: initial_query.unwrap_or_default(),
            results: Vec::new(),
            list: ResultsState::default(),
            ui: UiState {
                dirty: true,
                ..UiState::default()
            },
            host: TuiHost::new(),
            should_quit: false,
            candidates,
            walker,
            filter,
            history,
            session,
            worker,
            next_request_id: 1,
            pending_request_id: None,
            watcher,
        };

        app.session
            .handle(SessionEvent::Opened { mode }, &mut app.host);
        app.request_rank();
        app
    }

    /// Shared history handle (most-recent-first entries).
    pub fn history(&self) -> &SharedHistory<FileHistoryStore> {
        &self.history
    }

    /// Number of candidates currently eligible for ranking.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Drive background work: watcher signals and rank responses.
    ///
    /// Rank responses are last-write-wins: anything but the pending request
    /// id is stale and discarded, never merged.
    pub fn poll_worker(&mut self) {
        let changed = self.watcher.as_ref().is_some_and(|w| w.poll().is_some());
        if changed {
            self.refresh_candidates();
            self.ui.status = Some("workspace changed, candidates refreshed".to_string());
        }

        let mut latest: Option<RankResponse> = None;
        while let Ok(response) = self.worker.response_rx.try_recv() {
            if Some(response.id) == self.pending_request_id {
                latest = Some(response);
            }
        }
        if let Some(response) = latest {
            self.pending_request_id = None;
            self.apply_results(response.results);
        }
    }

    /// Re-enumerate the workspace and restart ranking over the fresh set.
    pub fn refresh_candidates(&mut self) {
        self.filter.rebuild_if_changed(&self.config);
        let walked = self.walker.enumerate(&self.filter);
        {
            let history = self.history.lock();
            self.candidates = Arc::new(default_order(self.mode, walked, &history));
        }
        self.request_rank();
    }

    /// Run a session event through the controller against the TUI host.
    pub(crate) fn session_event(&mut self, event: SessionEvent<'_>) {
        self.session.handle(event, &mut self.host);
    }
}

/// Order candidates for the empty-query view: history entries first
/// (most-recent-first), then the remaining files in walk order. In
/// recent-files mode only the history entries appear.
fn default_order(
    mode: PickerMode,
    walked: Vec<CandidatePath>,
    history: &FileHistoryStore,
) -> Vec<CandidatePath> {
    let index: HashMap<&str, usize> = walked
        .iter()
        .enumerate()
        .map(|(i, c)| (c.rel.as_str(), i))
        .collect();

    let mut out = Vec::with_capacity(walked.len());
    let mut taken = vec![false; walked.len()];
    for entry in history.ordered() {
        // Vanished files are skipped, not errors.
        if let Some(&i) = index.get(entry.rel.as_str()) {
            out.push(walked[i].clone());
            taken[i] = true;
        }
    }

    if mode == PickerMode::Standard {
        for (i, candidate) in walked.into_iter().enumerate() {
            if !taken[i] {
                out.push(candidate);
            }
        }
    }

    out
}
