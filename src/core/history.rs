//! Most-recently-used file history with preview suppression.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::config::config_dir;
use super::path::RelPath;

/// Maximum number of history entries retained. Inserting past this evicts the
/// oldest (tail) entry.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Process-wide shared handle to a history store.
///
/// The store outlives any picker session; sessions borrow it and must release
/// the preview flag on every exit path.
pub type SharedHistory<S> = std::sync::Arc<parking_lot::Mutex<S>>;

/// A previously activated file with its last cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Workspace-relative path (uniqueness key).
    pub rel: RelPath,
    /// Absolute on-disk path.
    pub abs: PathBuf,
    /// Last cursor line (0-based).
    pub line: u32,
    /// Last cursor column (0-based).
    pub col: u32,
    /// Last access time, seconds since the Unix epoch.
    pub last_accessed: u64,
}

/// How a history write should be treated.
///
/// A single tagged write path keeps the "browsing never pollutes history"
/// invariant checkable in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// A real activation: move-to-front insert.
    Committed,
    /// Preview-only observation: remembered in the suppression set, never
    /// written as an entry.
    Suppressed,
}

/// Interface to the MRU history list.
pub trait HistoryStore {
    /// Record an access to a file.
    ///
    /// `Committed` moves-or-inserts the entry at the front (one entry per
    /// relative path, capacity-capped). While preview mode is active a
    /// `Committed` record is downgraded to suppression; only
    /// [`HistoryStore::record_forced`] bypasses that. A non-absolute `abs`
    /// path is a no-op, not an error: the store only tracks on-disk files.
    fn record(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32, mode: WriteMode);

    /// Record a committed access regardless of preview mode. Used by the
    /// session's accept path so the acceptance is always written even though
    /// the path was suppressed while browsing.
    fn record_forced(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32);

    /// Entries front-to-back (most-recent-first). Read-only snapshot.
    fn ordered(&self) -> &[HistoryEntry];

    /// Look up the entry for a path, if present.
    fn entry(&self, rel: &RelPath) -> Option<&HistoryEntry> {
        self.ordered().iter().find(|e| &e.rel == rel)
    }

    /// Whether a path was observed only during preview.
    fn is_suppressed(&self, rel: &RelPath) -> bool;

    /// Toggle preview mode. Disabling clears the suppression set; committed
    /// entries from before are untouched.
    fn set_preview_mode(&mut self, enabled: bool);

    /// Whether preview mode is currently active.
    fn preview_mode(&self) -> bool;
}

/// MRU list plus suppression bookkeeping shared by both store impls.
#[derive(Debug, Default, Clone)]
struct HistoryState {
    entries: Vec<HistoryEntry>,
    suppressed: HashSet<RelPath>,
    preview: bool,
}

impl HistoryState {
    /// Returns true when a committed entry was actually written.
    fn record(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32, mode: WriteMode) -> bool {
        if !abs.is_absolute() {
            return false;
        }
        let mode = if self.preview && mode == WriteMode::Committed {
            WriteMode::Suppressed
        } else {
            mode
        };
        match mode {
            WriteMode::Suppressed => {
                self.suppressed.insert(rel.clone());
                false
            }
            WriteMode::Committed => {
                self.commit(rel, abs, line, col);
                true
            }
        }
    }

    fn commit(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32) {
        self.entries.retain(|e| &e.rel != rel);
        self.entries.insert(
            0,
            HistoryEntry {
                rel: rel.clone(),
                abs: abs.to_path_buf(),
                line,
                col,
                last_accessed: epoch_seconds(),
            },
        );
        self.entries.truncate(MAX_HISTORY_SIZE);
    }

    fn force(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32) -> bool {
        if !abs.is_absolute() {
            return false;
        }
        self.suppressed.remove(rel);
        self.commit(rel, abs, line, col);
        true
    }

    fn set_preview_mode(&mut self, enabled: bool) {
        self.preview = enabled;
        if !enabled {
            self.suppressed.clear();
        }
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// In-memory history (no persistence).
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    state: HistoryState,
}

impl MemoryHistoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn record(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32, mode: WriteMode) {
        self.state.record(rel, abs, line, col, mode);
    }

    fn record_forced(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32) {
        self.state.force(rel, abs, line, col);
    }

    fn ordered(&self) -> &[HistoryEntry] {
        &self.state.entries
    }

    fn is_suppressed(&self, rel: &RelPath) -> bool {
        self.state.suppressed.contains(rel)
    }

    fn set_preview_mode(&mut self, enabled: bool) {
        self.state.set_preview_mode(enabled);
    }

    fn preview_mode(&self) -> bool {
        self.state.preview
    }
}

/// Persisted history schema.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersistedHistory {
    /// Schema version for migration.
    pub version: u32,
    /// Per-workspace entries, keyed by workspace root path, ordered
    /// most-recent-first.
    pub workspaces: HashMap<String, Vec<HistoryEntry>>,
}

impl PersistedHistory {
    /// Current schema version.
    pub const VERSION: u32 = 1;

    /// Create a new empty persisted history.
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            workspaces: HashMap::new(),
        }
    }
}

/// Persistent history store backed by a JSON file.
///
/// Saved after every committed record; a save failure degrades to a warning
/// rather than failing the record.
#[derive(Debug)]
pub struct FileHistoryStore {
    /// Path to the history file.
    history_path: PathBuf,
    /// Workspace root key.
    workspace_key: String,
    /// In-memory state.
    state: HistoryState,
}

impl FileHistoryStore {
    /// Create a new FileHistoryStore for a workspace.
    /// Loads existing history if available.
    #[must_use = "this returns a Result that should be checked"]
    pub fn new(workspace_root: &str) -> std::io::Result<Self> {
        Self::with_path(workspace_root, config_dir().join("history.json"))
    }

    /// Create with a custom history path (for testing).
    #[must_use = "this returns a Result that should be checked"]
    pub fn with_path(workspace_root: &str, history_path: PathBuf) -> std::io::Result<Self> {
        let mut store = Self {
            history_path,
            workspace_key: workspace_root.to_string(),
            state: HistoryState::default(),
        };
        store.load()?;
        Ok(store)
    }

    /// Load history from disk.
    fn load(&mut self) -> std::io::Result<()> {
        if !self.history_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.history_path)?;
        let persisted: PersistedHistory = serde_json::from_str(&content).unwrap_or_default();

        if let Some(entries) = persisted.workspaces.get(&self.workspace_key) {
            self.state.entries = entries.clone();
            self.state.entries.truncate(MAX_HISTORY_SIZE);
        }

        Ok(())
    }

    /// Save history to disk (atomic write).
    #[must_use = "this returns a Result that should be checked"]
    pub fn save(&self) -> std::io::Result<()> {
        // Load existing file to preserve other workspaces.
        let mut persisted = if self.history_path.exists() {
            let content = std::fs::read_to_string(&self.history_path)?;
            serde_json::from_str(&content).unwrap_or_else(|_| PersistedHistory::new())
        } else {
            PersistedHistory::new()
        };

        persisted
            .workspaces
            .insert(self.workspace_key.clone(), self.state.entries.clone());

        if let Some(parent) = self.history_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file + rename.
        let temp_path = self.history_path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.history_path)?;

        Ok(())
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            eprintln!("Warning: failed to save history: {}", e);
        }
    }
}

impl HistoryStore for FileHistoryStore {
    fn record(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32, mode: WriteMode) {
        if self.state.record(rel, abs, line, col, mode) {
            self.save_or_warn();
        }
    }

    fn record_forced(&mut self, rel: &RelPath, abs: &Path, line: u32, col: u32) {
        if self.state.force(rel, abs, line, col) {
            self.save_or_warn();
        }
    }

    fn ordered(&self) -> &[HistoryEntry] {
        &self.state.entries
    }

    fn is_suppressed(&self, rel: &RelPath) -> bool {
        self.state.suppressed.contains(rel)
    }

    fn set_preview_mode(&mut self, enabled: bool) {
        self.state.set_preview_mode(enabled);
    }

    fn preview_mode(&self) -> bool {
        self.state.preview
    }
}
