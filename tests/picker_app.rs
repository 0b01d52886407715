use std::fs;
use std::path::PathBuf;

use quickjump::core::{
    FileHistoryStore, HistoryStore, PickerConfig, PickerMode, RelPath, WorkspaceRoot,
};
use quickjump::ui::App;
use tempfile::TempDir;

const FILE_MAIN: &str = "src/main.rs";
const FILE_LIB: &str = "src/lib.rs";
const FILE_NOTES: &str = "docs/notes.md";

struct Harness {
    _workspace: TempDir,
    _state: TempDir,
    root: WorkspaceRoot,
    history_path: PathBuf,
}

impl Harness {
    fn new(files: &[&str]) -> Self {
        let workspace = TempDir::new().unwrap();
        for rel in files {
            let path = workspace.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, format!("// {}\nfn stub() {{}}\n", rel)).unwrap();
        }
        let state = TempDir::new().unwrap();
        let history_path = state.path().join("history.json");
        let root = WorkspaceRoot::open(workspace.path()).unwrap();
        Self {
            _workspace: workspace,
            _state: state,
            root,
            history_path,
        }
    }

    fn store(&self) -> FileHistoryStore {
        FileHistoryStore::with_path(self.root.as_str(), self.history_path.clone()).unwrap()
    }

    fn touch(&self, rel: &str, line: u32) {
        let mut store = self.store();
        let rel = RelPath::new(rel);
        let abs = rel.to_absolute(&self.root);
        store.record_forced(&rel, &abs, line, 0);
    }

    fn app(&self, mode: PickerMode, query: Option<&str>) -> App {
        self.app_with_config(mode, query, PickerConfig::default())
    }

    fn app_with_config(&self, mode: PickerMode, query: Option<&str>, config: PickerConfig) -> App {
        let mut app = App::with_history(
            self.root.clone(),
            config,
            mode,
            query.map(String::from),
            self.store(),
        );
        app.wait_for_results();
        app
    }
}

fn result_rels(app: &App) -> Vec<String> {
    app.results
        .iter()
        .map(|s| s.candidate.rel.as_str().to_string())
        .collect()
}

#[test]
fn empty_query_lists_history_first() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB, FILE_NOTES]);
    h.touch(FILE_NOTES, 3);

    let app = h.app(PickerMode::Standard, None);

    let rels = result_rels(&app);
    assert_eq!(rels[0], FILE_NOTES);
    assert_eq!(rels.len(), 3);
    // Remaining files follow in walk (sorted) order.
    assert_eq!(rels[1], FILE_LIB);
    assert_eq!(rels[2], FILE_MAIN);
    // Unscored passthrough: no match positions.
    assert!(app.results.iter().all(|s| s.positions.is_none()));
}

#[test]
fn query_ranks_and_exclusions_hold() {
    let h = Harness::new(&[
        "src/index.ts",
        "src/lib/index.ts",
        "node_modules/lib/index.ts",
    ]);

    let app = h.app(PickerMode::Standard, Some("index"));

    assert_eq!(
        result_rels(&app),
        vec!["src/index.ts", "src/lib/index.ts"]
    );
}

#[test]
fn top_candidate_is_previewed_and_suppressed() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB]);

    let app = h.app(PickerMode::Standard, Some("main"));

    let pane = app.host.preview.as_ref().expect("top candidate previewed");
    assert_eq!(pane.rel.as_str(), FILE_MAIN);
    assert!(pane.buffer.line_count() > 0);

    let history = app.history().lock();
    assert!(history.preview_mode());
    assert!(history.is_suppressed(&RelPath::new(FILE_MAIN)));
    assert!(history.ordered().is_empty());
}

#[test]
fn accept_commits_and_defers_the_open() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB, FILE_NOTES]);
    h.touch(FILE_NOTES, 9);

    let mut app = h.app(PickerMode::Standard, Some("main"));
    app.accept_selected();

    assert!(app.should_quit);
    let (candidate, line, _col) = app.host.take_pending_open().expect("deferred open");
    assert_eq!(candidate.rel.as_str(), FILE_MAIN);
    assert_eq!(line, 0);

    let history = app.history().lock();
    assert!(!history.preview_mode());
    let rels: Vec<&str> = history.ordered().iter().map(|e| e.rel.as_str()).collect();
    assert_eq!(rels, vec![FILE_MAIN, FILE_NOTES]);
}

#[test]
fn browsing_then_cancel_leaves_history_unchanged() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB, FILE_NOTES]);
    h.touch(FILE_LIB, 2);

    let mut app = h.app(PickerMode::Standard, None);
    // Browse through every candidate.
    app.select_next();
    app.select_next();
    app.cancel();

    assert!(app.should_quit);
    assert!(app.host.take_pending_open().is_none());

    let history = app.history().lock();
    assert!(!history.preview_mode());
    let rels: Vec<&str> = history.ordered().iter().map(|e| e.rel.as_str()).collect();
    assert_eq!(rels, vec![FILE_LIB]);
    // Suppression set was cleared on exit.
    assert!(!history.is_suppressed(&RelPath::new(FILE_MAIN)));
}

#[test]
fn accepted_file_persists_across_apps() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB]);

    {
        let mut app = h.app(PickerMode::Standard, Some("lib"));
        app.accept_selected();
    }

    let app = h.app(PickerMode::Standard, None);
    assert_eq!(result_rels(&app)[0], FILE_LIB);
}

#[test]
fn recent_mode_lists_only_history() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB, FILE_NOTES]);
    h.touch(FILE_MAIN, 0);
    h.touch(FILE_NOTES, 5);

    let app = h.app(PickerMode::RecentFiles, None);

    assert_eq!(result_rels(&app), vec![FILE_NOTES, FILE_MAIN]);
}

#[test]
fn rapid_queries_resolve_to_the_last_one() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB, FILE_NOTES]);

    let mut app = h.app(PickerMode::Standard, None);
    for c in "notes".chars() {
        app.push_query_char(c);
    }
    app.wait_for_results();

    assert_eq!(result_rels(&app), vec![FILE_NOTES]);
}

#[test]
fn max_results_caps_the_list() {
    let files: Vec<String> = (0..20).map(|i| format!("src/file{:02}.rs", i)).collect();
    let refs: Vec<&str> = files.iter().map(String::as_str).collect();
    let h = Harness::new(&refs);

    let mut config = PickerConfig::default();
    config.max_results = 5;
    let app = h.app_with_config(PickerMode::Standard, None, config);

    assert_eq!(app.results.len(), 5);
    assert_eq!(app.candidate_count(), 20);
}

#[test]
fn selection_movement_updates_preview() {
    let h = Harness::new(&[FILE_MAIN, FILE_LIB]);

    let mut app = h.app(PickerMode::Standard, None);
    let first = app.host.preview.as_ref().unwrap().rel.clone();
    app.select_next();
    let second = app.host.preview.as_ref().unwrap().rel.clone();
    assert_ne!(first, second);

    app.select_prev();
    assert_eq!(app.host.preview.as_ref().unwrap().rel, first);
}
