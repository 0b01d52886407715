//! Picker configuration and tuning constants.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Cached config directory path.
static CONFIG_DIR: OnceLock<std::path::PathBuf> = OnceLock::new();

/// Get the quickjump config directory (cached).
pub(crate) fn config_dir() -> &'static std::path::Path {
    CONFIG_DIR.get_or_init(|| {
        directories::ProjectDirs::from("", "", "quickjump")
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(dirs_fallback)
    })
}

/// Fallback config directory if `directories` fails.
fn dirs_fallback() -> std::path::PathBuf {
    std::env::var("HOME")
        .map(|h| Path::new(&h).join(".config").join("quickjump"))
        .unwrap_or_else(|_| std::path::PathBuf::from(".quickjump"))
}

/// Multiplier and threshold constants for the ranking heuristics.
///
/// These are tuning knobs, not correctness parameters; the defaults here are
/// the shipped behavior and every field can be overridden from the config
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankWeights {
    /// Weight applied to the basename match relative to the full-path match.
    pub basename_weight: f64,
    /// Multiplier for paths that narrowly avoided a configured exclusion.
    pub near_exclusion_penalty: f64,
    /// Multiplier for paths under well-known library/vendor directories.
    pub library_penalty: f64,
    /// Multiplier for generic catch-all filenames (unless shallow).
    pub generic_name_penalty: f64,
    /// Multiplier for shallow paths.
    pub shallow_boost: f64,
    /// Multiplier for deep paths.
    pub deep_penalty: f64,
    /// Paths with at most this many segments count as shallow.
    pub shallow_depth: usize,
    /// Paths with at least this many segments count as deep.
    pub deep_depth: usize,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            basename_weight: 2.0,
            near_exclusion_penalty: 0.15,
            library_penalty: 0.2,
            generic_name_penalty: 0.7,
            shallow_boost: 1.4,
            deep_penalty: 0.7,
            shallow_depth: 2,
            deep_depth: 6,
        }
    }
}

/// Read-only picker configuration snapshot.
///
/// Re-read by the ranking pass on every query; the compiled exclusion matcher
/// is rebuilt only when the exclusion fields actually change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Directory names excluded wherever they appear as a path segment.
    pub excluded_dir_names: Vec<String>,
    /// Glob patterns excluded against the normalized relative path.
    /// `**` crosses separators, `*` does not.
    pub excluded_globs: Vec<String>,
    /// Result list cap, applied after sorting.
    pub max_results: usize,
    /// Queries shorter than this bypass ranking entirely.
    pub min_query_length: usize,
    /// Ranking heuristic constants.
    pub weights: RankWeights,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            excluded_dir_names: vec![
                ".git".to_string(),
                ".hg".to_string(),
                ".svn".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
                "__pycache__".to_string(),
                ".venv".to_string(),
            ],
            excluded_globs: Vec::new(),
            max_results: 100,
            min_query_length: 2,
            weights: RankWeights::default(),
        }
    }
}

impl PickerConfig {
    /// Load configuration from the default config file, falling back to
    /// defaults when the file is missing or malformed.
    ///
    /// A malformed file is not an error: the picker should always come up.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&config_dir().join("config.json"))
    }

    /// Load configuration from a specific path (for testing).
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                eprintln!("Warning: ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
