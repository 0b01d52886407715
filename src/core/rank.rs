//! Fuzzy ranking of candidate paths against a query.
//!
//! The engine scores two views of every candidate — the basename and the full
//! relative path — with nucleo's fuzzy scorer, applies a fixed pipeline of
//! multiplicative context adjustments, and keeps the better view. Candidates
//! where the query is not an ordered subsequence of either view are dropped
//! outright.

use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};

use super::config::PickerConfig;
use super::exclude::ExclusionFilter;
use super::path::CandidatePath;

/// Well-known dependency/build-output directory names. Paths under these rank
/// low even when not configured as hard exclusions.
const LIBRARY_DIR_NAMES: &[&str] = &[
    "node_modules",
    "vendor",
    "vendors",
    "third_party",
    "thirdparty",
    "target",
    "dist",
    "build",
    "out",
    "venv",
    ".venv",
    "site-packages",
    "__pycache__",
    "bower_components",
    "jspm_packages",
    "Pods",
    "deps",
];

/// Catch-all filename stems that usually mean "internals", not the file the
/// user is after — unless the file sits near the project root.
const GENERIC_STEMS: &[&str] = &[
    "index", "init", "__init__", "mod", "utils", "util", "helpers", "helper", "common", "config",
    "shared", "misc",
];

/// A candidate with its computed score. Produced fresh per query.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// The matched candidate.
    pub candidate: CandidatePath,
    /// Final signed score; higher ranks first.
    pub score: f64,
    /// Byte offsets of matched characters in the relative path, when the
    /// query was scored (absent for empty-query passthrough).
    pub positions: Option<Vec<u32>>,
}

/// Fuzzy ranking engine wrapping nucleo-matcher.
///
/// Reuses internal buffers across calls for efficiency.
pub struct Ranker {
    matcher: Matcher,
    haystack_buf: Vec<char>,
    indices_buf: Vec<u32>,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}

/// One scored view of a candidate (basename or full path).
struct ViewScore {
    weighted: f64,
    indices: Vec<u32>,
}

impl Ranker {
    /// Create a new ranking engine with path-matching defaults.
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT.match_paths()),
            haystack_buf: Vec::with_capacity(256),
            indices_buf: Vec::with_capacity(64),
        }
    }

    /// Score and order candidates against a query.
    ///
    /// Returns candidates sorted by score descending; ties break by shorter
    /// relative path, then lexicographic. Hard-excluded candidates never
    /// appear. A query shorter than `config.min_query_length` bypasses
    /// scoring: non-excluded candidates pass through in the caller-supplied
    /// order. The cap is applied after sorting, never before.
    pub fn rank(
        &mut self,
        candidates: &[CandidatePath],
        query: &str,
        config: &PickerConfig,
        filter: &ExclusionFilter,
    ) -> Vec<ScoredCandidate> {
        let query = query.trim();
        if query.chars().count() < config.min_query_length {
            let mut out: Vec<ScoredCandidate> = candidates
                .iter()
                .filter(|c| !filter.is_excluded(&c.rel))
                .map(|c| ScoredCandidate {
                    candidate: c.clone(),
                    score: 0.0,
                    positions: None,
                })
                .collect();
            out.truncate(config.max_results);
            return out;
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut out: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| !filter.is_excluded(&c.rel))
            .filter_map(|c| self.score_candidate(c, query, &pattern, config, filter))
            .collect();

        // Stable sort plus explicit tie-breaks keeps re-runs deterministic.
        out.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.candidate
                        .rel
                        .as_str()
                        .len()
                        .cmp(&b.candidate.rel.as_str().len())
                })
                .then_with(|| a.candidate.rel.as_str().cmp(b.candidate.rel.as_str()))
        });

        out.truncate(config.max_results);
        out
    }

    fn score_candidate(
        &mut self,
        candidate: &CandidatePath,
        query: &str,
        pattern: &Pattern,
        config: &PickerConfig,
        filter: &ExclusionFilter,
    ) -> Option<ScoredCandidate> {
        let rel = candidate.rel.as_str();
        let basename = candidate.basename.as_str();

        // Retention gate: the query must be an ordered subsequence of at
        // least one view, independent of matcher internals.
        let in_basename = is_subsequence(query, basename);
        let in_path = is_subsequence(query, rel);
        if !in_basename && !in_path {
            return None;
        }

        let weights = &config.weights;

        let basename_view = in_basename
            .then(|| self.score_view(basename, pattern, weights.basename_weight))
            .flatten();
        let path_view = in_path.then(|| self.score_view(rel, pattern, 1.0)).flatten();

        // Context multipliers compound in a fixed order and are computed once
        // on the raw score, then the better view is kept, so a legitimately
        // deep but well-named file is not penalized twice.
        let depth = candidate.rel.depth();
        let mut multiplier = 1.0;
        if filter.is_near_exclusion(&candidate.rel) {
            multiplier *= weights.near_exclusion_penalty;
        }
        if is_library_path(candidate) {
            multiplier *= weights.library_penalty;
        }
        if is_generic_basename(basename) && depth > weights.shallow_depth {
            multiplier *= weights.generic_name_penalty;
        }
        if depth <= weights.shallow_depth {
            multiplier *= weights.shallow_boost;
        } else if depth >= weights.deep_depth {
            multiplier *= weights.deep_penalty;
        }

        let (score, positions) = match (basename_view, path_view) {
            (Some(b), Some(p)) => {
                if b.weighted >= p.weighted {
                    (b.weighted, basename_positions(candidate, &b.indices))
                } else {
                    (p.weighted, path_positions(rel, &p.indices))
                }
            }
            (Some(b), None) => (b.weighted, basename_positions(candidate, &b.indices)),
            (None, Some(p)) => (p.weighted, path_positions(rel, &p.indices)),
            (None, None) => return None,
        };

        Some(ScoredCandidate {
            candidate: candidate.clone(),
            score: score * multiplier,
            positions: Some(positions),
        })
    }

    /// Raw nucleo score for one target string, scaled by `weight`.
    fn score_view(&mut self, target: &str, pattern: &Pattern, weight: f64) -> Option<ViewScore> {
        self.haystack_buf.clear();
        self.indices_buf.clear();
        let haystack = Utf32Str::new(target, &mut self.haystack_buf);
        let raw = pattern.indices(haystack, &mut self.matcher, &mut self.indices_buf)?;
        let mut indices = self.indices_buf.clone();
        indices.sort_unstable();
        indices.dedup();
        Some(ViewScore {
            weighted: f64::from(raw) * weight,
            indices,
        })
    }
}

/// Case-insensitive ordered-subsequence test: every query character appears
/// in `target` in order, not necessarily contiguous.
pub fn is_subsequence(query: &str, target: &str) -> bool {
    let mut query_chars = query
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase);
    let Some(mut want) = query_chars.next() else {
        return true;
    };
    for tc in target.chars().flat_map(char::to_lowercase) {
        if tc == want {
            match query_chars.next() {
                Some(next) => want = next,
                None => return true,
            }
        }
    }
    false
}

/// Whether any segment is a well-known library/vendor directory.
fn is_library_path(candidate: &CandidatePath) -> bool {
    candidate
        .rel
        .segments()
        .take(candidate.rel.depth().saturating_sub(1))
        .any(|seg| LIBRARY_DIR_NAMES.contains(&seg))
}

/// Whether the basename's stem is a catch-all name.
fn is_generic_basename(basename: &str) -> bool {
    let stem = std::path::Path::new(basename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(basename);
    let stem = stem.to_lowercase();
    GENERIC_STEMS.contains(&stem.as_str())
}

/// Map basename-view char indices to byte offsets in the relative path.
fn basename_positions(candidate: &CandidatePath, indices: &[u32]) -> Vec<u32> {
    let rel = candidate.rel.as_str();
    let base_start = rel.len() - candidate.basename.len();
    char_to_byte_offsets(&candidate.basename, indices)
        .into_iter()
        .map(|b| b + base_start as u32)
        .collect()
}

/// Map path-view char indices to byte offsets in the relative path.
fn path_positions(rel: &str, indices: &[u32]) -> Vec<u32> {
    char_to_byte_offsets(rel, indices)
}

fn char_to_byte_offsets(s: &str, char_indices: &[u32]) -> Vec<u32> {
    let byte_of_char: Vec<u32> = s.char_indices().map(|(b, _)| b as u32).collect();
    char_indices
        .iter()
        .filter_map(|&ci| byte_of_char.get(ci as usize).copied())
        .collect()
}
