//! Exclusion rules compiled from configuration.

use std::collections::HashSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::config::PickerConfig;
use super::path::RelPath;

/// Compiled exclusion matcher.
///
/// Compilation happens once per configuration change, not once per keystroke:
/// the app holds an instance and calls [`ExclusionFilter::rebuild_if_changed`]
/// when a new config snapshot arrives.
#[derive(Debug)]
pub struct ExclusionFilter {
    dir_names: HashSet<String>,
    globs: GlobSet,
    /// Fingerprint of the config fields the matcher was compiled from.
    source: (Vec<String>, Vec<String>),
}

impl ExclusionFilter {
    /// Compile the filter from a configuration snapshot.
    ///
    /// Malformed glob patterns fail open: they match nothing and are skipped
    /// with a warning, never abort compilation.
    #[must_use]
    pub fn compile(config: &PickerConfig) -> Self {
        let dir_names: HashSet<String> = config.excluded_dir_names.iter().cloned().collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &config.excluded_globs {
            // literal_separator makes `*` stop at `/` while `**` crosses it.
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    eprintln!("Warning: ignoring malformed exclude pattern {:?}: {}", pattern, e);
                }
            }
        }
        let globs = builder.build().unwrap_or_else(|e| {
            eprintln!("Warning: exclude patterns disabled: {}", e);
            GlobSet::empty()
        });

        Self {
            dir_names,
            globs,
            source: (
                config.excluded_dir_names.clone(),
                config.excluded_globs.clone(),
            ),
        }
    }

    /// Recompile only when the exclusion fields of `config` differ from the
    /// ones this matcher was built from. Returns whether a rebuild happened.
    pub fn rebuild_if_changed(&mut self, config: &PickerConfig) -> bool {
        if self.source.0 == config.excluded_dir_names && self.source.1 == config.excluded_globs {
            return false;
        }
        *self = Self::compile(config);
        true
    }

    /// Whether a path is excluded outright.
    #[must_use]
    pub fn is_excluded(&self, rel: &RelPath) -> bool {
        if rel.segments().any(|s| self.dir_names.contains(s)) {
            return true;
        }
        self.globs.is_match(rel.as_str())
    }

    /// Owned copy of the excluded directory names, for walk closures that
    /// cannot borrow the filter. Lets the walker prune whole subtrees.
    #[must_use]
    pub fn dir_name_set(&self) -> HashSet<String> {
        self.dir_names.clone()
    }

    /// Soft probe for the ranking engine: the path narrowly avoided a hard
    /// exclusion. Fires when a segment extends a configured excluded
    /// directory name across a separator (e.g. `node_modules_backup`,
    /// `old.vendor`). A bare substring is not enough: `.gitignore` must not
    /// count as a near miss of `.git`.
    #[must_use]
    pub fn is_near_exclusion(&self, rel: &RelPath) -> bool {
        rel.segments()
            .any(|seg| self.dir_names.iter().any(|name| near_miss(seg, name)))
    }
}

/// Whether `seg` is `name` plus a separator-delimited affix.
fn near_miss(seg: &str, name: &str) -> bool {
    if seg == name {
        return false;
    }
    if let Some(rest) = seg.strip_prefix(name) {
        if rest.starts_with(['-', '_', '.']) {
            return true;
        }
    }
    if let Some(rest) = seg.strip_suffix(name) {
        if rest.ends_with(['-', '_', '.']) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(dirs: &[&str], globs: &[&str]) -> ExclusionFilter {
        let config = PickerConfig {
            excluded_dir_names: dirs.iter().map(|s| s.to_string()).collect(),
            excluded_globs: globs.iter().map(|s| s.to_string()).collect(),
            ..PickerConfig::default()
        };
        ExclusionFilter::compile(&config)
    }

    #[test]
    fn segment_equality_excludes() {
        let f = filter(&["node_modules"], &[]);
        assert!(f.is_excluded(&RelPath::new("node_modules/lib/index.ts")));
        assert!(f.is_excluded(&RelPath::new("pkg/node_modules/x.js")));
        assert!(!f.is_excluded(&RelPath::new("src/node_modules.rs")));
    }

    #[test]
    fn single_star_does_not_cross_separators() {
        let f = filter(&[], &["*.log"]);
        assert!(f.is_excluded(&RelPath::new("debug.log")));
        assert!(!f.is_excluded(&RelPath::new("logs/debug.log")));
    }

    #[test]
    fn double_star_crosses_separators() {
        let f = filter(&[], &["**/*.log"]);
        assert!(f.is_excluded(&RelPath::new("logs/debug.log")));
        assert!(f.is_excluded(&RelPath::new("a/b/c/debug.log")));
    }

    #[test]
    fn malformed_pattern_fails_open() {
        let f = filter(&[], &["[invalid"]);
        assert!(!f.is_excluded(&RelPath::new("anything.rs")));
    }

    #[test]
    fn rebuild_only_on_change() {
        let config = PickerConfig::default();
        let mut f = ExclusionFilter::compile(&config);
        assert!(!f.rebuild_if_changed(&config));

        let mut changed = config.clone();
        changed.excluded_globs.push("**/*.tmp".to_string());
        assert!(f.rebuild_if_changed(&changed));
        assert!(f.is_excluded(&RelPath::new("a/b.tmp")));
    }

    #[test]
    fn near_exclusion_probe() {
        let f = filter(&["node_modules", "vendor", ".git"], &[]);
        assert!(f.is_near_exclusion(&RelPath::new("node_modules_backup/x.js")));
        assert!(f.is_near_exclusion(&RelPath::new("app/vendor_patched/y.rb")));
        assert!(f.is_near_exclusion(&RelPath::new("old.vendor/y.rb")));
        // Exact matches are hard exclusions, not near misses.
        assert!(!f.is_near_exclusion(&RelPath::new("vendor/y.rb")));
        assert!(!f.is_near_exclusion(&RelPath::new("src/main.rs")));
        // Plain substrings are unrelated names, not near misses.
        assert!(!f.is_near_exclusion(&RelPath::new("src/.gitignore")));
        assert!(!f.is_near_exclusion(&RelPath::new(".github/workflows/ci.yml")));
    }
}
