//! Candidate enumeration.

use ignore::WalkBuilder;

use super::exclude::ExclusionFilter;
use super::path::{CandidatePath, WorkspaceRoot};

/// Source of the candidate set the ranking engine scores over.
///
/// The ranking core never crawls the filesystem itself; it consumes whatever
/// a source produces.
pub trait CandidateSource {
    /// Enumerate all candidates under the given exclusion rules.
    fn enumerate(&self, filter: &ExclusionFilter) -> Vec<CandidatePath>;
}

impl CandidateSource for WorkspaceWalker {
    fn enumerate(&self, filter: &ExclusionFilter) -> Vec<CandidatePath> {
        WorkspaceWalker::enumerate(self, filter)
    }
}

/// Gitignore-aware workspace walker.
///
/// Excluded directories are pruned during the walk so large dependency trees
/// are never descended into, rather than filtered afterwards.
pub struct WorkspaceWalker {
    root: WorkspaceRoot,
}

impl WorkspaceWalker {
    /// Create a walker over a workspace.
    pub fn new(root: WorkspaceRoot) -> Self {
        Self { root }
    }

    /// Enumerate candidates with the given exclusion rules.
    ///
    /// Unreadable entries are skipped silently: a vanished file must never
    /// abort the whole pass.
    #[must_use]
    pub fn enumerate(&self, filter: &ExclusionFilter) -> Vec<CandidatePath> {
        let mut out = Vec::new();
        let walk = WalkBuilder::new(self.root.path())
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .filter_entry({
                let dir_prune = filter.dir_name_set();
                move |entry| {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if !is_dir {
                        return true;
                    }
                    entry
                        .file_name()
                        .to_str()
                        .map(|name| !dir_prune.contains(name))
                        .unwrap_or(true)
                }
            })
            .build();

        for entry in walk {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(candidate) = CandidatePath::new(&self.root, entry.into_path()) else {
                continue;
            };
            // Glob exclusions cannot be pruned at directory level.
            if filter.is_excluded(&candidate.rel) {
                continue;
            }
            out.push(candidate);
        }

        out.sort_by(|a, b| a.rel.cmp(&b.rel));
        out
    }
}
