//! Workspace discovery and path newtypes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from workspace operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkspaceError {
    /// Path does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    /// I/O error while resolving the workspace.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error when constructing a RelPath with an absolute path.
#[derive(Debug, Clone, thiserror::Error)]
#[error("path must be relative, got: {0}")]
pub struct InvalidRelPath(pub String);

/// Canonicalized path to the workspace root all candidates are relative to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceRoot(PathBuf);

impl WorkspaceRoot {
    /// Open a workspace rooted at the given directory.
    ///
    /// Canonicalizes the path so relative-path stripping is stable regardless
    /// of how the directory was spelled on the command line.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use quickjump::core::WorkspaceRoot;
    /// use std::path::Path;
    ///
    /// let root = WorkspaceRoot::open(Path::new(".")).expect("not a directory");
    /// println!("Workspace at: {}", root.path().display());
    /// ```
    #[must_use = "this returns a Result that should be checked"]
    pub fn open(path: &Path) -> Result<Self, WorkspaceError> {
        let canonical = path
            .canonicalize()
            .map_err(|_| WorkspaceError::NotADirectory(path.to_path_buf()))?;
        if !canonical.is_dir() {
            return Err(WorkspaceError::NotADirectory(canonical));
        }
        Ok(Self(canonical))
    }

    /// Get the workspace root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Get the workspace root as a string (for persistence keys).
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or("")
    }

    /// Normalize an absolute path into a workspace-relative [`RelPath`].
    ///
    /// Strips the root prefix and replaces platform separators with `/`.
    /// Case is left untouched; matching is case-insensitive at the ranking
    /// layer, not here. Returns `None` when the path lies outside the
    /// workspace.
    #[must_use]
    pub fn normalize(&self, path: &Path) -> Option<RelPath> {
        let rel = path.strip_prefix(&self.0).ok()?;
        let mut out = String::new();
        for component in rel.components() {
            if let std::path::Component::Normal(name) = component {
                if !out.is_empty() {
                    out.push('/');
                }
                out.push_str(&name.to_string_lossy().replace('\\', "/"));
            }
        }
        if out.is_empty() {
            return None;
        }
        Some(RelPath(out))
    }
}

/// A workspace-relative path with `/` separators. Never absolute.
///
/// This is the ranking key: exclusion, scoring, and history dedup all operate
/// on the same normalized string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RelPath(String);

impl RelPath {
    /// Create a new RelPath from a string.
    ///
    /// Returns an error if the path is absolute (starts with `/`).
    ///
    /// # Examples
    ///
    /// ```
    /// use quickjump::core::RelPath;
    ///
    /// let path = RelPath::try_new("src/main.rs").unwrap();
    /// assert_eq!(path.as_str(), "src/main.rs");
    ///
    /// // Absolute paths are rejected
    /// assert!(RelPath::try_new("/absolute/path").is_err());
    /// ```
    #[must_use = "this returns a Result that should be checked"]
    pub fn try_new(path: impl Into<String>) -> Result<Self, InvalidRelPath> {
        let path = path.into();
        if path.starts_with('/') {
            return Err(InvalidRelPath(path));
        }
        Ok(Self(path.replace('\\', "/")))
    }

    /// Create a new RelPath without validation.
    ///
    /// # Safety (logical)
    /// Caller must ensure `path` is relative (does not start with `/`).
    /// Used for trusted input from the workspace walker.
    pub fn new_unchecked(path: impl Into<String>) -> Self {
        let path = path.into();
        debug_assert!(
            !path.starts_with('/'),
            "RelPath must not be absolute: {}",
            path
        );
        Self(path.replace('\\', "/"))
    }

    /// Convenience alias for `new_unchecked` — use when path is already normalized.
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self::new_unchecked(path)
    }

    /// Get the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to an absolute path given a workspace root.
    #[must_use]
    pub fn to_absolute(&self, root: &WorkspaceRoot) -> PathBuf {
        root.path().join(&self.0)
    }

    /// Get the file name (final segment).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Iterate over non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Count of non-empty path segments. `src/lib.rs` has depth 2.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An enumerated file candidate. Immutable; derived once per enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    /// Absolute on-disk path.
    pub abs: PathBuf,
    /// Workspace-relative, slash-normalized ranking key.
    pub rel: RelPath,
    /// Final path segment, cached for the basename scoring target.
    pub basename: String,
}

impl CandidatePath {
    /// Build a candidate from an absolute path inside the workspace.
    ///
    /// Returns `None` for paths outside the root (the walker should never
    /// produce these, but symlinks can escape).
    #[must_use]
    pub fn new(root: &WorkspaceRoot, abs: PathBuf) -> Option<Self> {
        let rel = root.normalize(&abs)?;
        let basename = rel.file_name().to_string();
        Some(Self { abs, rel, basename })
    }

    /// Build a candidate directly from a relative path (for tests and
    /// externally supplied candidate lists).
    #[must_use]
    pub fn from_rel(root: &WorkspaceRoot, rel: RelPath) -> Self {
        let abs = rel.to_absolute(root);
        let basename = rel.file_name().to_string();
        Self { abs, rel, basename }
    }
}
