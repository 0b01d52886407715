//! Common re-exports for convenient importing.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickjump::prelude::*;
//! ```

pub use crate::core::{
    CandidatePath, ExclusionFilter, HistoryEntry, HistoryStore, PickerConfig, PickerMode, Ranker,
    RelPath, ScoredCandidate, SessionController, WorkspaceRoot, WorkspaceWalker,
};
