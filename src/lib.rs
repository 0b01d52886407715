//! quickjump - A fuzzy file jumper for the terminal.
//!
//! Type a partial, possibly out-of-order query and jump to the best-ranked
//! file, with a transient preview of the current candidate. Browsing never
//! pollutes the recent-files history; accepting a candidate does.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quickjump::prelude::*;
//!
//! let root = WorkspaceRoot::open(std::path::Path::new("."))?;
//! let config = PickerConfig::load();
//! let filter = ExclusionFilter::compile(&config);
//! let candidates = WorkspaceWalker::new(root).enumerate(&filter);
//! ```

#![deny(missing_docs)]

pub mod core;
pub mod metrics;
pub mod prelude;
pub mod ui;
