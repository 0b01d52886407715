//! Terminal host: document views and decorations for the picker.

use crate::core::{
    ActiveFileSnapshot, CandidatePath, DecorationSink, DocumentHost, HostError, RelPath,
    TextBuffer, ViewHandle,
};

/// The preview pane's current content.
#[derive(Debug, Clone)]
pub struct PreviewPane {
    /// Path being previewed.
    pub rel: RelPath,
    /// Loaded file content.
    pub buffer: TextBuffer,
    /// View handle the session controller decorates.
    pub handle: ViewHandle,
    /// Highlighted line, if any.
    pub highlight: Option<u32>,
}

/// Host implementation backing the TUI.
///
/// "Preview" opens load the file into the preview pane; a "committed" open is
/// deferred: it is recorded here and executed (external editor launch) by the
/// main loop after the terminal is restored.
#[derive(Debug, Default)]
pub struct TuiHost {
    next_handle: u64,
    /// Current preview pane content.
    pub preview: Option<PreviewPane>,
    /// The document considered active (restored on cancel).
    active: Option<ActiveFileSnapshot>,
    pending_open: Option<(CandidatePath, u32, u32)>,
}

impl TuiHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the deferred committed open, if an accept happened.
    pub fn take_pending_open(&mut self) -> Option<(CandidatePath, u32, u32)> {
        self.pending_open.take()
    }

    fn load(&mut self, rel: &RelPath, abs: &std::path::Path) -> Result<ViewHandle, HostError> {
        let buffer =
            TextBuffer::from_file(abs).ok_or_else(|| HostError::Missing(abs.to_path_buf()))?;
        self.next_handle += 1;
        let handle = ViewHandle(self.next_handle);
        self.preview = Some(PreviewPane {
            rel: rel.clone(),
            buffer,
            handle,
            highlight: None,
        });
        Ok(handle)
    }
}

impl DocumentHost for TuiHost {
    fn active_file(&self) -> Option<ActiveFileSnapshot> {
        self.active.clone()
    }

    fn open_preview(
        &mut self,
        candidate: &CandidatePath,
        _line: u32,
        _col: u32,
    ) -> Result<ViewHandle, HostError> {
        self.load(&candidate.rel, &candidate.abs)
    }

    fn open_committed(
        &mut self,
        candidate: &CandidatePath,
        line: u32,
        col: u32,
    ) -> Result<ViewHandle, HostError> {
        self.pending_open = Some((candidate.clone(), line, col));
        self.active = Some(ActiveFileSnapshot {
            rel: candidate.rel.clone(),
            abs: candidate.abs.clone(),
            line,
            col,
        });
        self.next_handle += 1;
        Ok(ViewHandle(self.next_handle))
    }

    fn restore(&mut self, snapshot: &ActiveFileSnapshot) -> Result<(), HostError> {
        self.load(&snapshot.rel, &snapshot.abs)?;
        if let Some(pane) = &mut self.preview {
            pane.highlight = Some(snapshot.line);
        }
        self.active = Some(snapshot.clone());
        Ok(())
    }
}

impl DecorationSink for TuiHost {
    fn highlight_line(&mut self, handle: ViewHandle, line: u32) {
        if let Some(pane) = &mut self.preview {
            if pane.handle == handle {
                pane.highlight = Some(line);
            }
        }
    }

    fn clear_highlights(&mut self, handle: ViewHandle) {
        if let Some(pane) = &mut self.preview {
            if pane.handle == handle {
                pane.highlight = None;
            }
        }
    }
}
