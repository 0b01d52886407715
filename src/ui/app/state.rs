/// Results list navigation state.
#[derive(Debug, Default)]
pub struct ResultsState {
    /// Currently selected index into the results.
    pub selected: usize,
    /// Scroll offset (first visible result).
    pub scroll: usize,
}

/// UI mode and message state.
#[derive(Debug, Default)]
pub struct UiState {
    /// Error message.
    pub error: Option<String>,
    /// Status message.
    pub status: Option<String>,
    /// Dirty flag for redraw.
    pub dirty: bool,
}
