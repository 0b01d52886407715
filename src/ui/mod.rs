//! Terminal UI for quickjump.

mod app;
mod input;
mod render;
mod worker;

pub use app::{launch_editor, App, PreviewPane, ResultsState, TuiHost, UiState};
pub use input::handle_input;
pub use render::render;
