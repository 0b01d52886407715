use super::App;
use crate::core::{ScoredCandidate, SessionEvent};

impl App {
    /// The currently selected result, if any.
    pub fn selected(&self) -> Option<&ScoredCandidate> {
        self.results.get(self.list.selected)
    }

    /// Move selection down in the results list.
    pub fn select_next(&mut self) {
        if self.list.selected + 1 < self.results.len() {
            self.list.selected += 1;
            self.preview_selected();
            self.ui.dirty = true;
        }
    }

    /// Move selection up in the results list.
    pub fn select_prev(&mut self) {
        if self.list.selected > 0 {
            self.list.selected -= 1;
            self.preview_selected();
            self.ui.dirty = true;
        }
    }

    /// Jump selection back to the top result.
    pub fn select_first(&mut self) {
        if self.list.selected != 0 {
            self.list.selected = 0;
            self.preview_selected();
            self.ui.dirty = true;
        }
    }

    /// Preview the selected candidate through the session controller.
    pub(crate) fn preview_selected(&mut self) {
        match self.results.get(self.list.selected) {
            Some(scored) => {
                let candidate = scored.candidate.clone();
                self.session_event(SessionEvent::ActiveChanged {
                    candidate: &candidate,
                });
            }
            None => {
                self.host.preview = None;
            }
        }
    }

    /// Accept the selected candidate: commit it to history and quit, leaving
    /// the committed open for the main loop to execute.
    pub fn accept_selected(&mut self) {
        let Some(scored) = self.results.get(self.list.selected) else {
            return;
        };
        let candidate = scored.candidate.clone();
        self.session_event(SessionEvent::Accepted {
            candidate: &candidate,
        });
        self.should_quit = true;
    }

    /// Dismiss the picker without accepting anything.
    pub fn cancel(&mut self) {
        self.session_event(SessionEvent::Cancelled);
        self.should_quit = true;
    }
}
