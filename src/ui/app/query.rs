use std::sync::Arc;

use super::super::worker::RankRequest;
use super::App;
use crate::core::ScoredCandidate;

impl App {
    /// Append a character to the query and restart ranking.
    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.request_rank();
        self.ui.dirty = true;
    }

    /// Delete the last query character.
    pub fn backspace_query(&mut self) {
        if self.query.pop().is_some() {
            self.request_rank();
            self.ui.dirty = true;
        }
    }

    /// Clear the whole query.
    pub fn clear_query(&mut self) {
        if !self.query.is_empty() {
            self.query.clear();
            self.request_rank();
            self.ui.dirty = true;
        }
    }

    /// Send the current query to the rank worker.
    ///
    /// Each request gets a fresh id; only the response matching the latest id
    /// is ever applied, so a reply for a superseded query cannot overwrite
    /// newer results.
    pub(crate) fn request_rank(&mut self) {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request_id = Some(id);

        let request = RankRequest {
            id,
            query: self.query.clone(),
            candidates: Arc::clone(&self.candidates),
            config: self.config.clone(),
        };
        if self.worker.request_tx.send(request).is_err() {
            self.ui.error = Some("ranking worker unavailable".to_string());
        }
    }

    /// Install fresh results and preview the top candidate.
    pub(crate) fn apply_results(&mut self, results: Vec<ScoredCandidate>) {
        self.results = results;
        self.list.selected = 0;
        self.list.scroll = 0;
        self.preview_selected();
        self.ui.dirty = true;
    }

    /// Block until the pending rank response arrives and apply it.
    ///
    /// Test-only convenience: the interactive loop uses `poll_worker`.
    #[doc(hidden)]
    pub fn wait_for_results(&mut self) {
        let Some(pending) = self.pending_request_id else {
            return;
        };
        while let Ok(response) = self.worker.response_rx.recv() {
            if response.id == pending {
                self.pending_request_id = None;
                self.apply_results(response.results);
                return;
            }
        }
    }
}
