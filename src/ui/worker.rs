//! Background worker for ranking candidates off the input thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::{CandidatePath, ExclusionFilter, PickerConfig, Ranker, ScoredCandidate};

#[derive(Debug, Clone)]
pub(crate) struct RankRequest {
    pub id: u64,
    pub query: String,
    /// Candidate snapshot in default (history-first) order.
    pub candidates: Arc<Vec<CandidatePath>>,
    pub config: PickerConfig,
}

#[derive(Debug)]
pub(crate) struct RankResponse {
    pub id: u64,
    pub results: Vec<ScoredCandidate>,
}

pub(crate) struct RankWorker {
    pub request_tx: Sender<RankRequest>,
    pub response_rx: Receiver<RankResponse>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RankWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankWorker")
            .field("request_tx", &self.request_tx)
            .field("response_rx", &self.response_rx)
            .field("handle", &self.handle.as_ref().map(|_| "..."))
            .finish()
    }
}

pub(crate) fn spawn_rank_worker() -> RankWorker {
    let (request_tx, request_rx) = mpsc::channel::<RankRequest>();
    let (response_tx, response_rx) = mpsc::channel::<RankResponse>();

    let handle = thread::spawn(move || worker_loop(request_rx, response_tx));

    RankWorker {
        request_tx,
        response_rx,
        handle: Some(handle),
    }
}

impl Drop for RankWorker {
    fn drop(&mut self) {
        // Close the request channel before joining, otherwise the worker
        // stays blocked in recv() and join() never returns.
        let (disconnected, _) = mpsc::channel();
        drop(std::mem::replace(&mut self.request_tx, disconnected));
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(request_rx: Receiver<RankRequest>, response_tx: Sender<RankResponse>) {
    let mut ranker = Ranker::new();
    let mut filter: Option<ExclusionFilter> = None;

    while let Ok(mut req) = request_rx.recv() {
        // Drain queued requests so rapid-fire queries coalesce to the newest.
        while let Ok(next) = request_rx.try_recv() {
            req = next;
        }

        // The compiled exclusion matcher is reused until the config changes.
        let filter = filter.get_or_insert_with(|| ExclusionFilter::compile(&req.config));
        filter.rebuild_if_changed(&req.config);

        let results = {
            let _timer = crate::metrics::Timer::start("rank_pass");
            ranker.rank(&req.candidates, &req.query, &req.config, filter)
        };

        let _ = response_tx.send(RankResponse { id: req.id, results });
    }
}
