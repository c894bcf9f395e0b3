//! Background question fetching.
//!
//! The keybinding dispatcher never awaits the network. It sends a
//! `FetchRequest` to this worker, which runs the provider call on its own
//! task and posts `AppEvent::QuestionsFetched` back to the event bus. The
//! state machine matches the result to the pending request id, so a result
//! that arrives after the user backed out is dropped there.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use trivia_core::machine::RequestId;
use trivia_core::provider::OpenTdbProvider;
use trivia_core::types::{Difficulty, Subject};
use trivia_core::QUESTIONS_PER_SESSION;

use crate::event::AppEvent;

/// One fetch to perform, tagged with the machine's request id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub request: RequestId,
    pub subject: Subject,
    pub difficulty: Difficulty,
}

/// Starts the worker and returns the sender the UI uses to queue fetches.
pub fn spawn_fetch_worker(
    provider: OpenTdbProvider,
    event_tx: UnboundedSender<AppEvent>,
) -> UnboundedSender<FetchRequest> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(fetch_worker_loop(provider, rx, event_tx));
    tx
}

/// Receives requests until every sender is dropped.
///
/// Each request gets its own task so a slow response to an abandoned request
/// does not hold up the next one.
pub async fn fetch_worker_loop(
    provider: OpenTdbProvider,
    mut rx: UnboundedReceiver<FetchRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    while let Some(job) = rx.recv().await {
        let provider = provider.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let result = provider
                .fetch(job.subject, job.difficulty, QUESTIONS_PER_SESSION)
                .await;
            if let Err(err) = &result {
                log::warn!("{}: {err}", job.request);
            }
            let _ = event_tx.send(AppEvent::QuestionsFetched { request: job.request, result });
        });
    }
}
