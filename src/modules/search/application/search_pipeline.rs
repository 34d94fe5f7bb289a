//! Debounced, paginated title search
//!
//! `SearchPipeline` owns one [`SearchSession`] and drives it from keystrokes
//! and remote responses. Each `set_query` restarts the debounce timer; when
//! it fires the first page is requested. Responses are applied through the
//! session's query gate, so out-of-order replies are dropped rather than
//! aborted in flight.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::modules::content::domain::{ContentSearchRepository, NavigationTarget};
use crate::modules::search::domain::{
    ApplyOutcome, FetchTicket, QueryChange, SearchConfig, SearchSession, SearchSnapshot,
};
use crate::shared::utils::LogContext;
use crate::{log_debug, log_error, log_warn};

/// Cloneable handle; clones share one session
#[derive(Clone)]
pub struct SearchPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    id: Uuid,
    repository: Arc<dyn ContentSearchRepository>,
    config: SearchConfig,
    session: Mutex<SearchSession>,
    /// Cancels the debounce timer of the latest `set_query`
    pending: Mutex<Option<CancellationToken>>,
    state: watch::Sender<SearchSnapshot>,
    shutdown: CancellationToken,
}

impl SearchPipeline {
    pub fn new(repository: Arc<dyn ContentSearchRepository>, config: SearchConfig) -> Self {
        let session = SearchSession::new(config.page_size);
        let (state, _) = watch::channel(session.snapshot());

        Self {
            inner: Arc::new(PipelineInner {
                id: Uuid::new_v4(),
                repository,
                config,
                session: Mutex::new(session),
                pending: Mutex::new(None),
                state,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Update the active query. Blank text clears results before returning and
    /// cancels any pending fetch; anything else (re)starts the debounce timer.
    pub async fn set_query(&self, text: &str) {
        // Held for the whole update so concurrent callers cannot leave an
        // older generation's timer as the survivor.
        let mut pending = self.inner.pending.lock().await;

        let change = {
            let mut session = self.inner.session.lock().await;
            let change = session.set_query(text);
            self.inner.publish(&session);
            change
        };

        if let Some(previous) = pending.take() {
            previous.cancel();
        }

        match change {
            QueryChange::Cleared => {
                debug!(pipeline = %self.inner.id, "query cleared");
            }
            QueryChange::Debounce { generation } => {
                let token = self.inner.shutdown.child_token();
                *pending = Some(token.clone());

                let inner = Arc::clone(&self.inner);
                let quiet = self.inner.config.debounce;
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(quiet) => {
                            inner.run_first_page(generation).await;
                        }
                    }
                });
            }
        }
    }

    /// Request the next page. Returns whether a fetch was started; `false`
    /// when one is already in flight or the last page was short.
    pub async fn load_more(&self) -> bool {
        let ticket = {
            let mut session = self.inner.session.lock().await;
            let ticket = session.begin_load_more();
            if ticket.is_some() {
                self.inner.publish(&session);
            }
            ticket
        };

        match ticket {
            Some(ticket) => {
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move { inner.execute(ticket).await });
                true
            }
            None => false,
        }
    }

    /// Resolve the result at `index` to its player route and reset the search
    pub async fn select(&self, index: usize) -> Option<NavigationTarget> {
        let target = self
            .inner
            .state
            .borrow()
            .results
            .get(index)
            .map(|result| result.navigation_target())?;

        self.set_query("").await;
        Some(target)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    /// Cancel any pending debounce; in-flight fetches finish but are still gated
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

impl PipelineInner {
    async fn run_first_page(&self, generation: u64) {
        let ticket = {
            let mut session = self.session.lock().await;
            let ticket = session.begin_first_page(generation);
            if ticket.is_some() {
                self.publish(&session);
            }
            ticket
        };

        if let Some(ticket) = ticket {
            self.execute(ticket).await;
        }
    }

    async fn execute(&self, ticket: FetchTicket) {
        LogContext::search_operation(&ticket.query, Some(ticket.page()), None);

        let response = self.repository.search_content(&ticket.request()).await;
        match &response {
            Err(e) if e.is_transient() => log_warn!(
                "Search for '{}' page {} failed: {}",
                ticket.query,
                ticket.page(),
                e
            ),
            Err(e) => log_error!(
                "Search for '{}' page {} rejected: {}",
                ticket.query,
                ticket.page(),
                e
            ),
            Ok(_) => {}
        }

        let mut session = self.session.lock().await;
        match session.apply(&ticket, response) {
            ApplyOutcome::Discarded => {
                log_debug!(
                    "Discarding stale response for '{}' (now '{}')",
                    ticket.query,
                    session.query()
                );
            }
            ApplyOutcome::Applied { rows } => {
                LogContext::search_operation(&ticket.query, Some(ticket.page()), Some(rows));
                self.publish(&session);
            }
            ApplyOutcome::Failed => {
                self.publish(&session);
            }
        }
    }

    fn publish(&self, session: &SearchSession) {
        self.state.send_replace(session.snapshot());
    }
}
