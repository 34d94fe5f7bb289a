//! Search session state machine
//!
//! All mutation goes through the transitions below. Every fetch carries a
//! [`FetchTicket`] describing the session it was issued for; a response is
//! applied only if the ticket still matches the live session, so a slow reply
//! to an older keystroke can never overwrite a newer query's results.

use serde::Serialize;

use crate::modules::content::domain::{SearchPage, SearchRequest, SearchResult};
use crate::shared::{application::PaginationParams, errors::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    /// No active query
    Idle,
    /// Waiting out the quiet period before the first page
    Debouncing,
    /// First page in flight
    Fetching,
    /// Page two or later in flight
    FetchingMore,
    /// Last response applied
    Settled,
}

/// Identifies the session and page a fetch belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub query: String,
    pub generation: u64,
    pub pagination: PaginationParams,
}

impl FetchTicket {
    pub fn request(&self) -> SearchRequest {
        SearchRequest::new(self.query.trim(), self.pagination)
    }

    pub fn page(&self) -> u32 {
        self.pagination.page
    }

    pub fn is_first_page(&self) -> bool {
        self.pagination.page == 1
    }
}

/// Result of `set_query`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    /// Blank input: results cleared, nothing to fetch
    Cleared,
    /// Debounce should (re)start for this generation
    Debounce { generation: u64 },
}

/// Result of applying a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { rows: usize },
    Failed,
    /// The ticket belongs to a superseded query
    Discarded,
}

/// Read-only view handed to consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub page: u32,
    pub results: Vec<SearchResult>,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub phase: SearchPhase,
    /// Set when the last request failed; `results` then reads as "no results"
    pub error: Option<String>,
}

impl SearchSnapshot {
    /// Whether the overlay should say "no results"
    pub fn shows_no_results(&self) -> bool {
        !self.query.trim().is_empty()
            && self.results.is_empty()
            && matches!(self.phase, SearchPhase::Settled)
    }
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    generation: u64,
    page: u32,
    page_size: u32,
    results: Vec<SearchResult>,
    has_more: bool,
    phase: SearchPhase,
    error: Option<String>,
}

impl SearchSession {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: String::new(),
            generation: 0,
            page: 1,
            page_size: page_size.max(1),
            results: Vec::new(),
            has_more: false,
            phase: SearchPhase::Idle,
            error: None,
        }
    }

    /// New input from the text box. Blank input clears synchronously.
    pub fn set_query(&mut self, text: &str) -> QueryChange {
        self.generation += 1;
        self.query = text.to_string();

        if text.trim().is_empty() {
            self.page = 1;
            self.results.clear();
            self.has_more = false;
            self.error = None;
            self.phase = SearchPhase::Idle;
            return QueryChange::Cleared;
        }

        self.phase = SearchPhase::Debouncing;
        QueryChange::Debounce {
            generation: self.generation,
        }
    }

    /// Debounce timer fired: reset the session and issue page one.
    /// `None` if the generation was superseded meanwhile.
    pub fn begin_first_page(&mut self, generation: u64) -> Option<FetchTicket> {
        if generation != self.generation || self.phase != SearchPhase::Debouncing {
            return None;
        }

        self.page = 1;
        self.results.clear();
        self.has_more = false;
        self.error = None;
        self.phase = SearchPhase::Fetching;

        Some(self.ticket(PaginationParams::new(1, self.page_size)))
    }

    /// Next page, unless something is in flight or the last page was short
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.phase != SearchPhase::Settled || !self.has_more {
            return None;
        }

        self.phase = SearchPhase::FetchingMore;
        let next = PaginationParams::new(self.page, self.page_size).next();
        Some(self.ticket(next))
    }

    /// Apply a response if `ticket` still belongs to the live session
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        response: Result<SearchPage, AppError>,
    ) -> ApplyOutcome {
        if !self.accepts(ticket) {
            return ApplyOutcome::Discarded;
        }

        self.phase = SearchPhase::Settled;
        match response {
            Ok(SearchPage { results, fetched }) => {
                let count = results.len();
                // Rows dropped on ingress still occupy their slot in the page
                self.has_more = ticket.pagination.is_full_page(fetched);
                if ticket.is_first_page() {
                    self.results = results;
                } else {
                    self.results.extend(results);
                }
                self.page = ticket.page();
                self.error = None;
                ApplyOutcome::Applied { rows: count }
            }
            Err(e) => {
                if ticket.is_first_page() {
                    self.results.clear();
                }
                self.has_more = false;
                self.error = Some(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    /// Query gate: same text and same generation as when the fetch started
    pub fn accepts(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.query == self.query
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            page: self.page,
            results: self.results.clone(),
            has_more: self.has_more,
            is_loading: self.phase == SearchPhase::Fetching,
            is_loading_more: self.phase == SearchPhase::FetchingMore,
            phase: self.phase,
            error: self.error.clone(),
        }
    }

    fn ticket(&self, pagination: PaginationParams) -> FetchTicket {
        FetchTicket {
            query: self.query.clone(),
            generation: self.generation,
            pagination,
        }
    }
}
