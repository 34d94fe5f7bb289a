use std::time::Duration;

/// Timing and paging of the incremental search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query is sent
    pub debounce: Duration,
    /// Rows per page; a shorter page ends the session's results
    pub page_size: u32,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            page_size: 20,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}
