//! Application state

use quotes_core::QuoteStore;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The record store every quote route talks to
    pub store: Arc<dyn QuoteStore>,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
