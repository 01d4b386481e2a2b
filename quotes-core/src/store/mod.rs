//! Record store abstraction
//!
//! Handlers talk to quotes only through [`QuoteStore`]. Concurrency safety is
//! the responsibility of each implementation.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::types::{NewQuote, Quote, QuoteId};
use crate::{Result, StoreError};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Asynchronous CRUD store over quotes
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// All quotes in ascending id order
    async fn list_quotes(&self) -> Result<Vec<Quote>>;

    /// A single quote, if it exists
    async fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>>;

    /// Persist a new quote and return it with its assigned id
    async fn create_quote(&self, new_quote: NewQuote) -> Result<Quote>;

    /// Overwrite an existing quote. Fails with `NotFound` if the id is gone.
    async fn update_quote(&self, quote: &Quote) -> Result<()>;

    /// Remove a quote. Removing an absent id is a no-op.
    async fn delete_quote(&self, id: QuoteId) -> Result<()>;

    /// A uniformly chosen quote, or `None` when the store is empty
    async fn random_quote(&self) -> Result<Option<Quote>>;

    /// Number of stored quotes
    async fn count(&self) -> Result<usize> {
        Ok(self.list_quotes().await?.len())
    }
}

/// Store backend selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Volatile in-process store
    Memory,
    /// JSON document on the local filesystem
    JsonFile {
        /// Path of the data file
        path: PathBuf,
    },
}

/// Create a store from config
pub async fn open_store(config: StoreConfig) -> Result<Arc<dyn QuoteStore>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::JsonFile { path } => {
            let store = JsonFileStore::open(path).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Next id after the highest one in `quotes`
pub(crate) fn next_id<'a>(quotes: impl IntoIterator<Item = &'a Quote>) -> Result<QuoteId> {
    match quotes.into_iter().map(|q| q.id).max() {
        Some(max) => max.next().ok_or(StoreError::IdSpaceExhausted),
        None => Ok(QuoteId::new(1)),
    }
}
