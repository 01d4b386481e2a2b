//! In-memory quote store

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::seq::IteratorRandom;
use std::collections::BTreeMap;
use tracing::instrument;

use super::{next_id, QuoteStore};
use crate::types::{NewQuote, Quote, QuoteId};
use crate::{Result, StoreError};

/// Volatile store backed by an ordered map
#[derive(Default)]
pub struct MemoryStore {
    quotes: RwLock<BTreeMap<QuoteId, Quote>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `quotes`
    pub fn with_quotes(quotes: impl IntoIterator<Item = Quote>) -> Self {
        let quotes = quotes.into_iter().map(|q| (q.id, q)).collect();
        MemoryStore {
            quotes: RwLock::new(quotes),
        }
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn list_quotes(&self) -> Result<Vec<Quote>> {
        Ok(self.quotes.read().values().cloned().collect())
    }

    async fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>> {
        Ok(self.quotes.read().get(&id).cloned())
    }

    #[instrument(skip(self, new_quote))]
    async fn create_quote(&self, new_quote: NewQuote) -> Result<Quote> {
        let mut quotes = self.quotes.write();
        let quote = new_quote.with_id(next_id(quotes.values())?);
        quotes.insert(quote.id, quote.clone());
        Ok(quote)
    }

    #[instrument(skip(self, quote), fields(id = %quote.id))]
    async fn update_quote(&self, quote: &Quote) -> Result<()> {
        match self.quotes.write().get_mut(&quote.id) {
            Some(existing) => {
                *existing = quote.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(quote.id)),
        }
    }

    #[instrument(skip(self))]
    async fn delete_quote(&self, id: QuoteId) -> Result<()> {
        self.quotes.write().remove(&id);
        Ok(())
    }

    async fn random_quote(&self) -> Result<Option<Quote>> {
        let quotes = self.quotes.read();
        Ok(quotes.values().choose(&mut rand::rng()).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.quotes.read().len())
    }
}
