//! JSON file quote store
//!
//! Quotes live in a single document of the form `{"records": [...]}`. Every
//! operation reads the document from disk; mutations hold an async lock for
//! the whole read-modify-write cycle and commit by writing a sibling temp
//! file and renaming it over the data file.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{next_id, QuoteStore};
use crate::types::{NewQuote, Quote, QuoteId};
use crate::{Result, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Records {
    #[serde(default)]
    records: Vec<Quote>,
}

/// Store persisted as a JSON document on the local filesystem
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`.
    ///
    /// A missing file is an empty store; the file is created on the first
    /// write. An existing file must parse.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = JsonFileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        let records = store.load().await?;
        debug!(
            "Opened quote file {} with {} records",
            store.path.display(),
            records.records.len()
        );
        Ok(store)
    }

    /// Location of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Records> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Records::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Records::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, records: &Records) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for JsonFileStore {
    async fn list_quotes(&self) -> Result<Vec<Quote>> {
        let mut records = self.load().await?.records;
        records.sort_by_key(|q| q.id);
        Ok(records)
    }

    async fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>> {
        let records = self.load().await?;
        Ok(records.records.into_iter().find(|q| q.id == id))
    }

    #[instrument(skip(self, new_quote), fields(path = %self.path.display()))]
    async fn create_quote(&self, new_quote: NewQuote) -> Result<Quote> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let quote = new_quote.with_id(next_id(&records.records)?);
        records.records.push(quote.clone());
        self.save(&records).await?;
        Ok(quote)
    }

    #[instrument(skip(self, quote), fields(id = %quote.id))]
    async fn update_quote(&self, quote: &Quote) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let existing = records
            .records
            .iter_mut()
            .find(|q| q.id == quote.id)
            .ok_or(StoreError::NotFound(quote.id))?;
        *existing = quote.clone();
        self.save(&records).await
    }

    #[instrument(skip(self))]
    async fn delete_quote(&self, id: QuoteId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let before = records.records.len();
        records.records.retain(|q| q.id != id);
        if records.records.len() == before {
            return Ok(());
        }
        self.save(&records).await
    }

    async fn random_quote(&self) -> Result<Option<Quote>> {
        let records = self.load().await?;
        Ok(records.records.choose(&mut rand::rng()).cloned())
    }
}
