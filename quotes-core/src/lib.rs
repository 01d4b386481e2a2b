//! Quotes Core - data model and record stores for the Quote API
//!
//! This crate owns the `Quote` entity, the validation applied to incoming
//! quote payloads, and the asynchronous [`QuoteStore`] abstraction together
//! with its in-memory and JSON-file implementations.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::{open_store, JsonFileStore, MemoryStore, QuoteStore, StoreConfig};
pub use types::{NewQuote, Quote, QuoteId};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
