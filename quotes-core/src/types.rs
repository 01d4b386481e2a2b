//! Quote data model

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned quote identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(u64);

impl QuoteId {
    /// Wrap a raw identifier
    pub const fn new(id: u64) -> Self {
        QuoteId(id)
    }

    /// Raw identifier value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` at the end of the id space
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(QuoteId(id)),
            None => None,
        }
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u64>().map(QuoteId)
    }
}

/// A stored quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Identifier assigned at creation
    pub id: QuoteId,
    /// Quote text
    pub quote: String,
    /// Who said it
    pub author: String,
}

impl Quote {
    /// Overwrite the text fields, keeping the id
    pub fn apply(&mut self, update: NewQuote) {
        self.quote = update.quote;
        self.author = update.author;
    }
}

/// A quote payload that has passed the presence checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    /// Quote text
    pub quote: String,
    /// Who said it
    pub author: String,
}

impl NewQuote {
    /// Build a payload from possibly-missing fields.
    ///
    /// Both fields must be present and non-empty.
    pub fn from_parts(quote: Option<String>, author: Option<String>) -> Result<Self> {
        match (quote, author) {
            (Some(quote), Some(author)) if !quote.is_empty() && !author.is_empty() => {
                Ok(NewQuote { quote, author })
            }
            _ => Err(StoreError::InvalidQuote(
                "quote and author are required".to_string(),
            )),
        }
    }

    /// Attach an id, producing a stored quote
    pub fn with_id(self, id: QuoteId) -> Quote {
        Quote {
            id,
            quote: self.quote,
            author: self.author,
        }
    }
}
