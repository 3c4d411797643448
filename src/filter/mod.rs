//! Path identifiers to store filters.
//!
//! An empty `Document` is the match-everything filter.

pub mod error;

use bson::{doc, oid::ObjectId, Document};
use tracing::debug;

pub use error::FilterError;

/// How a malformed object id in a path is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Fall back to the match-everything filter
    Lenient,
    /// Reject with `FilterError::InvalidObjectId`
    Strict,
}

impl IdPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            IdPolicy::Strict
        } else {
            IdPolicy::Lenient
        }
    }
}

/// Filter on `_id` for an optional hex object id.
pub fn object_id_filter(raw: Option<&str>, policy: IdPolicy) -> Result<Document, FilterError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Document::new()),
    };

    match ObjectId::parse_str(raw) {
        Ok(id) => Ok(doc! { "_id": id }),
        Err(_) if policy == IdPolicy::Strict => Err(FilterError::InvalidObjectId(raw.to_string())),
        Err(_) => {
            debug!("Ignoring malformed object id '{}', matching all documents", raw);
            Ok(Document::new())
        }
    }
}

/// Raw string equality on `field`; no object id parsing.
pub fn field_equals(field: &str, raw: &str) -> Document {
    if raw.is_empty() {
        return Document::new();
    }
    let mut filter = Document::new();
    filter.insert(field, raw);
    filter
}
