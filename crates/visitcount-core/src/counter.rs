//! Counter row model.
//!
//! A row is a flat attribute map keyed by the `id` attribute. Values are
//! typed the way key-value tables type them on the wire: `{"N": 5}` for
//! numbers, `{"S": "global"}` for strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VisitCountError};

/// Key attribute name.
pub const KEY_ATTR: &str = "id";
/// Key of the single visitor-count row.
pub const GLOBAL_KEY: &str = "global";
/// Attribute holding the count.
pub const COUNT_ATTR: &str = "cnt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    N(u64),
    S(String),
}

impl AttrValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::N(_) => "N",
            AttrValue::S(_) => "S",
        }
    }
}

/// Attributes of one row (or the subset returned by an update).
pub type Attributes = BTreeMap<String, AttrValue>;

/// Fresh row holding only its key.
pub fn new_row(key: &str) -> Attributes {
    let mut row = Attributes::new();
    row.insert(KEY_ATTR.to_string(), AttrValue::S(key.to_string()));
    row
}

/// `ADD attr :delta` semantics: an absent attribute starts at zero.
///
/// Returns the attributes touched by the update (`UPDATED_NEW`). The row is
/// left untouched on error.
pub fn apply_add(row: &mut Attributes, attr: &str, delta: u64) -> Result<Attributes> {
    if attr == KEY_ATTR {
        return Err(VisitCountError::Internal(format!(
            "key attribute {KEY_ATTR} cannot be updated"
        )));
    }

    let current = match row.get(attr) {
        None => 0,
        Some(AttrValue::N(n)) => *n,
        Some(other) => {
            return Err(VisitCountError::MalformedRecord(format!(
                "attribute {attr} has type {}, ADD requires N",
                other.type_name()
            )))
        }
    };

    let next = current.checked_add(delta).ok_or_else(|| {
        VisitCountError::MalformedRecord(format!("attribute {attr} would overflow"))
    })?;

    row.insert(attr.to_string(), AttrValue::N(next));

    let mut updated = Attributes::new();
    updated.insert(attr.to_string(), AttrValue::N(next));
    Ok(updated)
}

/// Pull the count out of a store response. Never defaults.
pub fn extract_count(attrs: &Attributes, attr: &str) -> Result<u64> {
    match attrs.get(attr) {
        Some(AttrValue::N(n)) => Ok(*n),
        Some(other) => Err(VisitCountError::MalformedRecord(format!(
            "attribute {attr} has type {}, expected N",
            other.type_name()
        ))),
        None => Err(VisitCountError::MalformedRecord(format!(
            "store response is missing attribute {attr}"
        ))),
    }
}
