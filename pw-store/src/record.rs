//! JSON encoding of whole-collection records.

use crate::kv::{KeyValueStore, PersistenceError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a JSON array record; a missing key is an empty collection.
pub(crate) fn read_list<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, PersistenceError> {
    match kv.get(key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

pub(crate) fn write_list<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(items)?;
    kv.set(key, &json)
}
