//! Newest-first record of past analyses.

use crate::kv::{KeyValueStore, PersistenceError};
use crate::record;
use crate::ANALYSIS_HISTORY_KEY;
use pw_core::HistoryItem;
use std::cell::RefCell;
use std::rc::Rc;

struct HistoryState {
    items: Vec<HistoryItem>,
    loaded: bool,
}

/// Append-only analysis history.
///
/// This struct is cheaply cloneable (via `Rc`); the analysis engine appends
/// through one handle while the interaction surface reads through another.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Rc<dyn KeyValueStore>,
    state: Rc<RefCell<HistoryState>>,
}

impl HistoryStore {
    pub fn new(kv: Rc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            state: Rc::new(RefCell::new(HistoryState {
                items: Vec::new(),
                loaded: false,
            })),
        }
    }

    /// Create a store and load the history, logging a failed load.
    pub fn open(kv: Rc<dyn KeyValueStore>) -> Self {
        let store = Self::new(kv);
        if let Err(e) = store.load() {
            log::warn!("Error loading analysis history: {}", e);
        }
        store
    }

    pub fn load(&self) -> Result<(), PersistenceError> {
        let items: Vec<HistoryItem> = record::read_list(self.kv.as_ref(), ANALYSIS_HISTORY_KEY)?;
        log::info!("history: loaded {} entries", items.len());
        let mut state = self.state.borrow_mut();
        state.items = items;
        state.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    /// Snapshot of the history, newest first.
    pub fn items(&self) -> Vec<HistoryItem> {
        self.state.borrow().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `item` at the front and rewrite the record.
    ///
    /// The in-memory history keeps the item even when the write fails.
    pub fn append(&self, item: HistoryItem) -> Result<(), PersistenceError> {
        let mut state = self.state.borrow_mut();
        state.items.insert(0, item);
        if !state.loaded {
            log::debug!("history: skipping write before load");
            return Err(PersistenceError::NotLoaded(ANALYSIS_HISTORY_KEY));
        }
        record::write_list(self.kv.as_ref(), ANALYSIS_HISTORY_KEY, &state.items).map_err(|e| {
            log::warn!("Error saving analysis history: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryStore, SqliteStore};
    use chrono::{TimeZone, Utc};
    use pw_core::ChangeStatus;

    fn item(id: &str, location: &str) -> HistoryItem {
        HistoryItem {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            location: location.to_string(),
            ndvi_difference: -0.0625,
            image_url: format!("https://example.test/{id}.png"),
            status: ChangeStatus::NoChange,
        }
    }

    #[test]
    fn append_is_newest_first() {
        let history = HistoryStore::open(Rc::new(MemoryStore::new()));
        history.append(item("1", "Land Area 1")).unwrap();
        history.append(item("2", "Land Area 1")).unwrap();
        history.append(item("3", "Area 3")).unwrap();

        let ids: Vec<String> = history.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn clones_share_history() {
        let history = HistoryStore::open(Rc::new(MemoryStore::new()));
        let view = history.clone();
        history.append(item("1", "Land Area 1")).unwrap();
        assert_eq!(view.len(), 1);
        assert!(!view.is_empty());
    }

    #[test]
    fn history_survives_restart() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let history = HistoryStore::open(Rc::new(kv.clone()));
        history.append(item("1", "Land Area 1")).unwrap();
        history.append(item("2", "Area 2")).unwrap();

        let reopened = HistoryStore::open(Rc::new(kv));
        assert_eq!(reopened.items(), history.items());
    }

    #[test]
    fn ndvi_values_reload_bit_exact() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        let kv = MemoryStore::new();
        let history = HistoryStore::open(Rc::new(kv.clone()));
        let mut values = vec![-0.1234567891234, 0.1, -0.45, 0.15];
        values.extend((0..500).map(|_| rng.gen_range(-1.0..=1.0)));
        for (n, value) in values.iter().enumerate() {
            let mut entry = item(&n.to_string(), "Land Area 1");
            entry.ndvi_difference = *value;
            history.append(entry).unwrap();
        }

        let reopened = HistoryStore::open(Rc::new(kv));
        let reloaded: Vec<u64> = reopened
            .items()
            .iter()
            .rev()
            .map(|i| i.ndvi_difference.to_bits())
            .collect();
        let expected: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(reloaded, expected);
    }

    #[test]
    fn unloaded_history_keeps_items_in_memory() {
        let kv = MemoryStore::new();
        kv.set(ANALYSIS_HISTORY_KEY, "{broken").unwrap();
        let history = HistoryStore::open(Rc::new(kv.clone()));
        assert!(!history.is_loaded());

        let err = history.append(item("1", "Land Area 1")).unwrap_err();
        assert!(matches!(err, PersistenceError::NotLoaded(_)));
        assert_eq!(history.len(), 1);
        assert_eq!(kv.get(ANALYSIS_HISTORY_KEY).unwrap().as_deref(), Some("{broken"));
    }
}
