//! The in-progress polygon and the saved-polygon collection.

use crate::kv::{KeyValueStore, PersistenceError};
use crate::record;
use crate::SAVED_POLYGONS_KEY;
use chrono::Utc;
use pw_core::ids::IdGenerator;
use pw_core::polygon::MIN_POINTS;
use pw_core::{Point, Polygon, ValidationError};
use std::rc::Rc;
use thiserror::Error;

/// Drawing progress of the in-progress polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Empty,
    Drawing,
    Ready,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The polygon was added to the collection but could not be written.
    #[error("polygon {} saved in memory only: {source}", .polygon.id)]
    NotPersisted {
        polygon: Polygon,
        source: PersistenceError,
    },
}

/// Owns the polygon being drawn and the collection of saved polygons.
pub struct PolygonStore {
    kv: Rc<dyn KeyValueStore>,
    selected: Polygon,
    saved: Vec<Polygon>,
    loaded: bool,
    ids: IdGenerator,
}

impl PolygonStore {
    /// A store with nothing loaded yet. Call [`PolygonStore::load`] before
    /// expecting changes to be persisted.
    pub fn new(kv: Rc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            selected: Polygon::empty(),
            saved: Vec::new(),
            loaded: false,
            ids: IdGenerator::new(),
        }
    }

    /// Create a store and load the saved collection, logging a failed load.
    pub fn open(kv: Rc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(kv);
        if let Err(e) = store.load() {
            log::warn!("Error loading saved polygons: {}", e);
        }
        store
    }

    /// Read the saved collection from the key-value store.
    ///
    /// On failure the store stays unloaded and will not write, so an
    /// unreadable record is left as it was.
    pub fn load(&mut self) -> Result<(), PersistenceError> {
        let saved: Vec<Polygon> = record::read_list(self.kv.as_ref(), SAVED_POLYGONS_KEY)?;
        log::info!("polygons: loaded {} saved polygons", saved.len());
        self.saved = saved;
        self.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn selected(&self) -> &Polygon {
        &self.selected
    }

    pub fn saved(&self) -> &[Polygon] {
        &self.saved
    }

    pub fn draw_state(&self) -> DrawState {
        match self.selected.points.len() {
            0 => DrawState::Empty,
            n if n < MIN_POINTS => DrawState::Drawing,
            _ => DrawState::Ready,
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.selected.points.push(point);
    }

    pub fn remove_last_point(&mut self) {
        self.selected.points.pop();
    }

    pub fn clear(&mut self) {
        self.selected = Polygon::empty();
    }

    /// Commit the in-progress polygon to the saved collection.
    ///
    /// The saved polygon stays selected. With fewer than three points
    /// nothing changes.
    pub fn save(&mut self) -> Result<Polygon, SaveError> {
        self.selected.ensure_valid()?;
        let now = Utc::now();
        let polygon = Polygon {
            id: self.ids.next_id_at(now),
            name: format!("Land Area {}", self.saved.len() + 1),
            points: self.selected.points.clone(),
            created_at: Some(now),
        };
        self.saved.push(polygon.clone());
        self.selected = polygon.clone();
        log::info!(
            "polygons: saved {} ({}) with {} points",
            polygon.name,
            polygon.id,
            polygon.points.len()
        );
        match self.persist() {
            Ok(()) => Ok(polygon),
            Err(source) => Err(SaveError::NotPersisted { polygon, source }),
        }
    }

    /// Make a copy of the saved polygon at `index` the in-progress polygon.
    /// Out-of-range indices are ignored.
    pub fn select_saved(&mut self, index: usize) {
        if let Some(polygon) = self.saved.get(index) {
            self.selected = polygon.clone();
        }
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if !self.loaded {
            log::debug!("polygons: skipping write before load");
            return Err(PersistenceError::NotLoaded(SAVED_POLYGONS_KEY));
        }
        record::write_list(self.kv.as_ref(), SAVED_POLYGONS_KEY, &self.saved).map_err(|e| {
            log::warn!("Error saving polygons: {}", e);
            e
        })
    }
}
