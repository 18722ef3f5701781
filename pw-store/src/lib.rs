//! Persistent stores for drawn parcels and analysis history.
//!
//! Both stores sit on top of a [`KeyValueStore`] and keep their whole
//! collection under a single key as a JSON array:
//!
//! - `@savedPolygons` - committed [`Polygon`](pw_core::Polygon)s, oldest first
//! - `@analysisHistory` - [`HistoryItem`](pw_core::HistoryItem)s, newest first
//!
//! Records are read once by `load()` and rewritten wholesale on every change.
//! Until `load()` has succeeded a store never writes, so an unloaded
//! in-memory collection cannot overwrite what is on disk.
//!
//! # Usage
//!
//! ```rust
//! use pw_core::Point;
//! use pw_store::{MemoryStore, PolygonStore};
//! use std::rc::Rc;
//!
//! let kv = Rc::new(MemoryStore::new());
//! let mut polygons = PolygonStore::open(kv);
//! polygons.add_point(Point::new(0.0, 0.0));
//! polygons.add_point(Point::new(0.0, 1.0));
//! polygons.add_point(Point::new(1.0, 1.0));
//! let saved = polygons.save().unwrap();
//! assert_eq!(saved.name, "Land Area 1");
//! ```

pub mod history;
pub mod kv;
pub mod polygons;
mod record;
pub mod schema;

pub use history::HistoryStore;
pub use kv::{KeyValueStore, MemoryStore, PersistenceError, SqliteStore};
pub use polygons::{DrawState, PolygonStore, SaveError};

/// Key of the saved-polygon record.
pub const SAVED_POLYGONS_KEY: &str = "@savedPolygons";
/// Key of the analysis history record.
pub const ANALYSIS_HISTORY_KEY: &str = "@analysisHistory";
