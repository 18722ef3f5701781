//! Command implementations for the parcel-watch CLI.
//!
//! Provides subcommands for saving and inspecting land parcels, running a
//! vegetation-change analysis on a saved parcel, and listing past analyses.
//! All state lives in one SQLite key-value database.

use clap::{Args, Subcommand};
use pw_core::Point;
use pw_store::{KeyValueStore, SqliteStore};
use std::path::PathBuf;
use std::rc::Rc;

pub mod analyze;
pub mod backend;
pub mod history;
pub mod polygon;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// SQLite database holding saved polygons and analysis history
    #[arg(long, env = "PW_DB", default_value = "parcel-watch.db", global = true)]
    pub db: PathBuf,

    /// Credential for the static map imagery provider
    #[arg(long, env = "PW_MAPS_API_KEY", default_value = "", hide_env_values = true, global = true)]
    pub maps_key: String,

    /// NDVI drop beyond which a parcel is flagged as possible illegal clearing
    #[arg(long, default_value_t = 0.2, global = true)]
    pub threshold: f64,

    /// Give up on the analysis backend after this many seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Base URL of an HTTP analysis service (requires the `api` feature)
    #[arg(long, env = "PW_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,
}

impl Settings {
    pub fn open_store(&self) -> anyhow::Result<Rc<dyn KeyValueStore>> {
        let store = SqliteStore::open(&self.db)?;
        log::debug!("opened store {}", self.db.display());
        Ok(Rc::new(store))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Save, list and inspect land areas
    #[command(subcommand)]
    Polygon(PolygonCommand),

    /// Compare vegetation of a saved land area between two periods
    Analyze {
        /// Index of the saved land area (see `polygon list`)
        #[arg(short, long)]
        polygon: usize,

        /// First period as YYYY-MM-DD..YYYY-MM-DD (default: 30 to 15 days ago)
        #[arg(long)]
        period1: Option<String>,

        /// Second period as YYYY-MM-DD..YYYY-MM-DD (default: today to 15 days ahead)
        #[arg(long)]
        period2: Option<String>,
    },

    /// Show past analyses, newest first
    History {
        /// Print the raw JSON records
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PolygonCommand {
    /// Draw a polygon from the given points and save it
    Save {
        /// A vertex as `lat,lng`; repeat in ring order (at least 3)
        #[arg(short, long = "point", allow_hyphen_values = true)]
        points: Vec<Point>,
    },

    /// List saved land areas
    List,

    /// Show a saved land area and its imagery request
    Show {
        index: usize,
    },

    /// Test whether a point lies inside a saved land area
    Contains {
        index: usize,

        /// The point as `lat,lng`
        #[arg(allow_hyphen_values = true)]
        point: Point,
    },
}

pub async fn run(settings: Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Polygon(cmd) => polygon::run_polygon(&settings, cmd),
        Command::Analyze {
            polygon,
            period1,
            period2,
        } => analyze::run_analyze(&settings, polygon, period1.as_deref(), period2.as_deref()).await,
        Command::History { json } => history::run_history(&settings, json),
    }
}
