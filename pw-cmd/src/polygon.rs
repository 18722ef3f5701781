//! `polygon` subcommands.

use crate::{PolygonCommand, Settings};
use pw_core::imagery::{build_imagery_request, StaticMapStyle};
use pw_core::{Point, Polygon};
use pw_store::{PolygonStore, SaveError};
use pw_utils::dates::format_display_datetime;

pub fn run_polygon(settings: &Settings, command: PolygonCommand) -> anyhow::Result<()> {
    let mut store = PolygonStore::open(settings.open_store()?);
    match command {
        PolygonCommand::Save { points } => save(&mut store, points),
        PolygonCommand::List => {
            list(&store);
            Ok(())
        }
        PolygonCommand::Show { index } => show(&store, index, &settings.maps_key),
        PolygonCommand::Contains { index, point } => {
            let polygon = saved_at(&store, index)?;
            let verdict = if polygon.contains(&point) {
                "inside"
            } else {
                "outside"
            };
            println!("{} is {} {}", point, verdict, polygon.name);
            Ok(())
        }
    }
}

/// Look up a saved polygon by index, failing with a readable message.
pub(crate) fn saved_at(store: &PolygonStore, index: usize) -> anyhow::Result<&Polygon> {
    match store.saved().get(index) {
        Some(polygon) => Ok(polygon),
        None => anyhow::bail!(
            "no saved land area at index {} ({} saved)",
            index,
            store.saved().len()
        ),
    }
}

fn save(store: &mut PolygonStore, points: Vec<Point>) -> anyhow::Result<()> {
    for point in points {
        store.add_point(point);
    }
    let polygon = match store.save() {
        Ok(polygon) => polygon,
        Err(SaveError::NotPersisted { polygon, source }) => {
            log::warn!("{} was not written to disk: {}", polygon.name, source);
            polygon
        }
        Err(SaveError::Invalid(e)) => anyhow::bail!("{}", e),
    };
    println!(
        "Saved {} (id {}) with {} points",
        polygon.name,
        polygon.id,
        polygon.points.len()
    );
    Ok(())
}

fn list(store: &PolygonStore) {
    if store.saved().is_empty() {
        println!("No saved land areas. Use `polygon save` to draw one.");
        return;
    }
    for (index, polygon) in store.saved().iter().enumerate() {
        let created = polygon
            .created_at
            .as_ref()
            .map(format_display_datetime)
            .unwrap_or_default();
        println!(
            "[{}] {:<16} {:>3} points  centroid {}  {}",
            index,
            polygon.name,
            polygon.points.len(),
            polygon.centroid(),
            created
        );
    }
}

fn show(store: &PolygonStore, index: usize, maps_key: &str) -> anyhow::Result<()> {
    let polygon = saved_at(store, index)?;
    let request = build_imagery_request(polygon)?;
    let bounds = polygon.bounds()?;
    println!("{} (id {})", polygon.name, polygon.id);
    for point in &polygon.points {
        println!("  {}", point);
    }
    println!(
        "bounds   N {} S {} E {} W {}",
        bounds.north, bounds.south, bounds.east, bounds.west
    );
    println!("centroid {}", polygon.centroid());
    println!("center   {}  zoom {}", request.center, request.zoom);
    println!("image    {}", request.static_map_url(&StaticMapStyle::new(maps_key)));
    Ok(())
}
