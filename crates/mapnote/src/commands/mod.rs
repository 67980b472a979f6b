//! Command handlers for the mapnote CLI.
//!
//! Read-only commands live here; each group of editing commands has its own
//! module.

pub mod account;
pub mod building;
pub mod poi;

pub use account::*;
pub use building::*;
pub use poi::*;

use crate::config::Config;
use anyhow::{anyhow, bail};
use mapnote_history::Store;
use mapnote_model::{Layer, Poi, Snapshot};
use mapnote_util::path::is_within;
use std::path::PathBuf;
use tracing::info;

/// Check `next`, make it current and save it.
///
/// A change that would break a snapshot invariant is refused before anything
/// is committed.
pub(crate) fn apply(store: &mut Store, next: Snapshot, action: &str) -> anyhow::Result<()> {
    next.validate()
        .map_err(|e| anyhow!("Refusing to {action}: {e}"))?;
    store.commit(next);
    store.save()?;
    info!(action, "Saved change");
    Ok(())
}

/// Print accounts, buildings and POIs.
pub fn show(store: &Store, viewer: Option<&str>, layer: Option<&str>) -> anyhow::Result<()> {
    let snapshot = store.current();
    let viewer = match viewer {
        Some(name) => Some(
            snapshot
                .account(name)
                .ok_or_else(|| anyhow!("Account not found: {name}"))?,
        ),
        None => None,
    };
    let layer: Option<Layer> = layer.map(str::parse).transpose()?;

    if snapshot.is_empty() {
        println!("Empty document.");
        return Ok(());
    }

    println!("Accounts:");
    for account in snapshot.accounts() {
        let role = if account.is_developer() { " (developer)" } else { "" };
        println!("  {}{}", account.username(), role);
    }

    println!();
    println!("Buildings:");
    for building in snapshot.buildings() {
        println!("  {}", building.name());
        for floor in building.floors() {
            println!(
                "    {:<6} {:<20} {}",
                floor.short_name(),
                floor.long_name(),
                floor.map_path()
            );
        }
    }

    println!();
    println!("POIs:");
    println!(
        "  {:<4} {:<24} {:<14} {:<12} {:>7} {:>7}  {}",
        "#", "NAME", "LAYER", "FLOOR", "X", "Y", "FAVORITE OF"
    );
    println!("  {}", "-".repeat(84));
    for (index, poi) in snapshot.pois().iter().enumerate() {
        if !poi.is_visible_to(viewer.map(|a| &**a)) {
            continue;
        }
        if layer.is_some_and(|layer| poi.layer() != layer) {
            continue;
        }
        print_poi(snapshot, index, poi);
    }

    Ok(())
}

fn print_poi(snapshot: &Snapshot, index: usize, poi: &Poi) {
    let floor = match snapshot.building_of(poi.floor()) {
        Some(building) => format!("{}/{}", building.name(), poi.floor().short_name()),
        None => poi.floor().short_name().to_string(),
    };
    let favorites: Vec<&str> = poi.favorite_of().iter().map(|a| a.username()).collect();
    let mut line = format!(
        "  {:<4} {:<24} {:<14} {:<12} {:>7} {:>7}  {}",
        index,
        poi.name(),
        poi.layer().display_name(),
        floor,
        poi.x(),
        poi.y(),
        favorites.join(", ")
    );
    if let Some(owner) = poi.restricted_to() {
        line.push_str(&format!("  [only {}]", owner.username()));
    }
    println!("{}", line.trim_end());
}

/// Report whether the database is valid.
///
/// Opening the store already decoded and checked the file; this reports, and
/// warns about floor maps that resolve outside the store directory.
pub fn check(store: &Store) -> anyhow::Result<()> {
    let snapshot = store.current();
    snapshot.validate()?;
    println!(
        "OK: {} accounts, {} buildings, {} POIs",
        snapshot.accounts().len(),
        snapshot.buildings().len(),
        snapshot.pois().len()
    );

    for building in snapshot.buildings() {
        for floor in building.floors() {
            let map = store.resolve_floor_map_path(floor);
            if !is_within(&map, store.directory()) {
                println!(
                    "warning: map of {}/{} is outside the store directory: {}",
                    building.name(),
                    floor.short_name(),
                    map.display()
                );
            }
        }
    }
    Ok(())
}

/// Print the resolved map path of a floor.
pub fn map_path(store: &Store, building: &str, floor: &str) -> anyhow::Result<()> {
    let Some(found) = store.current().building(building) else {
        bail!("Building not found: {building}");
    };
    let Some(floor) = found.floor(floor) else {
        bail!("Floor {floor} not found in building {building}");
    };
    println!("{}", store.resolve_floor_map_path(floor).display());
    Ok(())
}

/// Print the merged configuration and where it came from.
pub fn show_config(config: &Config, sources: &[PathBuf]) -> anyhow::Result<()> {
    if sources.is_empty() {
        println!("Sources: none");
    } else {
        println!("Sources:");
        for source in sources {
            println!("  {}", source.display());
        }
    }
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
