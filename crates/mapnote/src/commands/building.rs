//! Building command handlers.

use super::apply;
use anyhow::{anyhow, bail};
use clap::Subcommand;
use mapnote_history::Store;
use mapnote_model::{Building, Floor};
use std::sync::Arc;

/// Building subcommands.
#[derive(Subcommand)]
pub enum BuildingCommands {
    /// Add a building with its floors
    Add {
        /// Building name
        name: String,
        /// Floor as SHORT:LONG:MAP_PATH, in display order
        #[arg(long = "floor", value_name = "SHORT:LONG:MAP_PATH", required = true)]
        floors: Vec<String>,
    },
    /// Append a floor to an existing building
    AddFloor {
        /// Building name
        building: String,
        /// Floor as SHORT:LONG:MAP_PATH
        #[arg(value_name = "SHORT:LONG:MAP_PATH")]
        floor: String,
    },
}

/// Handle building commands.
pub fn handle_building(command: BuildingCommands, store: &mut Store) -> anyhow::Result<()> {
    match command {
        BuildingCommands::Add { name, floors } => {
            if store.current().building(&name).is_some() {
                bail!("Building already exists: {name}");
            }
            let floors = floors
                .iter()
                .map(|spec| parse_floor(spec).map(Floor::shared))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let count = floors.len();

            let next = store
                .current()
                .with_building(Building::new(name.as_str(), floors));
            apply(store, next, "add building")?;
            println!("Building added: {name} ({count} floors)");
        }
        BuildingCommands::AddFloor { building, floor } => {
            let floor = parse_floor(&floor)?;
            let current = store
                .current()
                .building(&building)
                .cloned()
                .ok_or_else(|| anyhow!("Building not found: {building}"))?;
            if current.floor(floor.short_name()).is_some() {
                bail!(
                    "Floor {} already exists in building {building}",
                    floor.short_name()
                );
            }

            let short_name = floor.short_name().to_string();
            let extended = Arc::new(current.with_floor(floor.shared()));
            let next = store.current().modify_buildings(|buildings| {
                buildings
                    .iter()
                    .map(|b| {
                        if Arc::ptr_eq(b, &current) {
                            Arc::clone(&extended)
                        } else {
                            Arc::clone(b)
                        }
                    })
                    .collect()
            });
            apply(store, next, "add floor")?;
            println!("Floor added: {building}/{short_name}");
        }
    }
    Ok(())
}

/// Parse `SHORT:LONG:MAP_PATH`. The map path may itself contain colons.
fn parse_floor(spec: &str) -> anyhow::Result<Floor> {
    let mut parts = spec.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(short), Some(long), Some(path)) if !short.is_empty() && !path.is_empty() => {
            Ok(Floor::new(short, long, path))
        }
        _ => bail!("Invalid floor {spec:?}, expected SHORT:LONG:MAP_PATH"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_floor_splits_three_parts() {
        let floor = parse_floor("B1:Basement:maps/c:/b1.svg").unwrap();
        assert_eq!(floor.short_name(), "B1");
        assert_eq!(floor.long_name(), "Basement");
        assert_eq!(floor.map_path(), "maps/c:/b1.svg");
    }

    #[test]
    fn parse_floor_rejects_missing_parts() {
        assert!(parse_floor("1:First").is_err());
        assert!(parse_floor(":First:a.svg").is_err());
        assert!(parse_floor("1:First:").is_err());
    }
}
