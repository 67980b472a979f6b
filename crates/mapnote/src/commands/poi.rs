//! POI command handlers.
//!
//! POIs are addressed by their position in the document, as printed by
//! `mapnote show`.

use super::apply;
use anyhow::{anyhow, Context};
use clap::Subcommand;
use mapnote_history::Store;
use mapnote_model::{AccountRef, Layer, Poi};
use std::sync::Arc;

/// POI subcommands.
#[derive(Subcommand)]
pub enum PoiCommands {
    /// Add a POI on a floor
    Add {
        /// POI name
        name: String,
        /// Building the floor belongs to
        #[arg(long)]
        building: String,
        /// Floor short name
        #[arg(long)]
        floor: String,
        /// Layer, e.g. eateries or washrooms
        #[arg(long)]
        layer: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        #[arg(long, default_value = "")]
        description: String,
        /// Only this account (and developers) may see the POI
        #[arg(long, value_name = "USERNAME")]
        restricted_to: Option<String>,
    },
    /// Move a POI
    Move {
        index: usize,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Mark a POI as a favorite of an account
    Favorite { index: usize, username: String },
    /// Remove a POI from an account's favorites
    Unfavorite { index: usize, username: String },
    /// Restrict a POI to one account, or lift the restriction
    Restrict {
        index: usize,
        /// Account to restrict to; omit to make the POI public
        #[arg(long, value_name = "USERNAME")]
        to: Option<String>,
    },
    /// Remove a POI
    Remove { index: usize },
}

/// Handle POI commands.
pub fn handle_poi(command: PoiCommands, store: &mut Store) -> anyhow::Result<()> {
    match command {
        PoiCommands::Add {
            name,
            building,
            floor,
            layer,
            x,
            y,
            description,
            restricted_to,
        } => {
            let snapshot = store.current();
            let floor = snapshot
                .building(&building)
                .and_then(|b| b.floor(&floor))
                .cloned()
                .ok_or_else(|| anyhow!("Floor {floor} not found in building {building}"))?;
            let layer: Layer = layer.parse()?;
            let restricted_to = restricted_to.map(|u| account(store, &u)).transpose()?;

            let poi = Poi::new(name.as_str(), description, x, y, Arc::clone(&floor), layer)
                .with_restricted_to(restricted_to);
            let next = store.current().with_poi(poi);
            let index = next.pois().len() - 1;
            apply(store, next, "add POI")?;
            println!("POI added: #{index} {name}");
        }
        PoiCommands::Move { index, x, y } => {
            let moved = poi(store, index)?.with_location(x, y);
            replace(store, index, moved, "move POI")?;
            println!("POI #{index} moved to ({x}, {y})");
        }
        PoiCommands::Favorite { index, username } => {
            let account = account(store, &username)?;
            let updated = poi(store, index)?.with_favorite_of_account(&account, true);
            replace(store, index, updated, "favorite POI")?;
            println!("POI #{index} is a favorite of {username}");
        }
        PoiCommands::Unfavorite { index, username } => {
            let account = account(store, &username)?;
            let updated = poi(store, index)?.with_favorite_of_account(&account, false);
            replace(store, index, updated, "unfavorite POI")?;
            println!("POI #{index} is no longer a favorite of {username}");
        }
        PoiCommands::Restrict { index, to } => {
            let owner = to.as_deref().map(|u| account(store, u)).transpose()?;
            let updated = poi(store, index)?.with_restricted_to(owner);
            replace(store, index, updated, "restrict POI")?;
            match to {
                Some(username) => println!("POI #{index} restricted to {username}"),
                None => println!("POI #{index} is public"),
            }
        }
        PoiCommands::Remove { index } => {
            let next = store
                .current()
                .remove_poi(index)
                .ok_or_else(|| no_such_poi(index))?;
            apply(store, next, "remove POI")?;
            println!("POI #{index} removed");
        }
    }
    Ok(())
}

fn poi(store: &Store, index: usize) -> anyhow::Result<Arc<Poi>> {
    store
        .current()
        .pois()
        .get(index)
        .cloned()
        .ok_or_else(|| no_such_poi(index))
}

fn account(store: &Store, username: &str) -> anyhow::Result<AccountRef> {
    store
        .current()
        .account(username)
        .cloned()
        .with_context(|| format!("Account not found: {username}"))
}

fn replace(store: &mut Store, index: usize, poi: Poi, action: &str) -> anyhow::Result<()> {
    let next = store
        .current()
        .replace_poi(index, poi)
        .ok_or_else(|| no_such_poi(index))?;
    apply(store, next, action)
}

fn no_such_poi(index: usize) -> anyhow::Error {
    anyhow!("POI not found: #{index}")
}
