//! Builder patterns for constructing test snapshots.

use mapnote_model::{Account, AccountRef, Building, Floor, FloorRef, Layer, Poi, Snapshot};
use std::sync::Arc;

/// Builder for well-formed snapshots.
///
/// Entities are named rather than passed around: a POI names its building and
/// floor, a favorite names its POI and account. Every name resolves to the one
/// allocation created for it, so the built snapshot shares entities exactly as
/// a real document would. Unknown names panic.
///
/// # Example
///
/// ```rust
/// use mapnote_model::Layer;
/// use mapnote_test_utils::SnapshotBuilder;
/// use std::sync::Arc;
///
/// let snapshot = SnapshotBuilder::new()
///     .building("Hall", &[("1", "First", "hall/1.svg"), ("2", "Second", "hall/2.svg")])
///     .poi("Cafe", "Hall", "1", Layer::Eateries)
///     .poi("Gym", "Hall", "1", Layer::Fitness)
///     .build();
///
/// assert!(Arc::ptr_eq(snapshot.pois()[0].floor(), snapshot.pois()[1].floor()));
/// ```
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    accounts: Vec<AccountRef>,
    buildings: Vec<Building>,
    pois: Vec<Poi>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account whose password hash is its username's bytes.
    pub fn account(self, username: &str, developer: bool) -> Self {
        self.account_with_hash(username, username.as_bytes(), developer)
    }

    pub fn account_with_hash(mut self, username: &str, hash: &[u8], developer: bool) -> Self {
        self.accounts
            .push(Account::new(username, hash.to_vec(), developer).shared());
        self
    }

    /// Add a building with `(short_name, long_name, map_path)` floors.
    pub fn building(mut self, name: &str, floors: &[(&str, &str, &str)]) -> Self {
        let floors = floors
            .iter()
            .map(|(short, long, path)| Floor::new(*short, *long, *path).shared())
            .collect();
        self.buildings.push(Building::new(name, floors));
        self
    }

    /// Add a POI at the origin.
    pub fn poi(self, name: &str, building: &str, floor: &str, layer: Layer) -> Self {
        self.poi_at(name, building, floor, layer, 0, 0)
    }

    pub fn poi_at(
        mut self,
        name: &str,
        building: &str,
        floor: &str,
        layer: Layer,
        x: i32,
        y: i32,
    ) -> Self {
        let floor = self.floor_ref(building, floor);
        self.pois.push(Poi::new(name, "", x, y, floor, layer));
        self
    }

    /// Mark the POI named `poi` as a favorite of `username`.
    pub fn favorite(mut self, poi: &str, username: &str) -> Self {
        let account = self.account_ref(username);
        let entry = self.poi_mut(poi);
        *entry = entry.with_favorite_of_account(&account, true);
        self
    }

    /// Restrict the POI named `poi` to `username`.
    pub fn restrict(mut self, poi: &str, username: &str) -> Self {
        let account = self.account_ref(username);
        let entry = self.poi_mut(poi);
        *entry = entry.with_restricted_to(Some(account));
        self
    }

    pub fn build(self) -> Snapshot {
        Snapshot::new(
            self.accounts,
            self.buildings.into_iter().map(Arc::new).collect(),
            self.pois.into_iter().map(Arc::new).collect(),
        )
    }

    fn floor_ref(&self, building: &str, floor: &str) -> FloorRef {
        self.buildings
            .iter()
            .find(|b| b.name() == building)
            .and_then(|b| b.floor(floor))
            .cloned()
            .unwrap_or_else(|| panic!("No floor {floor:?} in building {building:?}"))
    }

    fn account_ref(&self, username: &str) -> AccountRef {
        self.accounts
            .iter()
            .find(|a| a.username() == username)
            .cloned()
            .unwrap_or_else(|| panic!("No account {username:?}"))
    }

    fn poi_mut(&mut self, name: &str) -> &mut Poi {
        self.pois
            .iter_mut()
            .find(|p| p.name() == name)
            .unwrap_or_else(|| panic!("No POI {name:?}"))
    }
}
