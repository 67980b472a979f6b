//! The whole document at one instant.

use crate::{Account, AccountRef, Building, ConsistencyError, FloorRef, Layer, Poi};
use std::sync::Arc;

/// An immutable version of the document: accounts, buildings and POIs.
///
/// Each sequence sits behind its own `Arc`, so replacing one of them reuses
/// the other two, and cloning a snapshot never copies entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    accounts: Arc<[AccountRef]>,
    buildings: Arc<[Arc<Building>]>,
    pois: Arc<[Arc<Poi>]>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    pub fn new(
        accounts: Vec<AccountRef>,
        buildings: Vec<Arc<Building>>,
        pois: Vec<Arc<Poi>>,
    ) -> Self {
        Self {
            accounts: accounts.into(),
            buildings: buildings.into(),
            pois: pois.into(),
        }
    }

    /// A document with no accounts, buildings or POIs.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.buildings.is_empty() && self.pois.is_empty()
    }

    pub fn accounts(&self) -> &[AccountRef] {
        &self.accounts
    }

    pub fn buildings(&self) -> &[Arc<Building>] {
        &self.buildings
    }

    pub fn pois(&self) -> &[Arc<Poi>] {
        &self.pois
    }

    // -------------------------------------------------------------------------
    // Persistent updates
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn modify_accounts<F>(&self, f: F) -> Self
    where
        F: FnOnce(&[AccountRef]) -> Vec<AccountRef>,
    {
        Self {
            accounts: f(&self.accounts).into(),
            buildings: Arc::clone(&self.buildings),
            pois: Arc::clone(&self.pois),
        }
    }

    #[must_use]
    pub fn modify_buildings<F>(&self, f: F) -> Self
    where
        F: FnOnce(&[Arc<Building>]) -> Vec<Arc<Building>>,
    {
        Self {
            accounts: Arc::clone(&self.accounts),
            buildings: f(&self.buildings).into(),
            pois: Arc::clone(&self.pois),
        }
    }

    #[must_use]
    pub fn modify_pois<F>(&self, f: F) -> Self
    where
        F: FnOnce(&[Arc<Poi>]) -> Vec<Arc<Poi>>,
    {
        Self {
            accounts: Arc::clone(&self.accounts),
            buildings: Arc::clone(&self.buildings),
            pois: f(&self.pois).into(),
        }
    }

    #[must_use]
    pub fn with_account(&self, account: AccountRef) -> Self {
        self.modify_accounts(|accounts| appended(accounts, account))
    }

    #[must_use]
    pub fn with_building(&self, building: Building) -> Self {
        self.modify_buildings(|buildings| appended(buildings, Arc::new(building)))
    }

    #[must_use]
    pub fn with_poi(&self, poi: Poi) -> Self {
        self.modify_pois(|pois| appended(pois, Arc::new(poi)))
    }

    /// Replace the POI at `index`; `None` if there is no such POI.
    pub fn replace_poi(&self, index: usize, poi: Poi) -> Option<Self> {
        if index >= self.pois.len() {
            return None;
        }
        let replacement = Arc::new(poi);
        Some(self.modify_pois(|pois| {
            pois.iter()
                .enumerate()
                .map(|(i, existing)| {
                    if i == index {
                        Arc::clone(&replacement)
                    } else {
                        Arc::clone(existing)
                    }
                })
                .collect()
        }))
    }

    /// Remove the POI at `index`; `None` if there is no such POI.
    pub fn remove_poi(&self, index: usize) -> Option<Self> {
        if index >= self.pois.len() {
            return None;
        }
        Some(self.modify_pois(|pois| {
            pois.iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, poi)| Arc::clone(poi))
                .collect()
        }))
    }

    /// Whether both snapshots hold the very same account sequence allocation.
    pub fn shares_accounts_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.accounts, &other.accounts)
    }

    pub fn shares_buildings_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.buildings, &other.buildings)
    }

    pub fn shares_pois_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.pois, &other.pois)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn account(&self, username: &str) -> Option<&AccountRef> {
        self.accounts.iter().find(|a| a.username() == username)
    }

    pub fn building(&self, name: &str) -> Option<&Arc<Building>> {
        self.buildings.iter().find(|b| b.name() == name)
    }

    /// The building listing this floor allocation.
    pub fn building_of(&self, floor: &FloorRef) -> Option<&Arc<Building>> {
        self.buildings.iter().find(|b| b.contains_floor(floor))
    }

    /// POIs placed on this floor allocation, in document order.
    pub fn pois_on_floor<'a>(
        &'a self,
        floor: &'a FloorRef,
    ) -> impl Iterator<Item = &'a Arc<Poi>> + 'a {
        self.pois.iter().filter(move |p| Arc::ptr_eq(p.floor(), floor))
    }

    pub fn pois_in_layer(&self, layer: Layer) -> impl Iterator<Item = &Arc<Poi>> + '_ {
        self.pois.iter().filter(move |p| p.layer() == layer)
    }

    pub fn favorites_of<'a>(
        &'a self,
        account: &'a Account,
    ) -> impl Iterator<Item = &'a Arc<Poi>> + 'a {
        self.pois.iter().filter(move |p| p.is_favorite_of(account))
    }

    /// POIs `viewer` is allowed to see; `None` is an anonymous viewer.
    pub fn visible_pois<'a>(
        &'a self,
        viewer: Option<&'a Account>,
    ) -> impl Iterator<Item = &'a Arc<Poi>> + 'a {
        self.pois.iter().filter(move |p| p.is_visible_to(viewer))
    }

    /// Check the cross-entity invariants.
    ///
    /// Reports the first violation found, in the order buildings, accounts,
    /// POIs.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        crate::consistency::validate(self)
    }
}

fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(items);
    out.push(item);
    out
}
