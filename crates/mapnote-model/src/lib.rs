//! Immutable entity model for mapnote.
//!
//! Defines the values a map document is made of:
//! - [`Account`] and [`Floor`], the two entity kinds shared from several places
//!   and therefore always held through [`AccountRef`] / [`FloorRef`]
//! - [`Building`], an ordered list of floors
//! - [`Poi`], a point of interest placed on one floor
//! - [`Snapshot`], the whole document at one instant
//!
//! Nothing here is mutable. Every update returns a new value and reuses the
//! untouched parts of the old one. "The same account" or "the same floor"
//! always means the same allocation (`Arc::ptr_eq`); `==` compares values.

mod account;
mod building;
mod consistency;
mod layer;
mod poi;
mod snapshot;

pub use account::{Account, AccountRef};
pub use building::{Building, Floor, FloorRef};
pub use consistency::ConsistencyError;
pub use layer::{Layer, UnknownLayer};
pub use poi::{FavoriteSet, Poi};
pub use snapshot::Snapshot;
