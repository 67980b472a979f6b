//! Cross-entity invariants of a snapshot.

use crate::{Account, Floor, Snapshot};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// A structurally valid snapshot that breaks a cross-entity invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// A building lists no floors.
    #[error("building \"{building}\" has no floors")]
    EmptyBuilding { building: String },

    /// The same floor is listed twice, in one building or across two.
    #[error("floor \"{floor}\" of building \"{first}\" is listed again in building \"{second}\"")]
    FloorListedTwice {
        floor: String,
        first: String,
        second: String,
    },

    /// Two accounts share a username.
    #[error("username \"{username}\" is used by more than one account")]
    DuplicateUsername { username: String },

    /// A POI sits on a floor that no building lists.
    #[error("poi #{index} \"{poi}\" is on floor \"{floor}\", which no building lists")]
    UnlistedFloor {
        index: usize,
        poi: String,
        floor: String,
    },

    /// A POI is favorited by an account missing from the account list.
    #[error("poi #{index} \"{poi}\" is a favorite of \"{username}\", an unlisted account")]
    UnlistedFavorite {
        index: usize,
        poi: String,
        username: String,
    },

    /// A POI is restricted to an account missing from the account list.
    #[error("poi #{index} \"{poi}\" is restricted to \"{username}\", an unlisted account")]
    UnlistedRestriction {
        index: usize,
        poi: String,
        username: String,
    },
}

/// Membership is by allocation, never by value: a POI pointing at a copy of a
/// listed floor is as dangling as one pointing at an unknown floor.
pub(crate) fn validate(snapshot: &Snapshot) -> Result<(), ConsistencyError> {
    let mut floors: HashMap<*const Floor, &str> = HashMap::new();
    for building in snapshot.buildings() {
        if building.floors().is_empty() {
            return Err(ConsistencyError::EmptyBuilding {
                building: building.name().to_string(),
            });
        }
        for floor in building.floors() {
            if let Some(first) = floors.insert(Arc::as_ptr(floor), building.name()) {
                return Err(ConsistencyError::FloorListedTwice {
                    floor: floor.short_name().to_string(),
                    first: first.to_string(),
                    second: building.name().to_string(),
                });
            }
        }
    }

    let mut usernames = HashSet::new();
    let mut accounts: HashSet<*const Account> = HashSet::new();
    for account in snapshot.accounts() {
        if !usernames.insert(account.username()) {
            return Err(ConsistencyError::DuplicateUsername {
                username: account.username().to_string(),
            });
        }
        accounts.insert(Arc::as_ptr(account));
    }

    for (index, poi) in snapshot.pois().iter().enumerate() {
        if !floors.contains_key(&Arc::as_ptr(poi.floor())) {
            return Err(ConsistencyError::UnlistedFloor {
                index,
                poi: poi.name().to_string(),
                floor: poi.floor().short_name().to_string(),
            });
        }
        if let Some(account) = poi
            .favorite_of()
            .iter()
            .find(|a| !accounts.contains(&Arc::as_ptr(*a)))
        {
            return Err(ConsistencyError::UnlistedFavorite {
                index,
                poi: poi.name().to_string(),
                username: account.username().to_string(),
            });
        }
        if let Some(account) = poi.restricted_to() {
            if !accounts.contains(&Arc::as_ptr(account)) {
                return Err(ConsistencyError::UnlistedRestriction {
                    index,
                    poi: poi.name().to_string(),
                    username: account.username().to_string(),
                });
            }
        }
    }

    Ok(())
}
