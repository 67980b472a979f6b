use std::sync::Arc;

/// Shared handle to a floor. Identity is the allocation.
pub type FloorRef = Arc<Floor>;

/// One floor of a building.
///
/// `map_path` is relative to the store directory; the store resolves it but
/// never reads the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Floor {
    short_name: String,
    long_name: String,
    map_path: String,
}

impl Floor {
    pub fn new(
        short_name: impl Into<String>,
        long_name: impl Into<String>,
        map_path: impl Into<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
            map_path: map_path.into(),
        }
    }

    /// Wrap this floor in a shared handle.
    #[must_use]
    pub fn shared(self) -> FloorRef {
        Arc::new(self)
    }

    /// Short label, e.g. "2" or "B1".
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn map_path(&self) -> &str {
        &self.map_path
    }
}

/// A building and its floors in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    name: String,
    floors: Vec<FloorRef>,
}

impl Building {
    pub fn new(name: impl Into<String>, floors: Vec<FloorRef>) -> Self {
        Self {
            name: name.into(),
            floors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn floors(&self) -> &[FloorRef] {
        &self.floors
    }

    /// Whether this building lists exactly this floor allocation.
    pub fn contains_floor(&self, floor: &FloorRef) -> bool {
        self.floors.iter().any(|f| Arc::ptr_eq(f, floor))
    }

    /// Find a floor by its short name.
    pub fn floor(&self, short_name: &str) -> Option<&FloorRef> {
        self.floors.iter().find(|f| f.short_name() == short_name)
    }

    /// Return a copy with `floor` appended; existing floors are shared.
    #[must_use]
    pub fn with_floor(&self, floor: FloorRef) -> Self {
        let mut floors = self.floors.clone();
        floors.push(floor);
        Self {
            name: self.name.clone(),
            floors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_floor_is_by_identity() {
        let listed = Floor::new("1", "First", "hall/1.svg").shared();
        let lookalike = Floor::new("1", "First", "hall/1.svg").shared();
        let building = Building::new("Hall", vec![listed.clone()]);

        assert!(building.contains_floor(&listed));
        assert!(!building.contains_floor(&lookalike));
    }

    #[test]
    fn with_floor_shares_existing_floors() {
        let first = Floor::new("1", "First", "hall/1.svg").shared();
        let building = Building::new("Hall", vec![first.clone()]);
        let extended = building.with_floor(Floor::new("2", "Second", "hall/2.svg").shared());

        assert_eq!(building.floors().len(), 1);
        assert_eq!(extended.floors().len(), 2);
        assert!(Arc::ptr_eq(&extended.floors()[0], &first));
        assert_eq!(extended.floor("2").map(|f| f.long_name()), Some("Second"));
    }
}
