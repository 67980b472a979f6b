use crate::{Account, AccountRef, FloorRef, Layer};
use std::ptr;
use std::sync::Arc;

/// The set of accounts that favorited a POI.
///
/// Membership is by allocation, like every other account reference: a
/// value-equal copy of a member is a different account. Iteration is in
/// username order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    accounts: Vec<AccountRef>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, account: &Account) -> bool {
        self.accounts.iter().any(|a| ptr::eq(Arc::as_ptr(a), account))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountRef> {
        self.accounts.iter()
    }

    /// Return a copy that includes `account`.
    #[must_use]
    pub fn with(&self, account: AccountRef) -> Self {
        let mut set = self.clone();
        set.insert(account);
        set
    }

    /// Return a copy that excludes `account`.
    #[must_use]
    pub fn without(&self, account: &Account) -> Self {
        let mut set = self.clone();
        set.accounts.retain(|a| !ptr::eq(Arc::as_ptr(a), account));
        set
    }

    fn insert(&mut self, account: AccountRef) {
        if self.contains(&account) {
            return;
        }
        let at = self
            .accounts
            .partition_point(|a| a.username() <= account.username());
        self.accounts.insert(at, account);
    }
}

impl FromIterator<AccountRef> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = AccountRef>>(iter: I) -> Self {
        let mut set = Self::new();
        for account in iter {
            set.insert(account);
        }
        set
    }
}

/// A point of interest placed on a floor map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poi {
    name: String,
    description: String,
    x: i32,
    y: i32,
    favorite_of: FavoriteSet,
    floor: FloorRef,
    layer: Layer,
    restricted_to: Option<AccountRef>,
}

impl Poi {
    /// Create a POI nobody has favorited, visible to everyone.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        x: i32,
        y: i32,
        floor: FloorRef,
        layer: Layer,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            x,
            y,
            favorite_of: FavoriteSet::new(),
            floor,
            layer,
            restricted_to: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn location(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn favorite_of(&self) -> &FavoriteSet {
        &self.favorite_of
    }

    pub fn floor(&self) -> &FloorRef {
        &self.floor
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn restricted_to(&self) -> Option<&AccountRef> {
        self.restricted_to.as_ref()
    }

    #[must_use]
    pub fn with_location(&self, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..self.clone()
        }
    }

    /// Add `account` to (or remove it from) the favorite set.
    ///
    /// Applying the same call twice gives the same set as applying it once.
    #[must_use]
    pub fn with_favorite_of_account(&self, account: &AccountRef, favorite: bool) -> Self {
        let favorite_of = if favorite {
            self.favorite_of.with(Arc::clone(account))
        } else {
            self.favorite_of.without(account)
        };
        Self {
            favorite_of,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_favorites(&self, favorite_of: FavoriteSet) -> Self {
        Self {
            favorite_of,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_restricted_to(&self, restricted_to: Option<AccountRef>) -> Self {
        Self {
            restricted_to,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_layer(&self, layer: Layer) -> Self {
        Self {
            layer,
            ..self.clone()
        }
    }

    pub fn is_favorite_of(&self, account: &Account) -> bool {
        self.favorite_of.contains(account)
    }

    /// Whether `viewer` may see this POI.
    ///
    /// Unrestricted POIs are visible to everyone, including anonymous viewers.
    /// Restricted ones are visible to the restricting account and to developers.
    pub fn is_visible_to(&self, viewer: Option<&Account>) -> bool {
        match (&self.restricted_to, viewer) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(owner), Some(viewer)) => {
                viewer.is_developer() || owner.username() == viewer.username()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Floor;

    fn floor() -> FloorRef {
        Floor::new("1", "First", "hall/1.svg").shared()
    }

    fn cafe() -> Poi {
        Poi::new("Cafe", "Coffee and snacks", 10, 20, floor(), Layer::Eateries)
    }

    #[test]
    fn with_location_replaces_only_coordinates() {
        let poi = cafe();
        let moved = poi.with_location(-5, 7);

        assert_eq!(moved.location(), (-5, 7));
        assert_eq!(poi.location(), (10, 20));
        assert_eq!(moved.name(), poi.name());
        assert!(Arc::ptr_eq(moved.floor(), poi.floor()));
    }

    #[test]
    fn favorite_is_idempotent() {
        let ada = Account::new("ada", vec![], false).shared();
        let once = cafe().with_favorite_of_account(&ada, true);
        let twice = once.with_favorite_of_account(&ada, true);

        assert_eq!(once.favorite_of(), twice.favorite_of());
        assert_eq!(twice.favorite_of().len(), 1);
        assert!(twice.is_favorite_of(&ada));
    }

    #[test]
    fn unfavorite_absent_account_is_noop() {
        let ada = Account::new("ada", vec![], false).shared();
        let poi = cafe();
        assert_eq!(poi.with_favorite_of_account(&ada, false), poi);
    }

    #[test]
    fn unfavorite_removes_account() {
        let ada = Account::new("ada", vec![], false).shared();
        let bob = Account::new("bob", vec![], false).shared();
        let poi = cafe()
            .with_favorite_of_account(&ada, true)
            .with_favorite_of_account(&bob, true)
            .with_favorite_of_account(&ada, false);

        assert!(!poi.is_favorite_of(&ada));
        assert!(poi.is_favorite_of(&bob));
    }

    #[test]
    fn favorite_set_iterates_in_username_order() {
        let set: FavoriteSet = ["carol", "ada", "bob"]
            .into_iter()
            .map(|name| Account::new(name, vec![], false).shared())
            .collect();
        let names: Vec<_> = set.iter().map(|a| a.username()).collect();
        assert_eq!(names, ["ada", "bob", "carol"]);
    }

    #[test]
    fn favorite_membership_is_by_allocation() {
        let ada = Account::new("ada", vec![], false).shared();
        let lookalike = Account::new("ada", vec![], false).shared();
        let poi = cafe().with_favorite_of_account(&ada, true);

        assert!(!poi.is_favorite_of(&lookalike));
        assert_eq!(poi.with_favorite_of_account(&lookalike, false), poi);

        let both = poi.with_favorite_of_account(&lookalike, true);
        assert_eq!(both.favorite_of().len(), 2);
        assert!(both.favorite_of().iter().any(|a| Arc::ptr_eq(a, &ada)));
        assert!(both.favorite_of().iter().any(|a| Arc::ptr_eq(a, &lookalike)));
    }

    #[test]
    fn with_name_description_and_layer_touch_one_field() {
        let ada = Account::new("ada", vec![], false).shared();
        let poi = cafe()
            .with_favorite_of_account(&ada, true)
            .with_restricted_to(Some(ada.clone()));

        let renamed = poi.with_name("Canteen");
        assert_eq!(renamed.name(), "Canteen");
        assert_eq!(renamed.with_name("Cafe"), poi);

        let described = poi.with_description("Closed on Sundays");
        assert_eq!(described.description(), "Closed on Sundays");
        assert_eq!(described.name(), "Cafe");

        let moved = poi.with_layer(Layer::Lounges);
        assert_eq!(moved.layer(), Layer::Lounges);
        assert_eq!(poi.layer(), Layer::Eateries);
        assert_eq!(moved.location(), poi.location());
        assert!(moved.is_favorite_of(&ada));
        assert!(Arc::ptr_eq(moved.restricted_to().unwrap(), &ada));
        assert!(Arc::ptr_eq(moved.floor(), poi.floor()));
    }

    #[test]
    fn visibility_rules() {
        let owner = Account::new("owner", vec![], false).shared();
        let other = Account::new("other", vec![], false);
        let dev = Account::new("dev", vec![], true);

        let open = cafe();
        assert!(open.is_visible_to(None));
        assert!(open.is_visible_to(Some(&other)));

        let restricted = cafe().with_restricted_to(Some(owner.clone()));
        assert!(!restricted.is_visible_to(None));
        assert!(!restricted.is_visible_to(Some(&other)));
        assert!(restricted.is_visible_to(Some(&*owner)));
        assert!(restricted.is_visible_to(Some(&dev)));
    }
}
