use std::fmt;
use std::sync::Arc;

/// Shared handle to an account. Identity is the allocation.
pub type AccountRef = Arc<Account>;

/// A user account.
///
/// Usernames are case-sensitive and unique within a snapshot. The password
/// hash is opaque to the store and never interpreted.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Account {
    username: String,
    password_hash: Vec<u8>,
    developer: bool,
}

impl Account {
    pub fn new(username: impl Into<String>, password_hash: Vec<u8>, developer: bool) -> Self {
        Self {
            username: username.into(),
            password_hash,
            developer,
        }
    }

    /// Wrap this account in a shared handle.
    #[must_use]
    pub fn shared(self) -> AccountRef {
        Arc::new(self)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &[u8] {
        &self.password_hash
    }

    pub fn is_developer(&self) -> bool {
        self.developer
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password_hash", &format_args!("<{} bytes>", self.password_hash.len()))
            .field("developer", &self.developer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password_hash() {
        let account = Account::new("ada", b"secret-hash".to_vec(), false);
        let debug = format!("{account:?}");
        assert!(debug.contains("ada"));
        assert!(debug.contains("<11 bytes>"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn value_equality_ignores_allocation() {
        let a = Account::new("ada", vec![1, 2], true).shared();
        let b = Account::new("ada", vec![1, 2], true).shared();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
