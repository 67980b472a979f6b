//! Versioned document store for mapnote.
//!
//! This crate provides:
//! - [`History`]: a linear undo/redo list of snapshots
//! - [`Store`]: a history bound to a directory, loaded from and saved to its
//!   `database.json`
//!
//! Only the current snapshot is ever persisted; undo and redo are in-memory.
//!
//! # Example
//!
//! ```no_run
//! use mapnote_history::Store;
//! use mapnote_model::Account;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::open("/srv/campus-map")?;
//!
//! let next = store
//!     .current()
//!     .with_account(Account::new("ada", b"hash".to_vec(), false).shared());
//! store.commit(next);
//! store.save()?;
//!
//! store.undo();
//! # Ok(())
//! # }
//! ```

mod error;
mod history;
mod store;

pub use error::{StoreError, StoreResult};
pub use history::History;
pub use mapnote_storage::ErrorKind;
pub use store::{Store, StoreConfig};
