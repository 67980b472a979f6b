//! Testing utilities and fixtures for mapnote.
//!
//! - **Builders**: [`SnapshotBuilder`] assembles well-formed snapshots by name
//!   instead of by hand-threaded `Arc` handles
//! - **Fixtures**: [`TestDir`] prepares a temporary store directory
//! - **Assertions**: identity checks with readable failure messages
//!
//! # Example Usage
//!
//! ```rust
//! use mapnote_model::Layer;
//! use mapnote_test_utils::SnapshotBuilder;
//!
//! let snapshot = SnapshotBuilder::new()
//!     .account("ada", false)
//!     .building("Hall", &[("1", "First", "hall/1.svg")])
//!     .poi("Cafe", "Hall", "1", Layer::Eateries)
//!     .favorite("Cafe", "ada")
//!     .build();
//!
//! assert!(snapshot.validate().is_ok());
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use builders::SnapshotBuilder;
pub use fixtures::{BuiltTestDir, TestDir};
