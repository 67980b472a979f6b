//! Storage layer for mapnote.
//!
//! This crate turns a [`Snapshot`](mapnote_model::Snapshot) into bytes and
//! back, and owns the single database file a store directory holds:
//! - [`codec`]: the JSON wire format with per-document reference numbers, so
//!   accounts and floors shared by several entities stay shared after a load
//! - [`file`]: reading and atomically replacing `database.json`

pub mod codec;
pub mod error;
pub mod file;

pub use codec::{
    decode, decode_slice, encode, CodecError, CodecResult, EncodeOptions, IdentityError,
};
pub use error::{ErrorKind, StorageError, StorageResult};
pub use file::{DatabaseFile, WriteOptions, DATABASE_FILE_NAME};
