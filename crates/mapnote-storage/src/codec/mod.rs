//! Identity-preserving JSON codec.
//!
//! Accounts and floors are the only entities referenced from more than one
//! place. The first time the encoder meets one of them (by allocation, in a
//! pre-order walk of accounts, buildings, then POIs) it writes the full entity
//! with a fresh `"ref"` number; every later occurrence is written as that bare
//! number. The decoder mirrors this with a number→entity table, so a decoded
//! document shares exactly what the encoded one shared.
//!
//! ```text
//! {
//!   "version": 1,
//!   "accounts":  [ {"ref": 1, "username": "ada", "password_hash": "...", "developer": false} ],
//!   "buildings": [ {"name": "Hall", "floors": [ {"ref": 2, "short_name": "1", ...} ]} ],
//!   "pois":      [ {"name": "Cafe", ..., "favorite_of": [1], "floor": 2,
//!                   "layer": "eateries", "restricted_to": null} ]
//! }
//! ```
//!
//! Accounts and floors share one number space. Numbers start at 1 and mean
//! nothing outside the document they appear in. An object that names the
//! same field twice is a syntax error.

mod decode;
mod encode;
mod strict;

pub use decode::{decode, decode_slice};
pub use encode::{encode, EncodeOptions};

use mapnote_model::ConsistencyError;
use thiserror::Error;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u64 = 1;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes are not well-formed JSON, or an object repeats a key.
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// Valid JSON with the wrong shape: a missing, unknown or mistyped field.
    #[error("invalid {entity} at {at}{}: {message}", field_suffix(.field))]
    Parse {
        entity: &'static str,
        at: String,
        field: Option<&'static str>,
        message: String,
    },

    /// Reference numbers that do not resolve to exactly one entity.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A well-shaped document whose entities contradict each other.
    #[error("inconsistent document: {0}")]
    Consistency(#[from] ConsistencyError),

    /// Serializing the document failed.
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CodecError {
    pub(crate) fn parse(
        entity: &'static str,
        at: impl Into<String>,
        field: Option<&'static str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            entity,
            at: at.into(),
            field,
            message: message.into(),
        }
    }
}

fn field_suffix(field: &Option<&'static str>) -> String {
    match field {
        Some(field) => format!(", field `{field}`"),
        None => String::new(),
    }
}

/// Reference numbers that break identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// A bare number used before (or without) its full definition.
    #[error("reference {number} at {at} has no prior definition")]
    Dangling { number: u32, at: String },

    /// A number given to two full definitions.
    #[error("reference {number} at {at} is already defined")]
    Ambiguous { number: u32, at: String },

    /// Zero is never assigned.
    #[error("reference 0 at {at} is not a valid reference number")]
    Zero { at: String },

    /// A number that names an entity of the other kind.
    #[error("reference {number} at {at} names {found}, expected {expected}")]
    WrongKind {
        number: u32,
        at: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_entity_and_field() {
        let err = CodecError::parse("poi", "pois[2]", Some("x"), "expected an integer");
        assert_eq!(
            err.to_string(),
            "invalid poi at pois[2], field `x`: expected an integer"
        );
    }

    #[test]
    fn parse_error_without_field() {
        let err = CodecError::parse("floor", "pois[0].floor", None, "expected an object");
        assert_eq!(err.to_string(), "invalid floor at pois[0].floor: expected an object");
    }

    #[test]
    fn identity_error_is_transparent() {
        let err = CodecError::from(IdentityError::Dangling {
            number: 7,
            at: "pois[0].floor".into(),
        });
        assert_eq!(
            err.to_string(),
            "reference 7 at pois[0].floor has no prior definition"
        );
    }
}
