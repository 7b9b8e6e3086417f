//! Value model for Strata.
//!
//! Every input to and output from the diff engine is a [`Value`]: a
//! recursive union of scalars, ordered sequences and string-keyed mappings.
//! This crate owns the model itself and the conversions from the external
//! representations Strata reads (JSON and TOML).
//!
//! # Key Types
//!
//! - [`Value`] -- Recursive scalar/sequence/mapping union
//! - [`Scalar`] -- Type-tagged leaf (`Null`, `Bool`, `Int`, `Float`, `String`)
//! - [`ValueKind`] -- The runtime variant of a value, used for dispatch
//! - [`Map`] -- Insertion-ordered mapping storage

pub mod convert;
pub mod error;
pub mod value;

pub use error::{Result, ValueError};
pub use value::{Map, Scalar, Value, ValueKind};
