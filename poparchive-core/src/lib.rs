//! Core types for poparchive.
//!
//! The id and coordinate newtypes defined here are shared by
//! the table, population, and serialization crates.

use thiserror::Error;

mod macros;
pub mod newtypes;
pub mod prelude;

pub use newtypes::{DemeId, NodeId, Position, Time};

/// Primary error type for this crate.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// An invalid [``Position``] value.
    #[error("invalid position: {0:?}")]
    PositionError(i64),
    /// A failed conversion between an id type
    /// and an integer type.
    #[error("{0:?}")]
    ConversionError(String),
}
