#![warn(missing_docs)]

//! Versioned binary serialization of forward-time population
//! genetic simulation state with tree sequence recording.
//!
//! # Overview
//!
//! A [`Population`] snapshot (generation counter, per-individual
//! metadata, ancient samples, mutations and their sample counts,
//! ancestry tables, genetic value matrices) round-trips through a
//! versioned binary stream via [`PopulationArchive`].  Older format
//! versions load with their missing sections defaulted, and mutation
//! counts are recomputed from topology rather than trusted from the
//! stream whenever ancestry is present.
//!
//! # Where to find examples
//!
//! In the `demos/` directory of the project repository.

pub use poparchive_core::newtypes::*;
pub use poparchive_population::*;
pub use poparchive_serialization::*;
pub use poparchive_tables::*;

/// Get the poparchive version number.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
