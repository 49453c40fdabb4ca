//! Population snapshot types for poparchive.
//!
//! A [`Population`] is the full state of a forward-time simulation
//! at one instant: the generation counter, per-individual metadata,
//! ancient sample bookkeeping, segregating mutations and their
//! sample counts, the tree sequence tables, and the genetic value
//! matrices.

mod metadata;
mod mutation;
mod population;

pub use metadata::remap_metadata_nodes;
pub use metadata::AncientSampleRecord;
pub use metadata::DiploidMetadata;
pub use mutation::Mutation;
pub use population::Population;
pub use population::PopulationError;
pub use population::PopulationResult;
