//! Tree sequence tables for poparchive.
//!
//! This crate defines the [`TableCollection`] describing ancestry
//! (nodes, edges, mutation records, preserved nodes) plus
//! [`count_mutations`], which rederives per-mutation sample counts
//! from topology.

mod count_mutations;
mod tables;

pub use count_mutations::count_mutations;
pub use tables::validate_edge_table;
pub use tables::validate_mutation_table;
pub use tables::validate_node_table;
pub use tables::Edge;
pub use tables::EdgeTable;
pub use tables::MutationRecord;
pub use tables::MutationTable;
pub use tables::Node;
pub use tables::NodeFlags;
pub use tables::NodeTable;
pub use tables::TableCollection;
pub use tables::TableValidationFlags;
pub use tables::TablesError;
pub use tables::TablesResult;
