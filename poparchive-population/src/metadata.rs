use crate::population::{PopulationError, PopulationResult};
use poparchive_core::newtypes::{DemeId, NodeId, Time};

/// Per-individual metadata for a diploid.
///
/// One record exists per currently-alive individual, and one per
/// preserved ancient sample.  The index of a record in the alive
/// sequence is the individual's id.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiploidMetadata {
    /// Genetic value
    pub genetic_value: f64,
    /// Random/environmental value
    pub environmental_value: f64,
    /// Fitness
    pub fitness: f64,
    /// Spatial location
    pub geography: [f64; 3],
    /// Individual label
    pub label: u64,
    /// Labels of the two parents
    pub parents: [u64; 2],
    /// Deme of the individual
    pub deme: DemeId,
    /// Sex, client-defined encoding
    pub sex: i32,
    /// The individual's two genome nodes
    pub nodes: [NodeId; 2],
}

impl DiploidMetadata {
    /// Create a record for individual `label` whose genomes are
    /// nodes `2*label` and `2*label + 1`.
    pub fn new_default(label: u64) -> Self {
        Self {
            genetic_value: 0.0,
            environmental_value: 0.0,
            fitness: 1.0,
            geography: [0.0; 3],
            label,
            parents: [0, 0],
            deme: DemeId::from(0),
            sex: -1,
            nodes: [
                NodeId::from((2 * label) as i32),
                NodeId::from((2 * label + 1) as i32),
            ],
        }
    }
}

/// Bookkeeping for one preserved ancient sample: when it was
/// preserved, and the node ids of its two genomes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AncientSampleRecord {
    /// Time of preservation
    pub time: Time,
    /// The preserved individual's two genome nodes
    pub nodes: [NodeId; 2],
}

/// Apply a node id map to the node fields of metadata records.
///
/// After table simplification, node ids change; `idmap` gives the
/// new id of each input node, with [``NodeId::NULL``] marking nodes
/// that were removed.  A metadata record whose node maps to NULL is
/// corrupt, and the entire operation fails.
///
/// # Errors
///
/// [``PopulationError::NullNodeAfterRemap``] if any record's node
/// maps to NULL; [``PopulationError::NodeOutOfRange``] if a node is
/// not covered by `idmap`.
pub fn remap_metadata_nodes(
    records: &mut [DiploidMetadata],
    idmap: &[NodeId],
) -> PopulationResult<()> {
    for (individual, record) in records.iter_mut().enumerate() {
        let mut remapped = [NodeId::NULL; 2];
        for (slot, node) in record.nodes.iter().enumerate() {
            let index =
                usize::try_from(*node).map_err(|_| PopulationError::NodeOutOfRange { individual })?;
            let new_node = *idmap
                .get(index)
                .ok_or(PopulationError::NodeOutOfRange { individual })?;
            if new_node.is_null() {
                return Err(PopulationError::NullNodeAfterRemap { individual });
            }
            remapped[slot] = new_node;
        }
        record.nodes = remapped;
    }
    Ok(())
}
