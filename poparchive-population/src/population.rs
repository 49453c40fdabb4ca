use crate::metadata::{AncientSampleRecord, DiploidMetadata};
use crate::mutation::Mutation;
use poparchive_core::newtypes::Position;
use poparchive_tables::{TableCollection, TablesError};
use thiserror::Error;

/// Error type for [``Population``] operations.
#[derive(Error, Debug, PartialEq)]
pub enum PopulationError {
    /// Returned by [``Population::new``].
    #[error("Invalid population size")]
    InvalidPopulationSize,
    /// A node reference that cannot be resolved.
    #[error("node reference for individual {individual} is out of range")]
    NodeOutOfRange {
        /// The offending individual's index
        individual: usize,
    },
    /// A node reference that is NULL after an id remap.
    #[error("node reference for individual {individual} is null after remap")]
    NullNodeAfterRemap {
        /// The offending individual's index
        individual: usize,
    },
    /// A redirection of [``TablesError``].
    #[error("{0:?}")]
    TablesError(#[from] TablesError),
}

/// Result type for operations on populations
pub type PopulationResult<T> = std::result::Result<T, PopulationError>;

/// The full state of a forward-time simulation at one instant.
///
/// Field order matters to serialization, which writes the
/// generation counter, metadata sequences, ancient sample records,
/// mutations and counts, tables, and finally the genetic value
/// matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    /// Generation counter
    pub generation: u32,
    /// Number of currently-alive diploid individuals
    pub num_diploids: u32,
    /// Metadata for currently-alive individuals.
    /// Index in this vector is individual id.
    pub diploid_metadata: Vec<DiploidMetadata>,
    /// Metadata for preserved ancient samples
    pub ancient_sample_metadata: Vec<DiploidMetadata>,
    /// Bookkeeping for preserved ancient samples
    pub ancient_sample_records: Vec<AncientSampleRecord>,
    /// Segregating mutations
    pub mutations: Vec<Mutation>,
    /// Number of alive sample genomes carrying each mutation,
    /// indexed by mutation key
    pub mcounts: Vec<u32>,
    /// Number of preserved sample genomes carrying each mutation,
    /// indexed by mutation key
    pub mcounts_from_preserved_nodes: Vec<u32>,
    /// The ancestry tables.  May be empty when tree sequence
    /// recording is not in use.
    pub tables: TableCollection,
    /// Genetic values of alive individuals, flattened
    pub genetic_value_matrix: Vec<f64>,
    /// Genetic values of preserved ancient samples, flattened
    pub ancient_sample_genetic_value_matrix: Vec<f64>,
}

impl Population {
    /// Create a population of `num_diploids` individuals with
    /// default metadata and empty tables over a genome of length
    /// `genome_length`.
    ///
    /// # Errors
    ///
    /// [``PopulationError``] if `num_diploids < 1` or the genome
    /// length is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// let pop = poparchive_population::Population::new(10, 1000).unwrap();
    /// assert_eq!(pop.generation, 0);
    /// assert_eq!(pop.diploid_metadata.len(), 10);
    /// ```
    pub fn new<P: Into<Position>>(num_diploids: u32, genome_length: P) -> PopulationResult<Self> {
        if num_diploids < 1 {
            return Err(PopulationError::InvalidPopulationSize);
        }
        let diploid_metadata = (0..u64::from(num_diploids))
            .map(DiploidMetadata::new_default)
            .collect();
        Ok(Self {
            generation: 0,
            num_diploids,
            diploid_metadata,
            ancient_sample_metadata: vec![],
            ancient_sample_records: vec![],
            mutations: vec![],
            mcounts: vec![],
            mcounts_from_preserved_nodes: vec![],
            tables: TableCollection::new(genome_length)?,
            genetic_value_matrix: vec![],
            ancient_sample_genetic_value_matrix: vec![],
        })
    }

    /// Positions of all mutations, indexed by mutation key.
    ///
    /// This is the form [``poparchive_tables::count_mutations``]
    /// consumes.
    pub fn mutation_positions(&self) -> Vec<Position> {
        self.mutations.iter().map(|m| m.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_population() {
        let pop = Population::new(4, 100).unwrap();
        assert_eq!(pop.num_diploids, 4);
        assert_eq!(pop.diploid_metadata.len(), 4);
        assert_eq!(pop.diploid_metadata[3].nodes[1], 7);
        assert!(pop.tables.edges().is_empty());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            Population::new(0, 100).err(),
            Some(PopulationError::InvalidPopulationSize)
        );
    }

    #[test]
    fn test_bad_genome_length_redirects() {
        assert_eq!(
            Population::new(1, 0).err(),
            Some(PopulationError::TablesError(
                TablesError::InvalidGenomeLength
            ))
        );
    }
}
