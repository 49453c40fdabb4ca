use crate::error::ArchiveError;
use crate::format::{read_format_version, CURRENT_FORMAT_VERSION, MAGIC};
use crate::payload::{
    BinaryPopulationPayload, BinaryTablesPayload, PopulationPayload, TablesPayload,
};
use crate::scalar;
use crate::sections;
use poparchive_core::newtypes::NodeId;
use poparchive_population::Population;
use poparchive_tables::count_mutations;
use std::io::{Read, Write};

/// Serializes and deserializes [``Population``] snapshots.
///
/// The payload sections for mutations/counts and for the table
/// collection are delegated to collaborators; the defaults are the
/// binary codecs in this crate.
///
/// # Example
///
/// ```
/// use poparchive_population::Population;
/// use poparchive_serialization::PopulationArchive;
///
/// let pop = Population::new(10, 1000).unwrap();
/// let archive = PopulationArchive::new();
/// let mut buffer = vec![];
/// archive.serialize(&pop, &mut buffer).unwrap();
/// let back = archive.deserialize(&mut buffer.as_slice()).unwrap();
/// assert_eq!(back, pop);
/// ```
pub struct PopulationArchive<P = BinaryPopulationPayload, T = BinaryTablesPayload> {
    population_io: P,
    tables_io: T,
}

impl PopulationArchive {
    /// Create an archive using the binary payload codecs.
    pub fn new() -> Self {
        Self::with_payloads(BinaryPopulationPayload, BinaryTablesPayload)
    }
}

impl Default for PopulationArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> PopulationArchive<P, T>
where
    P: PopulationPayload,
    T: TablesPayload,
{
    /// Create an archive with custom payload collaborators.
    pub fn with_payloads(population_io: P, tables_io: T) -> Self {
        Self {
            population_io,
            tables_io,
        }
    }

    /// Serialize `population` to `writer`.
    ///
    /// Always writes the current format version.  The population
    /// is read-only for the duration of the call.
    ///
    /// # Errors
    ///
    /// Stream failures propagate as [``ArchiveError::Stream``].
    pub fn serialize<W: Write>(
        &self,
        population: &Population,
        writer: &mut W,
    ) -> Result<(), ArchiveError> {
        writer.write_all(&MAGIC)?;
        scalar::write_i32(writer, CURRENT_FORMAT_VERSION)?;
        scalar::write_u32(writer, population.generation)?;
        sections::write_diploid_metadata(writer, &population.diploid_metadata)?;
        sections::write_diploid_metadata(writer, &population.ancient_sample_metadata)?;
        sections::write_ancient_sample_records(writer, &population.ancient_sample_records)?;
        self.population_io.write(writer, population)?;
        self.tables_io.write(writer, &population.tables)?;
        scalar::write_f64_vec(writer, &population.genetic_value_matrix)?;
        scalar::write_f64_vec(writer, &population.ancient_sample_genetic_value_matrix)?;
        Ok(())
    }

    /// Deserialize a population from `reader`.
    ///
    /// Streams declaring format version 1 (or carrying no magic
    /// tag at all) are rejected before any payload is read.
    ///
    /// When the loaded edge table is non-empty, the mutation
    /// counts are recomputed over the sample list
    /// `[0, 2 * num_diploids)` rather than trusted from the
    /// stream; historical formats did not persist them reliably
    /// while tree sequence recording was active.  With an empty
    /// edge table, the stream's counts stand.
    ///
    /// # Errors
    ///
    /// [``ArchiveError::FormatUnsupported``] for version-1
    /// streams; stream failures propagate unchanged.  On any
    /// error, no population is returned.
    pub fn deserialize<R: Read>(&self, reader: &mut R) -> Result<Population, ArchiveError> {
        let version = read_format_version(reader)?;
        if !version.is_supported() {
            return Err(ArchiveError::FormatUnsupported {
                version: version.raw(),
            });
        }
        let generation = scalar::read_u32(reader)?;
        let diploid_metadata = sections::read_diploid_metadata(reader)?;
        let ancient_sample_metadata = sections::read_diploid_metadata(reader)?;
        let ancient_sample_records = sections::read_ancient_sample_records(reader)?;
        let fields = self.population_io.read(reader)?;
        let tables = self.tables_io.read(reader)?;

        let (mcounts, mcounts_from_preserved_nodes) = if !tables.edges().is_empty() {
            let positions: Vec<_> = fields.mutations.iter().map(|m| m.position).collect();
            let samples: Vec<NodeId> = (0..2 * fields.num_diploids as i32)
                .map(NodeId::from)
                .collect();
            count_mutations(&tables, &positions, &samples)?
        } else {
            (fields.mcounts, fields.mcounts_from_preserved_nodes)
        };

        let (genetic_value_matrix, ancient_sample_genetic_value_matrix) =
            if version.layout().genetic_value_matrices {
                (
                    scalar::read_f64_vec(reader)?,
                    scalar::read_f64_vec(reader)?,
                )
            } else {
                (vec![], vec![])
            };

        Ok(Population {
            generation,
            num_diploids: fields.num_diploids,
            diploid_metadata,
            ancient_sample_metadata,
            ancient_sample_records,
            mutations: fields.mutations,
            mcounts,
            mcounts_from_preserved_nodes,
            tables,
            genetic_value_matrix,
            ancient_sample_genetic_value_matrix,
        })
    }
}
