//! Versioned binary serialization of population snapshots.
//!
//! The archive format is a fixed sequence of sections behind a
//! 4-byte magic tag and an integer format version:
//!
//! 1. magic tag `"fp11"`
//! 2. format version (`i32`)
//! 3. generation counter (`u32`)
//! 4. diploid metadata
//! 5. ancient sample metadata
//! 6. ancient sample records
//! 7. population payload (mutations, counts)
//! 8. table collection payload
//! 9. genetic value matrices (format version 3 and later)
//!
//! All scalars are little-endian.  Older streams either declare an
//! older version after the tag, or (the oldest) carry no tag at
//! all; see [`FormatVersion`] for what each version implies.
//!
//! Loading never trusts stored mutation counts when ancestry is
//! present: [`PopulationArchive::deserialize`] recomputes them from
//! topology.

mod archive;
mod error;
mod format;
mod payload;
pub mod scalar;
mod sections;

pub use archive::PopulationArchive;
pub use error::ArchiveError;
pub use format::read_format_version;
pub use format::FormatVersion;
pub use format::SectionLayout;
pub use format::CURRENT_FORMAT_VERSION;
pub use format::MAGIC;
pub use payload::BinaryPopulationPayload;
pub use payload::BinaryTablesPayload;
pub use payload::PopulationFields;
pub use payload::PopulationPayload;
pub use payload::TablesPayload;
pub use sections::read_ancient_sample_records;
pub use sections::read_diploid_metadata;
pub use sections::write_ancient_sample_records;
pub use sections::write_diploid_metadata;
