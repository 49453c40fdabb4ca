use poparchive_population::PopulationError;
use poparchive_tables::TablesError;
use thiserror::Error;

/// Primary error type for archive operations.
///
/// Stream failures are propagated from the transport unchanged,
/// never wrapped or retried.  There is no partial-success mode:
/// a failed load returns no population.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The stream declares a format version this library no
    /// longer supports.
    #[error("archive format version {version} is no longer supported")]
    FormatUnsupported {
        /// The declared version
        version: i32,
    },
    /// A redirection of the transport's error.
    #[error(transparent)]
    Stream(#[from] std::io::Error),
    /// A redirection of [``TablesError``].
    #[error("{0:?}")]
    Tables(#[from] TablesError),
    /// A redirection of [``PopulationError``].
    #[error("{0:?}")]
    Population(#[from] PopulationError),
}
