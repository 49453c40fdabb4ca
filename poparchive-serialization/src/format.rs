//! The archive format version policy.

use crate::error::ArchiveError;
use crate::scalar;
use std::io::Read;

/// Magic tag identifying this format family.
pub const MAGIC: [u8; 4] = *b"fp11";

/// The format version written by the current library.
pub const CURRENT_FORMAT_VERSION: i32 = 3;

/// The implied version of streams that predate the magic tag.
const LEGACY_FORMAT_VERSION: i32 = 1;

/// A decoded archive format version.
///
/// The version determines which optional trailing sections a
/// stream carries; see [``FormatVersion::layout``].
///
/// | version | magic tag | genetic value matrices | status |
/// |---|---|---|---|
/// | 1 | absent | no | rejected at load |
/// | 2 | present | no | supported, matrices default empty |
/// | 3 and later | present | yes | supported |
///
/// Versions above the current one deliberately decode as
/// [``FormatVersion::Modern``]: the optional-section test is
/// "at least 3", not "exactly 3".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FormatVersion {
    /// Format version 1, including tag-less streams.
    /// No longer loadable.
    Legacy,
    /// Format version 2.
    V2,
    /// Format version 3 or later.
    Modern(i32),
}

/// Which optional sections a stream carries, derived from its
/// [``FormatVersion``].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SectionLayout {
    /// The two trailing genetic value matrices.
    pub genetic_value_matrices: bool,
}

impl FormatVersion {
    /// Decode a raw version number.
    pub fn from_raw(version: i32) -> Self {
        match version {
            v if v <= LEGACY_FORMAT_VERSION => FormatVersion::Legacy,
            2 => FormatVersion::V2,
            v => FormatVersion::Modern(v),
        }
    }

    /// The version written by this library.
    pub fn current() -> Self {
        FormatVersion::Modern(CURRENT_FORMAT_VERSION)
    }

    /// The raw version number.
    pub fn raw(self) -> i32 {
        match self {
            FormatVersion::Legacy => LEGACY_FORMAT_VERSION,
            FormatVersion::V2 => 2,
            FormatVersion::Modern(v) => v,
        }
    }

    /// `false` only for [``FormatVersion::Legacy``].
    pub fn is_supported(self) -> bool {
        !matches!(self, FormatVersion::Legacy)
    }

    /// The optional sections present in a stream of this version.
    pub fn layout(self) -> SectionLayout {
        SectionLayout {
            genetic_value_matrices: matches!(self, FormatVersion::Modern(_)),
        }
    }
}

/// Read the archive header and decode the format version.
///
/// Reads four bytes.  If they are the magic tag, a version field
/// follows and is consumed; otherwise the stream is a tag-less
/// legacy archive and carries no version field at all.  Tag-less
/// streams decode as [``FormatVersion::Legacy``], which callers
/// reject before reading any payload, so the four bytes consumed
/// here never need to be replayed.
///
/// # Errors
///
/// Stream failures propagate as [``ArchiveError::Stream``].
pub fn read_format_version<R: Read>(reader: &mut R) -> Result<FormatVersion, ArchiveError> {
    let mut tag = [0_u8; 4];
    reader.read_exact(&mut tag)?;
    if tag == MAGIC {
        Ok(FormatVersion::from_raw(scalar::read_i32(reader)?))
    } else {
        Ok(FormatVersion::Legacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_table() {
        assert_eq!(FormatVersion::from_raw(1), FormatVersion::Legacy);
        assert_eq!(FormatVersion::from_raw(0), FormatVersion::Legacy);
        assert_eq!(FormatVersion::from_raw(-7), FormatVersion::Legacy);
        assert_eq!(FormatVersion::from_raw(2), FormatVersion::V2);
        assert_eq!(FormatVersion::from_raw(3), FormatVersion::Modern(3));
        assert_eq!(FormatVersion::from_raw(4), FormatVersion::Modern(4));
    }

    #[test]
    fn test_section_layout() {
        assert!(!FormatVersion::Legacy.layout().genetic_value_matrices);
        assert!(!FormatVersion::V2.layout().genetic_value_matrices);
        assert!(FormatVersion::Modern(3).layout().genetic_value_matrices);
        // "at least", not "exactly"
        assert!(FormatVersion::Modern(17).layout().genetic_value_matrices);
    }

    #[test]
    fn test_read_header_with_magic() {
        let mut stream = vec![];
        stream.extend_from_slice(&MAGIC);
        stream.extend_from_slice(&2_i32.to_le_bytes());
        let v = read_format_version(&mut stream.as_slice()).unwrap();
        assert_eq!(v, FormatVersion::V2);
    }

    #[test]
    fn test_read_header_without_magic() {
        let stream = [0_u8, 1, 2, 3, 4, 5, 6, 7];
        let v = read_format_version(&mut stream.as_slice()).unwrap();
        assert_eq!(v, FormatVersion::Legacy);
        assert!(!v.is_supported());
    }

    #[test]
    fn test_current_version_is_supported() {
        assert!(FormatVersion::current().is_supported());
        assert_eq!(FormatVersion::current().raw(), CURRENT_FORMAT_VERSION);
    }
}
