//! Codecs for the metadata and ancient-sample-record sections.
//!
//! Records are fixed-layout; each sequence is prefixed with a
//! `u64` count.

use crate::scalar;
use poparchive_core::newtypes::{DemeId, NodeId, Time};
use poparchive_population::{AncientSampleRecord, DiploidMetadata};
use std::io::{self, Read, Write};

fn write_metadata_record<W: Write>(writer: &mut W, record: &DiploidMetadata) -> io::Result<()> {
    scalar::write_f64(writer, record.genetic_value)?;
    scalar::write_f64(writer, record.environmental_value)?;
    scalar::write_f64(writer, record.fitness)?;
    for g in &record.geography {
        scalar::write_f64(writer, *g)?;
    }
    scalar::write_u64(writer, record.label)?;
    for p in &record.parents {
        scalar::write_u64(writer, *p)?;
    }
    scalar::write_i32(writer, record.deme.into_raw())?;
    scalar::write_i32(writer, record.sex)?;
    for n in &record.nodes {
        scalar::write_i32(writer, n.into_raw())?;
    }
    Ok(())
}

fn read_metadata_record<R: Read>(reader: &mut R) -> io::Result<DiploidMetadata> {
    let genetic_value = scalar::read_f64(reader)?;
    let environmental_value = scalar::read_f64(reader)?;
    let fitness = scalar::read_f64(reader)?;
    let mut geography = [0.0_f64; 3];
    for g in &mut geography {
        *g = scalar::read_f64(reader)?;
    }
    let label = scalar::read_u64(reader)?;
    let mut parents = [0_u64; 2];
    for p in &mut parents {
        *p = scalar::read_u64(reader)?;
    }
    let deme = DemeId::from(scalar::read_i32(reader)?);
    let sex = scalar::read_i32(reader)?;
    let mut nodes = [NodeId::NULL; 2];
    for n in &mut nodes {
        *n = NodeId::from(scalar::read_i32(reader)?);
    }
    Ok(DiploidMetadata {
        genetic_value,
        environmental_value,
        fitness,
        geography,
        label,
        parents,
        deme,
        sex,
        nodes,
    })
}

/// Write a metadata sequence.
pub fn write_diploid_metadata<W: Write>(
    writer: &mut W,
    records: &[DiploidMetadata],
) -> io::Result<()> {
    scalar::write_u64(writer, records.len() as u64)?;
    for record in records {
        write_metadata_record(writer, record)?;
    }
    Ok(())
}

/// Read a metadata sequence.
pub fn read_diploid_metadata<R: Read>(reader: &mut R) -> io::Result<Vec<DiploidMetadata>> {
    let n = scalar::read_u64(reader)?;
    let mut records = Vec::new();
    for _ in 0..n {
        records.push(read_metadata_record(reader)?);
    }
    Ok(records)
}

/// Write an ancient-sample-record sequence.
pub fn write_ancient_sample_records<W: Write>(
    writer: &mut W,
    records: &[AncientSampleRecord],
) -> io::Result<()> {
    scalar::write_u64(writer, records.len() as u64)?;
    for record in records {
        scalar::write_f64(writer, record.time.into_raw())?;
        for n in &record.nodes {
            scalar::write_i32(writer, n.into_raw())?;
        }
    }
    Ok(())
}

/// Read an ancient-sample-record sequence.
pub fn read_ancient_sample_records<R: Read>(
    reader: &mut R,
) -> io::Result<Vec<AncientSampleRecord>> {
    let n = scalar::read_u64(reader)?;
    let mut records = Vec::new();
    for _ in 0..n {
        let time = Time::from(scalar::read_f64(reader)?);
        let mut nodes = [NodeId::NULL; 2];
        for node in &mut nodes {
            *node = NodeId::from(scalar::read_i32(reader)?);
        }
        records.push(AncientSampleRecord { time, nodes });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(label: u64) -> DiploidMetadata {
        DiploidMetadata {
            genetic_value: 0.5,
            environmental_value: -0.25,
            fitness: 1.5,
            geography: [1.0, 2.0, 3.0],
            label,
            parents: [label, label + 1],
            deme: DemeId::from(1),
            sex: 0,
            nodes: [NodeId::from(2 * label as i32), NodeId::from(2 * label as i32 + 1)],
        }
    }

    #[test]
    fn test_metadata_roundtrip() {
        let records = vec![make_record(0), make_record(1), make_record(2)];
        let mut buffer = vec![];
        write_diploid_metadata(&mut buffer, &records).unwrap();
        let back = read_diploid_metadata(&mut buffer.as_slice()).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_empty_metadata_is_count_only() {
        let mut buffer = vec![];
        write_diploid_metadata(&mut buffer, &[]).unwrap();
        assert_eq!(buffer.len(), 8);
        assert!(read_diploid_metadata(&mut buffer.as_slice())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_ancient_sample_records_roundtrip() {
        let records = vec![
            AncientSampleRecord {
                time: Time::from(10.0),
                nodes: [NodeId::from(20), NodeId::from(21)],
            },
            AncientSampleRecord {
                time: Time::from(33.5),
                nodes: [NodeId::from(40), NodeId::from(41)],
            },
        ];
        let mut buffer = vec![];
        write_ancient_sample_records(&mut buffer, &records).unwrap();
        let back = read_ancient_sample_records(&mut buffer.as_slice()).unwrap();
        assert_eq!(back, records);
    }
}
