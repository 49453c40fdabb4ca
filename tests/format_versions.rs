use poparchive::*;

fn serialized(pop: &Population) -> Vec<u8> {
    let mut buffer = vec![];
    PopulationArchive::new().serialize(pop, &mut buffer).unwrap();
    buffer
}

// Compose a stream as an older library version would have
// written it: magic, the requested version, then every section
// up to and including the tables, and nothing after.
fn downgrade_to(version: i32, pop: &Population) -> Vec<u8> {
    let current = serialized(pop);
    let trailing = 16
        + 8 * pop.genetic_value_matrix.len()
        + 8 * pop.ancient_sample_genetic_value_matrix.len();
    let mut stream = vec![];
    stream.extend_from_slice(&MAGIC);
    stream.extend_from_slice(&version.to_le_bytes());
    stream.extend_from_slice(&current[8..current.len() - trailing]);
    stream
}

#[test]
fn test_version_2_defaults_matrices_empty() {
    let mut pop = Population::new(10, 1000).unwrap();
    pop.generation = 7;
    pop.genetic_value_matrix = vec![1.0; 10];
    let stream = downgrade_to(2, &pop);
    let back = PopulationArchive::new()
        .deserialize(&mut stream.as_slice())
        .unwrap();
    assert_eq!(back.generation, 7);
    assert_eq!(back.diploid_metadata.len(), 10);
    assert!(back.genetic_value_matrix.is_empty());
    assert!(back.ancient_sample_genetic_value_matrix.is_empty());
}

#[test]
fn test_version_1_rejected() {
    let pop = Population::new(5, 1000).unwrap();
    let stream = downgrade_to(1, &pop);
    match PopulationArchive::new().deserialize(&mut stream.as_slice()) {
        Err(ArchiveError::FormatUnsupported { version }) => assert_eq!(version, 1),
        _ => panic!("expected FormatUnsupported"),
    }
}

#[test]
fn test_tagless_stream_rejected() {
    let pop = Population::new(5, 1000).unwrap();
    let current = serialized(&pop);
    // Strip the tag and version: what remains opens like a
    // pre-versioning stream.
    let stream = &current[8..];
    match PopulationArchive::new().deserialize(&mut &stream[..]) {
        Err(ArchiveError::FormatUnsupported { version }) => assert_eq!(version, 1),
        _ => panic!("expected FormatUnsupported"),
    }
}

#[test]
fn test_future_version_treated_as_current() {
    let mut pop = Population::new(3, 1000).unwrap();
    pop.genetic_value_matrix = vec![2.0, 4.0, 8.0];
    let mut stream = serialized(&pop);
    // Bump the declared version beyond what this library writes.
    stream[4..8].copy_from_slice(&12_i32.to_le_bytes());
    let back = PopulationArchive::new()
        .deserialize(&mut stream.as_slice())
        .unwrap();
    assert_eq!(back.genetic_value_matrix, vec![2.0, 4.0, 8.0]);
}

#[test]
fn test_header_utility_reads_version() {
    let pop = Population::new(2, 100).unwrap();
    let stream = serialized(&pop);
    let v = read_format_version(&mut stream.as_slice()).unwrap();
    assert_eq!(v, FormatVersion::Modern(CURRENT_FORMAT_VERSION));
    assert_eq!(v.raw(), CURRENT_FORMAT_VERSION);
}
