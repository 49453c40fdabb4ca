//! Collaborator interfaces for the opaque payload sections, and
//! their binary implementations.
//!
//! The archive treats the population payload (mutations and
//! counts) and the table collection payload as opaque blobs
//! owned by these collaborators, so the header/versioning logic
//! can be tested against stubs.

use crate::error::ArchiveError;
use crate::scalar;
use poparchive_core::newtypes::{DemeId, NodeId, Position, Time};
use poparchive_population::{Mutation, Population};
use poparchive_tables::{Edge, MutationRecord, Node, TableCollection};
use std::io::{Read, Write};

/// The fields owned by the population payload section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopulationFields {
    /// Number of currently-alive diploids
    pub num_diploids: u32,
    /// Segregating mutations
    pub mutations: Vec<Mutation>,
    /// Stored mutation counts over alive samples
    pub mcounts: Vec<u32>,
    /// Stored mutation counts over preserved samples
    pub mcounts_from_preserved_nodes: Vec<u32>,
}

/// Writes and reads the population payload section.
pub trait PopulationPayload {
    /// Write the payload fields of `population`.
    fn write<W: Write>(
        &self,
        writer: &mut W,
        population: &Population,
    ) -> Result<(), ArchiveError>;

    /// Read the payload fields.
    fn read<R: Read>(&self, reader: &mut R) -> Result<PopulationFields, ArchiveError>;
}

/// Writes and reads the table collection payload section.
pub trait TablesPayload {
    /// Write `tables`.
    fn write<W: Write>(&self, writer: &mut W, tables: &TableCollection)
        -> Result<(), ArchiveError>;

    /// Read a table collection.
    fn read<R: Read>(&self, reader: &mut R) -> Result<TableCollection, ArchiveError>;
}

/// The binary population payload codec.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryPopulationPayload;

impl PopulationPayload for BinaryPopulationPayload {
    fn write<W: Write>(
        &self,
        writer: &mut W,
        population: &Population,
    ) -> Result<(), ArchiveError> {
        scalar::write_u32(writer, population.num_diploids)?;
        scalar::write_u64(writer, population.mutations.len() as u64)?;
        for mutation in &population.mutations {
            scalar::write_i64(writer, mutation.position.into_raw())?;
            scalar::write_f64(writer, mutation.effect_size)?;
            scalar::write_f64(writer, mutation.dominance)?;
            scalar::write_u32(writer, mutation.origin)?;
            scalar::write_u16(writer, mutation.label)?;
            scalar::write_bool(writer, mutation.neutral)?;
        }
        scalar::write_u32_vec(writer, &population.mcounts)?;
        scalar::write_u32_vec(writer, &population.mcounts_from_preserved_nodes)?;
        Ok(())
    }

    fn read<R: Read>(&self, reader: &mut R) -> Result<PopulationFields, ArchiveError> {
        let num_diploids = scalar::read_u32(reader)?;
        let num_mutations = scalar::read_u64(reader)?;
        let mut mutations = Vec::new();
        for _ in 0..num_mutations {
            let position = Position::from(scalar::read_i64(reader)?);
            let effect_size = scalar::read_f64(reader)?;
            let dominance = scalar::read_f64(reader)?;
            let origin = scalar::read_u32(reader)?;
            let label = scalar::read_u16(reader)?;
            let neutral = scalar::read_bool(reader)?;
            mutations.push(Mutation {
                position,
                effect_size,
                dominance,
                origin,
                label,
                neutral,
            });
        }
        let mcounts = scalar::read_u32_vec(reader)?;
        let mcounts_from_preserved_nodes = scalar::read_u32_vec(reader)?;
        Ok(PopulationFields {
            num_diploids,
            mutations,
            mcounts,
            mcounts_from_preserved_nodes,
        })
    }
}

/// The binary table collection payload codec.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryTablesPayload;

impl TablesPayload for BinaryTablesPayload {
    fn write<W: Write>(
        &self,
        writer: &mut W,
        tables: &TableCollection,
    ) -> Result<(), ArchiveError> {
        scalar::write_i64(writer, tables.genome_length().into_raw())?;
        scalar::write_u64(writer, tables.nodes().len() as u64)?;
        for node in tables.nodes() {
            scalar::write_f64(writer, node.time.into_raw())?;
            scalar::write_i32(writer, node.deme.into_raw())?;
            scalar::write_u32(writer, node.flags)?;
        }
        scalar::write_u64(writer, tables.edges().len() as u64)?;
        for edge in tables.edges() {
            scalar::write_i64(writer, edge.left.into_raw())?;
            scalar::write_i64(writer, edge.right.into_raw())?;
            scalar::write_i32(writer, edge.parent.into_raw())?;
            scalar::write_i32(writer, edge.child.into_raw())?;
        }
        scalar::write_u64(writer, tables.mutations().len() as u64)?;
        for record in tables.mutations() {
            scalar::write_i32(writer, record.node.into_raw())?;
            scalar::write_u64(writer, record.key as u64)?;
        }
        scalar::write_u64(writer, tables.preserved_nodes().len() as u64)?;
        for node in tables.preserved_nodes() {
            scalar::write_i32(writer, node.into_raw())?;
        }
        Ok(())
    }

    fn read<R: Read>(&self, reader: &mut R) -> Result<TableCollection, ArchiveError> {
        let genome_length = scalar::read_i64(reader)?;
        let num_nodes = scalar::read_u64(reader)?;
        let mut nodes = Vec::new();
        for _ in 0..num_nodes {
            let time = Time::from(scalar::read_f64(reader)?);
            let deme = DemeId::from(scalar::read_i32(reader)?);
            let flags = scalar::read_u32(reader)?;
            nodes.push(Node { time, deme, flags });
        }
        let num_edges = scalar::read_u64(reader)?;
        let mut edges = Vec::new();
        for _ in 0..num_edges {
            let left = Position::from(scalar::read_i64(reader)?);
            let right = Position::from(scalar::read_i64(reader)?);
            let parent = NodeId::from(scalar::read_i32(reader)?);
            let child = NodeId::from(scalar::read_i32(reader)?);
            edges.push(Edge {
                left,
                right,
                parent,
                child,
            });
        }
        let num_mutations = scalar::read_u64(reader)?;
        let mut mutations = Vec::new();
        for _ in 0..num_mutations {
            let node = NodeId::from(scalar::read_i32(reader)?);
            let key = scalar::read_u64(reader)? as usize;
            mutations.push(MutationRecord { node, key });
        }
        let num_preserved = scalar::read_u64(reader)?;
        let mut preserved_nodes = Vec::new();
        for _ in 0..num_preserved {
            preserved_nodes.push(NodeId::from(scalar::read_i32(reader)?));
        }
        Ok(TableCollection::from_parts(
            genome_length,
            nodes,
            edges,
            mutations,
            preserved_nodes,
        )?)
    }
}
