use bitflags::bitflags;
use poparchive_core::newtypes::{DemeId, NodeId, Position, Time};
use thiserror::Error;

/// Error type related to [``TableCollection``]
#[derive(Error, Debug, PartialEq)]
pub enum TablesError {
    /// Returned by [``TableCollection::new``].
    #[error("Invalid genome length")]
    InvalidGenomeLength,
    /// Returned when invalid node `ID`s are encountered.
    #[error("Invalid node: {found:?}")]
    InvalidNodeValue {
        /// The invalid `ID`
        found: NodeId,
    },
    /// Returned when invalid positions are encountered.
    #[error("Invalid value for position: {found:?}")]
    InvalidPosition {
        /// The invalid position
        found: Position,
    },
    /// Returned when an [``Edge``]'s left/right
    /// values are invalid.
    #[error("Invalid position range: {found:?}")]
    InvalidLeftRight {
        /// The invalid `(left, right)`.
        found: (Position, Position),
    },
    #[error("Invalid value for deme: {found:?}")]
    /// Returned when a deme's `ID` is invalid.
    InvalidDeme {
        /// The invalid deme `ID`
        found: DemeId,
    },
    /// Returned when a [``Node``]'s time field is not finite.
    #[error("Invalid Node time.")]
    InvalidNodeTime,
    #[error("Parent is NULL_ID")]
    /// Can be returned by [``validate_edge_table``]
    NullParent,
    #[error("Child is NULL_ID")]
    /// Can be returned by [``validate_edge_table``]
    NullChild,
    #[error("Node is out of bounds")]
    /// Returned when a node id does not refer
    /// to a row of the node table.
    NodeOutOfBounds,
    #[error("Node time order violation")]
    /// Can be returned by [``validate_edge_table``]
    NodeTimesUnordered,
    #[error("Parents not sorted by time")]
    /// Can be returned by [``validate_edge_table``]
    ParentTimesUnsorted,
    #[error("Parents not contiguous")]
    /// Can be returned by [``validate_edge_table``]
    ParentsNotContiguous,
    #[error("Edges not sorted by child")]
    /// Can be returned by [``validate_edge_table``]
    EdgesNotSortedByChild,
    #[error("Edges not sorted by left")]
    /// Can be returned by [``validate_edge_table``]
    EdgesNotSortedByLeft,
    #[error("Duplicate edges")]
    /// Can be returned by [``validate_edge_table``]
    DuplicateEdges,
    /// Returned when a [``MutationRecord``]'s key does not
    /// refer to a mutation.
    #[error("Mutation key out of bounds")]
    MutationKeyOutOfBounds,
    /// Returned by [``crate::count_mutations``] when a sample
    /// id is NULL or out of bounds.
    #[error("Invalid sample: {found:?}")]
    InvalidSampleId {
        /// The invalid sample id
        found: NodeId,
    },
    /// Returned by [``crate::count_mutations``] when a sample
    /// id occurs more than once.
    #[error("Duplicate sample: {found:?}")]
    DuplicateSampleId {
        /// The duplicated sample id
        found: NodeId,
    },
}

/// Result type for operations on tables
pub type TablesResult<T> = std::result::Result<T, TablesError>;

/// A Node of a tree sequence
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    /// Birth time
    pub time: Time,
    /// Population (deme) of node
    pub deme: DemeId,
    /// Bit flags
    pub flags: u32,
}

/// An Edge is a transmission event
///
/// An edge is a record of transmission of
/// a half-open chunk of genome `[left, right)`
/// from `parent` to `child`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    /// Left end
    pub left: Position,
    /// Right end
    pub right: Position,
    /// Index of parent in a [``NodeTable``]
    pub parent: NodeId,
    /// Index of child in a [``NodeTable``]
    pub child: NodeId,
}

/// A MutationRecord is the minimal information
/// needed to track a mutation on a tree sequence:
/// the node where it maps, and the index ("key")
/// of the mutation in the population's mutation vector.
///
/// The mutation's position lives with the population,
/// not here.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MutationRecord {
    /// The node where the mutation maps
    pub node: NodeId,
    /// Index of the mutation in the population
    pub key: usize,
}

/// A node table
pub type NodeTable = Vec<Node>;
/// An edge table
pub type EdgeTable = Vec<Edge>;
/// A mutation table
pub type MutationTable = Vec<MutationRecord>;

fn position_non_negative(x: Position) -> TablesResult<()> {
    if x < 0 {
        Err(TablesError::InvalidPosition { found: x })
    } else {
        Ok(())
    }
}

fn node_non_negative(x: NodeId) -> TablesResult<()> {
    if x < 0 {
        Err(TablesError::InvalidNodeValue { found: x })
    } else {
        Ok(())
    }
}

fn sort_edges(nodes: &[Node], edges: &mut [Edge]) {
    edges.sort_by(|a, b| {
        let aindex = usize::try_from(a.parent).unwrap();
        let bindex = usize::try_from(b.parent).unwrap();
        let ta = nodes[aindex].time;
        let tb = nodes[bindex].time;
        match ta.partial_cmp(&tb) {
            Some(std::cmp::Ordering::Equal) => {
                if a.parent == b.parent {
                    if a.child == b.child {
                        return a.left.cmp(&b.left);
                    }
                    a.child.cmp(&b.child)
                } else {
                    a.parent.cmp(&b.parent)
                }
            }
            Some(x) => x.reverse(),
            None => panic!("invalid parent times"),
        }
    });
}

bitflags! {
    /// Set properties of a [`Node`].
    ///
    /// The first 16 bits are reserved for internal use.
    /// Client code is free to use the remaining bits
    /// as needed.
    #[derive(Default)]
    pub struct NodeFlags: u32 {
        /// Default
        const NONE = 0;
        /// The node is a sample node.
        const IS_SAMPLE = 1 << 0;
        /// The node is alive.
        /// Usually, this is set along with
        /// IS_SAMPLE in order to distinguish
        /// living individuals from, e.g.,
        /// ancient samples.
        const IS_ALIVE = 1 << 1;
    }
}

bitflags! {
    /// Modifies behavior of
    /// [``TableCollection::validate``]
    ///
    /// ```
    /// let f = poparchive_tables::TableValidationFlags::default();
    /// assert_eq!(f.contains(poparchive_tables::TableValidationFlags::VALIDATE_ALL), true);
    /// ```
    pub struct TableValidationFlags: u32 {
        /// Validate the edge table
        const VALIDATE_EDGES = 1<<0;
        /// Validate the mutation table
        const VALIDATE_MUTATIONS = 1<<1;
        /// Validate the node table
        const VALIDATE_NODES = 1<<2;
        /// Validate all tables.
        /// This is also the "default" value.
        const VALIDATE_ALL = Self::VALIDATE_EDGES.bits|Self::VALIDATE_MUTATIONS.bits|Self::VALIDATE_NODES.bits;
    }
}

impl Default for TableValidationFlags {
    fn default() -> Self {
        TableValidationFlags::VALIDATE_ALL
    }
}

/// Perform a data integrity check on an [``EdgeTable``].
///
/// This checks, amongst other things, the sorting order
/// of the edges.
///
/// # Return
///
/// Returns ``Ok(true)`` if the tables pass all tests.
/// This return value allows this function to be used in
/// things like [``debug_assert``].
///
/// # Errors
///
/// Will return [``TablesError``] if the tables are not valid.
pub fn validate_edge_table(len: Position, edges: &[Edge], nodes: &[Node]) -> TablesResult<bool> {
    if edges.is_empty() {
        return Ok(true);
    }
    let mut parent_seen = vec![0; nodes.len()];
    let mut last_parent: usize = usize::try_from(edges[0].parent).unwrap_or(usize::MAX);
    let mut last_child: usize = usize::try_from(edges[0].child).unwrap_or(usize::MAX);
    let mut last_left: Position = edges[0].left;

    for (i, edge) in edges.iter().enumerate() {
        if edge.parent == NodeId::NULL {
            return Err(TablesError::NullParent);
        }
        if edge.child == NodeId::NULL {
            return Err(TablesError::NullChild);
        }
        if edge.parent < 0 || edge.parent.into_raw() as usize >= nodes.len() {
            return Err(TablesError::NodeOutOfBounds);
        }
        if edge.child < 0 || edge.child.into_raw() as usize >= nodes.len() {
            return Err(TablesError::NodeOutOfBounds);
        }
        if edge.left < 0 || edge.left > len {
            return Err(TablesError::InvalidPosition { found: edge.left });
        }
        if edge.right < 0 || edge.right > len {
            return Err(TablesError::InvalidPosition { found: edge.right });
        }
        if edge.left >= edge.right {
            return Err(TablesError::InvalidLeftRight {
                found: (edge.left, edge.right),
            });
        }

        let parent = edge.parent.into_raw() as usize;
        let child = edge.child.into_raw() as usize;

        // child time must be > parent time b/c time goes forwards
        if nodes[child].time <= nodes[parent].time {
            return Err(TablesError::NodeTimesUnordered);
        }

        if parent_seen[parent] == 1 {
            return Err(TablesError::ParentsNotContiguous);
        }

        if i > 0 {
            match nodes[parent].time.partial_cmp(&nodes[last_parent].time) {
                Some(std::cmp::Ordering::Greater) => {
                    return Err(TablesError::ParentTimesUnsorted);
                }
                Some(std::cmp::Ordering::Equal) => {
                    if parent == last_parent {
                        if child < last_child {
                            return Err(TablesError::EdgesNotSortedByChild);
                        }
                        if child == last_child {
                            match edge.left.cmp(&last_left) {
                                std::cmp::Ordering::Greater => (),
                                std::cmp::Ordering::Equal => {
                                    return Err(TablesError::DuplicateEdges)
                                }
                                std::cmp::Ordering::Less => {
                                    return Err(TablesError::EdgesNotSortedByLeft)
                                }
                            }
                        }
                    } else {
                        parent_seen[last_parent] = 1;
                    }
                }
                Some(_) => (),
                None => panic!("invalid node times"),
            }
        }
        last_parent = parent;
        last_child = child;
        last_left = edge.left;
    }

    Ok(true)
}

/// Check that all node times are finite.
pub fn validate_node_table(nodes: &[Node]) -> TablesResult<()> {
    for n in nodes {
        if !n.time.into_raw().is_finite() {
            return Err(TablesError::InvalidNodeTime);
        }
    }
    Ok(())
}

/// Check that mutation records refer to valid nodes and keys.
///
/// # Parameters
///
/// * `num_mutations`: the length of the population's mutation vector,
///   bounding the valid range of record keys.
pub fn validate_mutation_table(
    mutations: &[MutationRecord],
    nodes: &[Node],
    num_mutations: usize,
) -> TablesResult<()> {
    for mutation in mutations {
        if mutation.node < 0 || mutation.node.into_raw() as usize >= nodes.len() {
            return Err(TablesError::NodeOutOfBounds);
        }
        if mutation.key >= num_mutations {
            return Err(TablesError::MutationKeyOutOfBounds);
        }
    }
    Ok(())
}

/// A collection of node, edge, and mutation tables,
/// plus the list of preserved (ancient sample) nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TableCollection {
    length_: Position, // Not visible outside of this module

    pub(crate) nodes_: NodeTable,
    pub(crate) edges_: EdgeTable,
    pub(crate) mutations_: MutationTable,
    pub(crate) preserved_nodes_: Vec<NodeId>,
}

impl TableCollection {
    /// Create a new instance.
    ///
    /// # Parameters
    ///
    /// * `genome_length`: the total genome length for the tables.
    ///
    /// # Errors
    ///
    /// Will return [``TablesError``] if `genome_length < 1`.
    pub fn new<P: Into<Position>>(genome_length: P) -> TablesResult<TableCollection> {
        let p = genome_length.into();
        if p < 1 {
            return Err(TablesError::InvalidGenomeLength);
        }

        Ok(TableCollection {
            length_: p,
            nodes_: NodeTable::new(),
            edges_: EdgeTable::new(),
            mutations_: MutationTable::new(),
            preserved_nodes_: vec![],
        })
    }

    /// Assemble a collection from deserialized tables.
    ///
    /// Only the genome length is checked here; callers wanting
    /// full integrity checks should follow up with
    /// [``TableCollection::validate``].
    pub fn from_parts<P: Into<Position>>(
        genome_length: P,
        nodes: NodeTable,
        edges: EdgeTable,
        mutations: MutationTable,
        preserved_nodes: Vec<NodeId>,
    ) -> TablesResult<TableCollection> {
        let p = genome_length.into();
        if p < 1 {
            return Err(TablesError::InvalidGenomeLength);
        }
        Ok(TableCollection {
            length_: p,
            nodes_: nodes,
            edges_: edges,
            mutations_: mutations,
            preserved_nodes_: preserved_nodes,
        })
    }

    /// Add a [``Node``] to the [``NodeTable``]
    ///
    /// # Parameters
    ///
    /// * `time`, the birth time.
    /// * `deme`, the deme where the node is found.
    ///
    /// # Errors
    ///
    /// Will return [``TablesError``] if `deme < 0`.
    ///
    /// # Example
    ///
    /// ```
    /// let mut tables = poparchive_tables::TableCollection::new(100).unwrap();
    /// let id = tables.add_node(1., 0).unwrap();
    /// assert_eq!(id, 0);
    /// ```
    pub fn add_node<T: Into<Time>, D: Into<DemeId> + Copy>(
        &mut self,
        time: T,
        deme: D,
    ) -> TablesResult<NodeId> {
        self.add_node_with_flags(time, deme, NodeFlags::default().bits())
    }

    /// Add a [``Node``] to the [``NodeTable``] with flags set.
    ///
    /// # Example
    ///
    /// ```
    /// let mut tables = poparchive_tables::TableCollection::new(100).unwrap();
    /// let id = tables.add_node_with_flags(1., 0,
    ///     (poparchive_tables::NodeFlags::IS_ALIVE | poparchive_tables::NodeFlags::IS_SAMPLE).bits()).unwrap();
    /// assert_eq!(id, 0);
    /// ```
    pub fn add_node_with_flags<T: Into<Time>, D: Into<DemeId> + Copy>(
        &mut self,
        time: T,
        deme: D,
        flags: u32,
    ) -> TablesResult<NodeId> {
        let d = deme.into();
        if d < 0 {
            return Err(TablesError::InvalidDeme { found: d });
        }
        self.nodes_.push(Node {
            time: time.into(),
            deme: d,
            flags,
        });
        Ok(NodeId::from((self.nodes_.len() - 1) as i32))
    }

    /// Add an [``Edge``] to the [``EdgeTable``].
    ///
    /// # Errors
    ///
    /// Will return [``TablesError``] if any position is negative,
    /// `right <= left`, or either node id is negative.
    ///
    /// # Example
    ///
    /// ```
    /// let mut tables = poparchive_tables::TableCollection::new(100).unwrap();
    /// tables.add_edge(0, 100, 0, 1).unwrap();
    /// ```
    pub fn add_edge<P: Into<Position>, N: Into<NodeId>>(
        &mut self,
        left: P,
        right: P,
        parent: N,
        child: N,
    ) -> TablesResult<usize> {
        let left = left.into();
        let right = right.into();
        let parent = parent.into();
        let child = child.into();
        if right <= left {
            return Err(TablesError::InvalidLeftRight {
                found: (left, right),
            });
        }
        position_non_negative(left)?;
        position_non_negative(right)?;
        node_non_negative(parent)?;
        node_non_negative(child)?;

        self.edges_.push(Edge {
            left,
            right,
            parent,
            child,
        });

        Ok(self.edges_.len() - 1)
    }

    /// Add a [``MutationRecord``] to the [``MutationTable``].
    ///
    /// # Errors
    ///
    /// Will return [``TablesError``] if `node` is negative.
    pub fn add_mutation_record<N: Into<NodeId>>(
        &mut self,
        node: N,
        key: usize,
    ) -> TablesResult<usize> {
        let node = node.into();
        node_non_negative(node)?;
        self.mutations_.push(MutationRecord { node, key });
        Ok(self.mutations_.len() - 1)
    }

    /// Record a node as a preserved (ancient) sample.
    ///
    /// # Errors
    ///
    /// Will return [``TablesError``] if `node` is negative
    /// or out of bounds.
    pub fn add_preserved_node<N: Into<NodeId>>(&mut self, node: N) -> TablesResult<()> {
        let node = node.into();
        node_non_negative(node)?;
        if node.into_raw() as usize >= self.nodes_.len() {
            return Err(TablesError::NodeOutOfBounds);
        }
        self.preserved_nodes_.push(node);
        Ok(())
    }

    /// Get the genome length
    pub fn genome_length(&self) -> Position {
        self.length_
    }

    /// Return an immutable reference to the node table
    pub fn nodes(&self) -> &[Node] {
        &self.nodes_
    }

    /// Return an immutable reference to the edge table
    pub fn edges(&self) -> &[Edge] {
        &self.edges_
    }

    /// Return an immutable reference to the mutation table
    pub fn mutations(&self) -> &[MutationRecord] {
        &self.mutations_
    }

    /// Return the preserved (ancient sample) node list
    pub fn preserved_nodes(&self) -> &[NodeId] {
        &self.preserved_nodes_
    }

    /// Return the number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes_.len()
    }

    /// Sort the edge table.
    ///
    /// Edges are sorted by parent birth time, past to present,
    /// matching what [``validate_edge_table``] expects.
    pub fn sort_tables(&mut self) {
        sort_edges(&self.nodes_, &mut self.edges_);
    }

    /// Run table integrity checks.
    ///
    /// # Parameters
    ///
    /// * `flags`: see [``TableValidationFlags``].
    /// * `num_mutations`: the length of the population's mutation
    ///   vector, bounding valid mutation record keys.
    pub fn validate(
        &self,
        flags: TableValidationFlags,
        num_mutations: usize,
    ) -> TablesResult<bool> {
        if flags.contains(TableValidationFlags::VALIDATE_NODES) {
            validate_node_table(&self.nodes_)?;
        }
        if flags.contains(TableValidationFlags::VALIDATE_EDGES) {
            validate_edge_table(self.length_, &self.edges_, &self.nodes_)?;
        }
        if flags.contains(TableValidationFlags::VALIDATE_MUTATIONS) {
            validate_mutation_table(&self.mutations_, &self.nodes_, num_mutations)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_genome_length() {
        let tc = TableCollection::new(0);
        assert_eq!(tc.err(), Some(TablesError::InvalidGenomeLength));
    }

    #[test]
    fn test_add_edge_bad_positions() {
        let mut tc = TableCollection::new(10).unwrap();
        assert_eq!(
            tc.add_edge(7, 3, 0, 1).err(),
            Some(TablesError::InvalidLeftRight {
                found: (Position::from(7), Position::from(3))
            })
        );
    }

    #[test]
    fn test_add_edge_bad_nodes() {
        let mut tc = TableCollection::new(10).unwrap();
        assert!(matches!(
            tc.add_edge(0, 3, -1, 1).err(),
            Some(TablesError::InvalidNodeValue { found: _ })
        ));
    }

    #[test]
    fn test_add_node_bad_deme() {
        let mut tc = TableCollection::new(10).unwrap();
        assert!(matches!(
            tc.add_node(0., -1).err(),
            Some(TablesError::InvalidDeme { found: _ })
        ));
    }

    #[test]
    fn test_sort_and_validate_edges() {
        let mut tc = TableCollection::new(1000).unwrap();
        tc.add_node(0., 0).unwrap();
        tc.add_node(1., 0).unwrap();
        tc.add_node(2., 0).unwrap();
        tc.add_node(2., 0).unwrap();
        // deliberately out of order: the most recent parent must sort first
        tc.add_edge(0, 1000, 0, 1).unwrap();
        tc.add_edge(0, 1000, 1, 2).unwrap();
        tc.add_edge(0, 1000, 1, 3).unwrap();
        tc.sort_tables();
        assert!(tc
            .validate(TableValidationFlags::default(), 0)
            .unwrap());
        assert_eq!(tc.edges()[0].parent, 1);
        assert_eq!(tc.edges()[2].parent, 0);
    }

    #[test]
    fn test_validate_unsorted_edges() {
        let mut tc = TableCollection::new(1000).unwrap();
        tc.add_node(0., 0).unwrap();
        tc.add_node(1., 0).unwrap();
        tc.add_node(2., 0).unwrap();
        tc.add_edge(0, 1000, 0, 1).unwrap();
        tc.add_edge(0, 1000, 1, 2).unwrap();
        assert_eq!(
            validate_edge_table(tc.genome_length(), tc.edges(), tc.nodes()).err(),
            Some(TablesError::ParentTimesUnsorted)
        );
    }

    #[test]
    fn test_validate_mutation_keys() {
        let mut tc = TableCollection::new(100).unwrap();
        tc.add_node(0., 0).unwrap();
        tc.add_mutation_record(0, 3).unwrap();
        assert_eq!(
            tc.validate(TableValidationFlags::VALIDATE_MUTATIONS, 3)
                .err(),
            Some(TablesError::MutationKeyOutOfBounds)
        );
        assert!(tc
            .validate(TableValidationFlags::VALIDATE_MUTATIONS, 4)
            .is_ok());
    }

    #[test]
    fn test_preserved_node_bounds() {
        let mut tc = TableCollection::new(100).unwrap();
        tc.add_node(0., 0).unwrap();
        assert!(tc.add_preserved_node(0).is_ok());
        assert_eq!(
            tc.add_preserved_node(1).err(),
            Some(TablesError::NodeOutOfBounds)
        );
    }
}
