//! Recompute per-mutation sample counts from topology.

use crate::tables::{TableCollection, TablesError, TablesResult};
use poparchive_core::newtypes::{NodeId, Position};

// Per-node state for the left-to-right sweep: the current parent
// of each node, plus how many alive/preserved sample leaves descend
// from it in the current tree.
struct SweepState {
    parent: Vec<NodeId>,
    alive_counts: Vec<u32>,
    preserved_counts: Vec<u32>,
}

impl SweepState {
    fn new(
        num_nodes: usize,
        alive_samples: &[NodeId],
        preserved_nodes: &[NodeId],
    ) -> TablesResult<Self> {
        let mut state = SweepState {
            parent: vec![NodeId::NULL; num_nodes],
            alive_counts: vec![0; num_nodes],
            preserved_counts: vec![0; num_nodes],
        };
        let mut seen = vec![false; num_nodes];
        for s in alive_samples {
            let i = validate_sample(*s, num_nodes)?;
            if seen[i] {
                return Err(TablesError::DuplicateSampleId { found: *s });
            }
            seen[i] = true;
            state.alive_counts[i] = 1;
        }
        seen.iter_mut().for_each(|x| *x = false);
        for s in preserved_nodes {
            let i = validate_sample(*s, num_nodes)?;
            if seen[i] {
                return Err(TablesError::DuplicateSampleId { found: *s });
            }
            seen[i] = true;
            state.preserved_counts[i] = 1;
        }
        Ok(state)
    }

    fn propagate(&mut self, from: NodeId, alive: i64, preserved: i64) {
        if alive == 0 && preserved == 0 {
            return;
        }
        let mut u = from;
        while !u.is_null() {
            let i = u.into_raw() as usize;
            self.alive_counts[i] = (i64::from(self.alive_counts[i]) + alive) as u32;
            self.preserved_counts[i] = (i64::from(self.preserved_counts[i]) + preserved) as u32;
            u = self.parent[i];
        }
    }

    fn insert_edge(&mut self, parent: NodeId, child: NodeId) {
        let c = child.into_raw() as usize;
        self.parent[c] = parent;
        let alive = i64::from(self.alive_counts[c]);
        let preserved = i64::from(self.preserved_counts[c]);
        self.propagate(parent, alive, preserved);
    }

    fn remove_edge(&mut self, parent: NodeId, child: NodeId) {
        let c = child.into_raw() as usize;
        let alive = i64::from(self.alive_counts[c]);
        let preserved = i64::from(self.preserved_counts[c]);
        self.propagate(parent, -alive, -preserved);
        self.parent[c] = NodeId::NULL;
    }
}

fn validate_sample(s: NodeId, num_nodes: usize) -> TablesResult<usize> {
    if s.is_null() {
        return Err(TablesError::InvalidSampleId { found: s });
    }
    let i = s.into_raw() as usize;
    if i >= num_nodes {
        return Err(TablesError::InvalidSampleId { found: s });
    }
    Ok(i)
}

fn node_index(n: NodeId, num_nodes: usize) -> TablesResult<usize> {
    if n < 0 || n.into_raw() as usize >= num_nodes {
        return Err(TablesError::NodeOutOfBounds);
    }
    Ok(n.into_raw() as usize)
}

/// Count, for each mutation, the number of sample genomes carrying it.
///
/// The counts are rederived from the topology in `tables`, never from
/// any previously-stored values.  Two sets of counts are produced:
/// one over `alive_samples`, and one over the table collection's
/// preserved (ancient sample) nodes.  Both result vectors are indexed
/// by mutation key and have length `mutation_positions.len()`;
/// mutations absent from the mutation table are left at zero.
///
/// # Parameters
///
/// * `tables`: the ancestry to count over.
/// * `mutation_positions`: position of each mutation, indexed by key.
/// * `alive_samples`: the sample nodes of the currently-alive individuals.
///
/// # Errors
///
/// Will return [``TablesError``] if a sample id is NULL, out of bounds,
/// or duplicated, or if a mutation record refers to an invalid node
/// or key.
pub fn count_mutations(
    tables: &TableCollection,
    mutation_positions: &[Position],
    alive_samples: &[NodeId],
) -> TablesResult<(Vec<u32>, Vec<u32>)> {
    let num_nodes = tables.num_nodes();
    let edges = tables.edges();
    let mutations = tables.mutations();

    let mut state = SweepState::new(num_nodes, alive_samples, tables.preserved_nodes())?;

    let mut mcounts = vec![0_u32; mutation_positions.len()];
    let mut mcounts_from_preserved_nodes = vec![0_u32; mutation_positions.len()];

    // Visit mutations in position order.
    let mut mutation_order: Vec<usize> = (0..mutations.len()).collect();
    for m in mutations {
        node_index(m.node, num_nodes)?;
        if m.key >= mutation_positions.len() {
            return Err(TablesError::MutationKeyOutOfBounds);
        }
    }
    mutation_order.sort_by_key(|i| mutation_positions[mutations[*i].key]);

    let mut input_order: Vec<usize> = (0..edges.len()).collect();
    input_order.sort_by_key(|i| edges[*i].left);
    let mut output_order: Vec<usize> = (0..edges.len()).collect();
    output_order.sort_by_key(|i| edges[*i].right);
    for e in edges {
        node_index(e.parent, num_nodes)?;
        node_index(e.child, num_nodes)?;
    }

    let genome_length = tables.genome_length();
    let mut input_index = 0;
    let mut output_index = 0;
    let mut mutation_index = 0;
    let mut x = Position::from(0);

    while input_index < input_order.len() || x < genome_length {
        while output_index < output_order.len() && edges[output_order[output_index]].right == x {
            let edge = edges[output_order[output_index]];
            state.remove_edge(edge.parent, edge.child);
            output_index += 1;
        }
        while input_index < input_order.len() && edges[input_order[input_index]].left == x {
            let edge = edges[input_order[input_index]];
            state.insert_edge(edge.parent, edge.child);
            input_index += 1;
        }

        let mut right = genome_length;
        if input_index < input_order.len() {
            right = std::cmp::min(right, edges[input_order[input_index]].left);
        }
        if output_index < output_order.len() {
            right = std::cmp::min(right, edges[output_order[output_index]].right);
        }

        while mutation_index < mutation_order.len()
            && mutation_positions[mutations[mutation_order[mutation_index]].key] < right
        {
            let record = mutations[mutation_order[mutation_index]];
            let node = record.node.into_raw() as usize;
            mcounts[record.key] = state.alive_counts[node];
            mcounts_from_preserved_nodes[record.key] = state.preserved_counts[node];
            mutation_index += 1;
        }

        x = right;
    }

    Ok((mcounts, mcounts_from_preserved_nodes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{NodeFlags, TableValidationFlags};

    // The two trees are:
    //  0
    // +++
    // | |  1
    // | | +++
    // 2 3 4 5
    //
    //     0
    //   +-+-+
    //   1   |
    // +-+-+ |
    // 2 4 5 3
    fn make_two_tree_tables() -> TableCollection {
        let mut tables = TableCollection::new(1000).unwrap();
        tables.add_node(0., 0).unwrap();
        tables.add_node(1., 0).unwrap();
        for _ in 0..4 {
            tables
                .add_node_with_flags(2., 0, NodeFlags::IS_SAMPLE.bits())
                .unwrap();
        }
        tables.add_edge(500, 1000, 0, 1).unwrap();
        tables.add_edge(0, 500, 0, 2).unwrap();
        tables.add_edge(0, 1000, 0, 3).unwrap();
        tables.add_edge(500, 1000, 1, 2).unwrap();
        tables.add_edge(0, 1000, 1, 4).unwrap();
        tables.add_edge(0, 1000, 1, 5).unwrap();
        tables.sort_tables();
        tables
            .validate(TableValidationFlags::VALIDATE_ALL, usize::MAX)
            .unwrap();
        tables
    }

    fn samples() -> Vec<NodeId> {
        vec![2.into(), 3.into(), 4.into(), 5.into()]
    }

    #[test]
    fn test_counts_on_two_trees() {
        let mut tables = make_two_tree_tables();
        // key 0: pos 100 on node 0 -> {2, 3} in the first tree
        // key 1: pos 700 on node 0 -> all four samples in the second tree
        // key 2: pos 600 on node 1 -> {2, 4, 5} in the second tree
        // key 3: pos 200 on node 4 -> {4}
        tables.add_mutation_record(0, 0).unwrap();
        tables.add_mutation_record(0, 1).unwrap();
        tables.add_mutation_record(1, 2).unwrap();
        tables.add_mutation_record(4, 3).unwrap();
        let positions = vec![
            Position::from(100),
            Position::from(700),
            Position::from(600),
            Position::from(200),
        ];
        let (mcounts, preserved) = count_mutations(&tables, &positions, &samples()).unwrap();
        assert_eq!(mcounts, vec![2, 4, 3, 1]);
        assert_eq!(preserved, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_counts_with_preserved_nodes() {
        let mut tables = make_two_tree_tables();
        tables.add_mutation_record(0, 0).unwrap();
        tables.add_mutation_record(1, 1).unwrap();
        tables.add_preserved_node(3).unwrap();
        let positions = vec![Position::from(100), Position::from(600)];
        // Node 3 is preserved rather than alive.
        let alive: Vec<NodeId> = vec![2.into(), 4.into(), 5.into()];
        let (mcounts, preserved) = count_mutations(&tables, &positions, &alive).unwrap();
        // pos 100 on node 0: alive {2}, preserved {3}
        assert_eq!(mcounts[0], 1);
        assert_eq!(preserved[0], 1);
        // pos 600 on node 1: alive {2, 4, 5}, no preserved below
        assert_eq!(mcounts[1], 3);
        assert_eq!(preserved[1], 0);
    }

    #[test]
    fn test_empty_edge_table_yields_zero_counts() {
        let mut tables = TableCollection::new(1000).unwrap();
        tables.add_node(0., 0).unwrap();
        tables.add_mutation_record(0, 0).unwrap();
        let positions = vec![Position::from(10)];
        let (mcounts, preserved) =
            count_mutations(&tables, &positions, &[NodeId::from(0)]).unwrap();
        assert_eq!(mcounts, vec![0]);
        assert_eq!(preserved, vec![0]);
    }

    #[test]
    fn test_mutation_key_out_of_bounds() {
        let mut tables = make_two_tree_tables();
        tables.add_mutation_record(0, 5).unwrap();
        let positions = vec![Position::from(100)];
        assert_eq!(
            count_mutations(&tables, &positions, &samples()).err(),
            Some(TablesError::MutationKeyOutOfBounds)
        );
    }

    #[test]
    fn test_duplicate_samples_rejected() {
        let tables = make_two_tree_tables();
        let dups: Vec<NodeId> = vec![2.into(), 2.into()];
        assert!(matches!(
            count_mutations(&tables, &[], &dups).err(),
            Some(TablesError::DuplicateSampleId { found: _ })
        ));
    }

    #[test]
    fn test_invalid_sample_rejected() {
        let tables = make_two_tree_tables();
        let bad: Vec<NodeId> = vec![NodeId::NULL];
        assert!(matches!(
            count_mutations(&tables, &[], &bad).err(),
            Some(TablesError::InvalidSampleId { found: _ })
        ));
    }

    #[test]
    fn test_sample_node_counts_itself() {
        let mut tables = make_two_tree_tables();
        tables.add_mutation_record(5, 0).unwrap();
        let positions = vec![Position::from(50)];
        let (mcounts, _) = count_mutations(&tables, &positions, &samples()).unwrap();
        assert_eq!(mcounts, vec![1]);
    }
}
