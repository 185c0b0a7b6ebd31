//! Reordering of caller-supplied node data into canonical node order.

use glam::IVec3;
use polyscope_core::{PolyscopeError, Result};

use super::indexing::lex_key;

/// Node data in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalNodeValues<T> {
    /// One value per canonical node.
    pub values: Vec<T>,
    /// Whether the input already listed exactly the canonical nodes in order.
    pub was_canonical: bool,
}

/// Reorders `node_values` (keyed by `node_indices`) into the order of `canonical`.
///
/// Entries for nodes that are not canonical are ignored. Every canonical node
/// must be present; if a node appears more than once, its first occurrence in
/// sorted order wins.
pub fn canonicalize_node_values<T: Clone>(
    canonical: &[IVec3],
    node_indices: &[IVec3],
    node_values: Vec<T>,
    quantity: &str,
    structure: &str,
) -> Result<CanonicalNodeValues<T>> {
    if node_indices.len() != node_values.len() {
        return Err(PolyscopeError::SizeMismatch {
            what: format!("node values of quantity '{quantity}'"),
            expected: node_indices.len(),
            actual: node_values.len(),
        });
    }

    if node_indices == canonical {
        return Ok(CanonicalNodeValues {
            values: node_values,
            was_canonical: true,
        });
    }

    let mut order: Vec<usize> = (0..node_indices.len()).collect();
    order.sort_by_key(|&i| lex_key(&node_indices[i]));

    let missing = |node: IVec3| PolyscopeError::MissingNode {
        quantity: quantity.to_string(),
        structure: structure.to_string(),
        node,
    };

    let mut values = Vec::with_capacity(canonical.len());
    let mut cursor = order.iter().peekable();
    for &node in canonical {
        let key = lex_key(&node);
        while cursor
            .peek()
            .is_some_and(|&&i| lex_key(&node_indices[i]) < key)
        {
            cursor.next();
        }
        match cursor.next() {
            Some(&i) if node_indices[i] == node => values.push(node_values[i].clone()),
            _ => return Err(missing(node)),
        }
    }

    Ok(CanonicalNodeValues {
        values,
        was_canonical: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse_volume_grid::indexing::NodeIndexing;
    use proptest::prelude::*;

    fn two_cells() -> NodeIndexing {
        NodeIndexing::build(&[IVec3::ZERO, IVec3::new(0, 0, 1)])
    }

    fn value_of(n: IVec3) -> f32 {
        (n.x * 100 + n.y * 10 + n.z) as f32
    }

    #[test]
    fn test_canonical_input_passes_through() {
        let nodes = two_cells();
        let values: Vec<f32> = nodes.canonical_nodes.iter().map(|&n| value_of(n)).collect();
        let out = canonicalize_node_values(&nodes.canonical_nodes, &nodes.canonical_nodes, values.clone(), "q", "g")
            .unwrap();
        assert!(out.was_canonical);
        assert_eq!(out.values, values);
    }

    #[test]
    fn test_reversed_input_is_reordered() {
        let nodes = two_cells();
        let mut inds = nodes.canonical_nodes.clone();
        inds.reverse();
        let values: Vec<f32> = inds.iter().map(|&n| value_of(n)).collect();
        let out = canonicalize_node_values(&nodes.canonical_nodes, &inds, values, "q", "g").unwrap();
        assert!(!out.was_canonical);
        let expected: Vec<f32> = nodes.canonical_nodes.iter().map(|&n| value_of(n)).collect();
        assert_eq!(out.values, expected);
    }

    #[test]
    fn test_extra_entries_ignored() {
        let nodes = two_cells();
        let mut inds = nodes.canonical_nodes.clone();
        inds.insert(3, IVec3::new(-7, 0, 0));
        inds.push(IVec3::splat(9));
        let values: Vec<f32> = inds.iter().map(|&n| value_of(n)).collect();
        let out = canonicalize_node_values(&nodes.canonical_nodes, &inds, values, "q", "g").unwrap();
        assert!(!out.was_canonical);
        assert_eq!(out.values.len(), nodes.len());
    }

    #[test]
    fn test_missing_entry_names_node() {
        let nodes = two_cells();
        let mut inds = nodes.canonical_nodes.clone();
        let removed = inds.remove(5);
        let values = vec![0.0_f32; inds.len()];
        match canonicalize_node_values(&nodes.canonical_nodes, &inds, values, "q", "g") {
            Err(PolyscopeError::MissingNode { node, quantity, .. }) => {
                assert_eq!(node, removed);
                assert_eq!(quantity, "q");
            }
            other => panic!("expected missing node, got {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let nodes = two_cells();
        let err = canonicalize_node_values(&nodes.canonical_nodes, &nodes.canonical_nodes, vec![0.0_f32; 3], "q", "g")
            .unwrap_err();
        assert!(matches!(err, PolyscopeError::SizeMismatch { expected: 12, actual: 3, .. }));
    }

    #[test]
    fn test_empty_grid() {
        let out = canonicalize_node_values::<f32>(&[], &[IVec3::ONE], vec![1.0], "q", "g").unwrap();
        assert!(out.values.is_empty());
    }

    fn block_nodes() -> NodeIndexing {
        let mut cells = Vec::new();
        for i in 0..3 {
            for j in 0..2 {
                cells.push(IVec3::new(i, j, i - j));
            }
        }
        NodeIndexing::build(&cells)
    }

    proptest! {
        #[test]
        fn prop_any_permutation_canonicalizes(perm in Just((0..block_nodes().len()).collect::<Vec<_>>()).prop_shuffle()) {
            let nodes = block_nodes();
            let inds: Vec<IVec3> = perm.iter().map(|&i| nodes.canonical_nodes[i]).collect();
            let values: Vec<f32> = inds.iter().map(|&n| value_of(n)).collect();
            let out = canonicalize_node_values(&nodes.canonical_nodes, &inds, values, "q", "g").unwrap();
            let expected: Vec<f32> = nodes.canonical_nodes.iter().map(|&n| value_of(n)).collect();
            prop_assert_eq!(out.values, expected);
        }

        #[test]
        fn prop_removing_any_node_fails(skip in 0usize..24) {
            let nodes = block_nodes();
            let skip = skip % nodes.len();
            let inds: Vec<IVec3> = nodes
                .canonical_nodes
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &n)| n)
                .collect();
            let values = vec![0.0_f32; inds.len()];
            prop_assert!(canonicalize_node_values(&nodes.canonical_nodes, &inds, values, "q", "g").is_err());
        }
    }
}
