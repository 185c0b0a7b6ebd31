//! Spatial indexing of the occupied cells and their corner nodes.
//!
//! Cell `(i, j, k)` spans nodes `(i, j, k)` to `(i + 1, j + 1, k + 1)`.
//! Corner `c` of a cell is node `cell + (c >> 2 & 1, c >> 1 & 1, c & 1)`,
//! the same numbering the gridcube strip uses.

use std::collections::HashMap;

use glam::{IVec3, Vec3};
use polyscope_core::{PolyscopeError, Result};

/// Lexicographic `(x, y, z)` sort key.
#[inline]
pub(crate) fn lex_key(v: &IVec3) -> [i32; 3] {
    v.to_array()
}

/// Offset from a cell to its corner node `corner` (0..8).
#[must_use]
pub fn corner_offset(corner: usize) -> IVec3 {
    IVec3::new(
        ((corner >> 2) & 1) as i32,
        ((corner >> 1) & 1) as i32,
        (corner & 1) as i32,
    )
}

/// Fails on the first cell that occurs more than once.
pub(crate) fn check_no_duplicate_cells(structure: &str, cells: &[IVec3]) -> Result<()> {
    let mut sorted = cells.to_vec();
    sorted.sort_unstable_by_key(lex_key);
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(PolyscopeError::DuplicateCell {
            structure: structure.to_string(),
            cell: pair[0],
        });
    }
    Ok(())
}

/// Fails on the first cell whose corner nodes cannot all be represented.
pub(crate) fn check_cells_in_range(structure: &str, cells: &[IVec3]) -> Result<()> {
    if let Some(cell) = cells.iter().find(|c| c.max_element() == i32::MAX) {
        return Err(PolyscopeError::CellOutOfRange {
            structure: structure.to_string(),
            cell: *cell,
        });
    }
    Ok(())
}

/// World-space (pre-transform) center of every cell.
pub(crate) fn cell_centers(origin: Vec3, cell_width: Vec3, cells: &[IVec3]) -> Vec<Vec3> {
    cells
        .iter()
        .map(|c| origin + (c.as_vec3() + 0.5) * cell_width)
        .collect()
}

/// Canonical node list plus, for each corner slot, the canonical index of
/// that corner for every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIndexing {
    /// Distinct corner nodes of all cells, sorted lexicographically.
    pub canonical_nodes: Vec<IVec3>,
    /// `corner_node_indices[c][i]` is the canonical index of corner `c` of cell `i`.
    pub corner_node_indices: [Vec<u32>; 8],
}

impl NodeIndexing {
    /// Derives the canonical nodes of `cells`.
    ///
    /// The result only depends on the set of cells, not their order.
    pub fn build(cells: &[IVec3]) -> Self {
        let mut all_corners: Vec<IVec3> = Vec::with_capacity(cells.len() * 8);
        for cell in cells {
            for corner in 0..8 {
                all_corners.push(*cell + corner_offset(corner));
            }
        }
        all_corners.sort_unstable_by_key(lex_key);
        all_corners.dedup();
        let canonical_nodes = all_corners;

        let lookup: HashMap<IVec3, u32> = canonical_nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (*n, i as u32))
            .collect();

        let corner_node_indices: [Vec<u32>; 8] = std::array::from_fn(|corner| {
            let offset = corner_offset(corner);
            cells.iter().map(|cell| lookup[&(*cell + offset)]).collect()
        });

        log::debug!(
            "derived {} canonical nodes for {} cells",
            canonical_nodes.len(),
            cells.len()
        );

        Self {
            canonical_nodes,
            corner_node_indices,
        }
    }

    /// Number of canonical nodes.
    pub fn len(&self) -> usize {
        self.canonical_nodes.len()
    }

    /// Returns true if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.canonical_nodes.is_empty()
    }

    /// Canonical index of `node`, if it is a corner of some cell.
    pub fn find(&self, node: IVec3) -> Option<usize> {
        self.canonical_nodes
            .binary_search_by_key(&lex_key(&node), lex_key)
            .ok()
    }
}
