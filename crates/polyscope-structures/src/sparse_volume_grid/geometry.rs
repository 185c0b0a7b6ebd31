//! Immutable cell geometry of a sparse volume grid and its lazily derived nodes.

use std::collections::HashMap;
use std::sync::OnceLock;

use glam::{IVec3, Vec3};
use polyscope_core::{PolyscopeError, Result};

use super::indexing::{cell_centers, check_cells_in_range, check_no_duplicate_cells, NodeIndexing};

/// Occupied cells, their centers and, once requested, their canonical nodes.
///
/// Cells never change after construction, so the node derivation is computed
/// at most once and never invalidated.
#[derive(Debug)]
pub struct SparseGridGeometry {
    origin: Vec3,
    cell_width: Vec3,
    cells: Vec<IVec3>,
    cell_centers: Vec<Vec3>,
    cell_lookup: HashMap<IVec3, usize>,
    nodes: OnceLock<NodeIndexing>,
}

impl SparseGridGeometry {
    /// Validates `cells` and derives their centers.
    pub fn new(structure: &str, origin: Vec3, cell_width: Vec3, cells: Vec<IVec3>) -> Result<Self> {
        check_cells_in_range(structure, &cells)?;
        check_no_duplicate_cells(structure, &cells)?;
        let cell_centers = cell_centers(origin, cell_width, &cells);
        let cell_lookup = cells.iter().enumerate().map(|(i, c)| (*c, i)).collect();
        Ok(Self {
            origin,
            cell_width,
            cells,
            cell_centers,
            cell_lookup,
            nodes: OnceLock::new(),
        })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn cell_width(&self) -> Vec3 {
        self.cell_width
    }

    /// Occupied cells in input order.
    pub fn cells(&self) -> &[IVec3] {
        &self.cells
    }

    /// Cell centers in input order.
    pub fn cell_centers(&self) -> &[Vec3] {
        &self.cell_centers
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Canonical nodes and corner buffers, derived on first call.
    pub fn nodes(&self) -> &NodeIndexing {
        self.nodes.get_or_init(|| NodeIndexing::build(&self.cells))
    }

    /// Canonical nodes, if they have been derived.
    pub fn prepared_nodes(&self) -> Option<&NodeIndexing> {
        self.nodes.get()
    }

    /// Number of canonical nodes; derives them if needed.
    pub fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Center of cell `cell`, whether or not it is occupied.
    pub fn cell_center(&self, cell: IVec3) -> Vec3 {
        self.origin + (cell.as_vec3() + 0.5) * self.cell_width
    }

    /// Position of node `node`.
    pub fn node_position(&self, node: IVec3) -> Vec3 {
        self.origin + node.as_vec3() * self.cell_width
    }

    /// Local-space bounds: cell centers expanded by half a cell.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        if self.cell_centers.is_empty() {
            return (self.origin, self.origin);
        }
        let (min, max) = self.cell_centers.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let half = 0.5 * self.cell_width;
        (min - half, max + half)
    }

    /// Position of `cell` in the occupied list.
    pub fn find_cell_flat_index(&self, cell: IVec3) -> Option<usize> {
        self.cell_lookup.get(&cell).copied()
    }

    /// Canonical index of `node`; fails if nodes were never derived.
    pub fn find_node_flat_index(&self, structure: &str, node: IVec3) -> Result<Option<usize>> {
        let nodes = self
            .prepared_nodes()
            .ok_or_else(|| PolyscopeError::NodeIndicesNotPrepared(structure.to_string()))?;
        Ok(nodes.find(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_cells_at_index_limit() {
        let err = SparseGridGeometry::new(
            "g",
            Vec3::ZERO,
            Vec3::ONE,
            vec![IVec3::ZERO, IVec3::new(0, i32::MAX, 0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PolyscopeError::CellOutOfRange { cell, .. } if cell.y == i32::MAX
        ));

        let low = IVec3::splat(i32::MIN);
        let geom = SparseGridGeometry::new("g", Vec3::ZERO, Vec3::ONE, vec![low]).unwrap();
        assert_eq!(geom.num_nodes(), 8);
        assert_eq!(geom.nodes().canonical_nodes[0], low);
    }

    #[test]
    fn test_nodes_are_lazy() {
        let geom = SparseGridGeometry::new("g", Vec3::ZERO, Vec3::ONE, vec![IVec3::ZERO]).unwrap();
        assert!(geom.prepared_nodes().is_none());
        assert!(matches!(
            geom.find_node_flat_index("g", IVec3::ZERO),
            Err(PolyscopeError::NodeIndicesNotPrepared(_))
        ));
        assert_eq!(geom.num_nodes(), 8);
        assert!(geom.prepared_nodes().is_some());
        assert_eq!(geom.find_node_flat_index("g", IVec3::ONE).unwrap(), Some(7));
    }

    #[test]
    fn test_bounding_box() {
        let geom = SparseGridGeometry::new(
            "g",
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 2.0, 0.5),
            vec![IVec3::ZERO, IVec3::new(2, -1, 0)],
        )
        .unwrap();
        let (min, max) = geom.bounding_box();
        assert_eq!(min, Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(max, Vec3::new(4.0, 3.0, 1.5));
    }

    #[test]
    fn test_empty_geometry() {
        let origin = Vec3::new(3.0, 2.0, 1.0);
        let geom = SparseGridGeometry::new("g", origin, Vec3::ONE, Vec::new()).unwrap();
        assert_eq!(geom.bounding_box(), (origin, origin));
        assert_eq!(geom.num_nodes(), 0);
    }

    #[test]
    fn test_flat_lookup() {
        let cells = vec![IVec3::new(5, 5, 5), IVec3::new(-1, 0, 0)];
        let geom = SparseGridGeometry::new("g", Vec3::ZERO, Vec3::ONE, cells).unwrap();
        assert_eq!(geom.find_cell_flat_index(IVec3::new(-1, 0, 0)), Some(1));
        assert_eq!(geom.find_cell_flat_index(IVec3::ZERO), None);
        assert_eq!(geom.node_position(IVec3::new(-1, 0, 0)), Vec3::new(-1.0, 0.0, 0.0));
    }
}
