//! Interpretation of raw pick hits as cell or node selections.

use glam::{IVec3, Vec3};

/// Distance from a corner, in the rendered cube's `[-1, 1]` frame, below
/// which a hit selects the node instead of the cell.
pub const NODE_PICK_RADIUS: f32 = 0.8;

/// What kind of grid element a pick selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseVolumeGridElement {
    Cell,
    Node,
}

/// A pick hit resolved against a sparse volume grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseVolumeGridPickResult {
    pub element_type: SparseVolumeGridElement,
    /// The cell whose cube was hit.
    pub cell_index: IVec3,
    /// Position of that cell in the occupied cell list.
    pub cell_flat_index: usize,
    /// The selected node, for node picks.
    pub node_index: Option<IVec3>,
}

/// Classifies a hit at grid-local position `local_pos` on the cube of `cell`.
///
/// `shrink` is the cube shrink amount (0 = full cell). Node picks are only
/// considered when `pick_nodes` is set.
pub(crate) fn classify_hit(
    cell: IVec3,
    local_pos: Vec3,
    origin: Vec3,
    cell_width: Vec3,
    shrink: f32,
    pick_nodes: bool,
) -> (SparseVolumeGridElement, Option<IVec3>) {
    let fractional = (local_pos - origin) / cell_width - cell.as_vec3();

    let shifted = 2.0 * fractional - Vec3::ONE;
    let coord_local = if shrink < 1.0 {
        shifted / (1.0 - shrink)
    } else {
        shifted
    };
    let dist_from_corner = (Vec3::ONE - coord_local.abs()).length();

    if pick_nodes && dist_from_corner < NODE_PICK_RADIUS {
        let corner = IVec3::new(
            i32::from(fractional.x > 0.5),
            i32::from(fractional.y > 0.5),
            i32::from(fractional.z > 0.5),
        );
        (SparseVolumeGridElement::Node, Some(cell + corner))
    } else {
        (SparseVolumeGridElement::Cell, None)
    }
}
