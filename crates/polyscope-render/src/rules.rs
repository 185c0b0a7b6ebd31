//! Names of base programs and composable shader rules.
//!
//! Programs are assembled from a base program plus an ordered list of rules,
//! each of which splices a fragment into the program. The names here are the
//! contract between structures and the backend.

/// Instanced cube per grid cell, drawn as a 14-vertex triangle strip.
pub const GRIDCUBE: &str = "GRIDCUBE";
/// Ray-cast sphere impostors, one per instance.
pub const RAYCAST_SPHERE: &str = "RAYCAST_SPHERE";
/// Ray-cast cylinder impostors, one per instance.
pub const RAYCAST_CYLINDER: &str = "RAYCAST_CYLINDER";

/// Shade with `u_baseColor`.
pub const SHADE_BASECOLOR: &str = "SHADE_BASECOLOR";
/// Shade with a propagated per-fragment color.
pub const SHADE_COLOR: &str = "SHADE_COLOR";
/// Shade by looking a propagated value up in `t_colormap`.
pub const SHADE_COLORMAP_VALUE: &str = "SHADE_COLORMAP_VALUE";

/// Draw cube edges of width `u_edgeWidth`.
pub const GRIDCUBE_WIREFRAME: &str = "GRIDCUBE_WIREFRAME";
/// Generic wireframe blending of `u_edgeColor`.
pub const MESH_WIREFRAME: &str = "MESH_WIREFRAME";

/// Cull using the cube center so slice planes remove whole cells.
pub const GRIDCUBE_CULLPOS_FROM_CENTER: &str = "GRIDCUBE_CULLPOS_FROM_CENTER";
/// Slice plane culling from the view-space position.
pub const CULL_POS_FROM_VIEW: &str = "CULL_POS_FROM_VIEW";

/// Propagate a per-cell `a_color`.
pub const GRIDCUBE_PROPAGATE_ATTR_CELL_COLOR: &str = "GRIDCUBE_PROPAGATE_ATTR_CELL_COLOR";
/// Propagate a per-cell `a_value`.
pub const GRIDCUBE_PROPAGATE_ATTR_CELL_SCALAR: &str = "GRIDCUBE_PROPAGATE_ATTR_CELL_SCALAR";
/// Trilinearly interpolate `a_nodeValue0..7`.
pub const GRIDCUBE_PROPAGATE_ATTR_NODE_SCALAR: &str = "GRIDCUBE_PROPAGATE_ATTR_NODE_SCALAR";
/// Trilinearly interpolate `a_nodeColor0..7`.
pub const GRIDCUBE_PROPAGATE_ATTR_NODE_COLOR: &str = "GRIDCUBE_PROPAGATE_ATTR_NODE_COLOR";

/// Every base program the backend knows.
pub const PROGRAMS: &[&str] = &[GRIDCUBE, RAYCAST_SPHERE, RAYCAST_CYLINDER];

/// Every non-material rule the backend knows.
pub const RULES: &[&str] = &[
    SHADE_BASECOLOR,
    SHADE_COLOR,
    SHADE_COLORMAP_VALUE,
    GRIDCUBE_WIREFRAME,
    MESH_WIREFRAME,
    GRIDCUBE_CULLPOS_FROM_CENTER,
    CULL_POS_FROM_VIEW,
    GRIDCUBE_PROPAGATE_ATTR_CELL_COLOR,
    GRIDCUBE_PROPAGATE_ATTR_CELL_SCALAR,
    GRIDCUBE_PROPAGATE_ATTR_NODE_SCALAR,
    GRIDCUBE_PROPAGATE_ATTR_NODE_COLOR,
];

/// Attribute name of the per-node value for corner `c`.
pub fn node_value_attribute(corner: usize) -> String {
    format!("a_nodeValue{corner}")
}

/// Attribute name of the per-node color for corner `c`.
pub fn node_color_attribute(corner: usize) -> String {
    format!("a_nodeColor{corner}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        let mut all: Vec<&str> = PROGRAMS.iter().chain(RULES).copied().collect();
        let n = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), n);
    }

    #[test]
    fn test_corner_attribute_names() {
        assert_eq!(node_value_attribute(0), "a_nodeValue0");
        assert_eq!(node_color_attribute(7), "a_nodeColor7");
    }
}
