//! Structure-specific UI builders.

use glam::Vec3;
use polyscope_core::WidgetBuilder;

/// Default built-in material names (used as fallback if no registry provided).
const DEFAULT_MATERIALS: &[&str] = &[
    "clay", "wax", "candy", "flat", "mud", "ceramic", "jade", "normal",
];

/// Edge width a freshly enabled edge toggle starts at.
pub const DEFAULT_EDGE_WIDTH: f32 = 1.0;

/// Builds a material selector combo. Returns true if the material changed.
/// `available_materials` is the list of all registered material names (built-in + custom).
/// If empty, falls back to the default built-in list.
pub fn build_material_selector(
    ui: &mut dyn WidgetBuilder,
    material: &mut String,
    available_materials: &[&str],
) -> bool {
    let materials: &[&str] = if available_materials.is_empty() {
        DEFAULT_MATERIALS
    } else {
        available_materials
    };
    ui.combo("Material", material, materials)
}

/// Editable appearance of a sparse volume grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseGridAppearance {
    pub color: Vec3,
    pub edge_width: f32,
    pub edge_color: Vec3,
    pub material: String,
    /// Shrink amount, 0 = cubes touch.
    pub cube_size_factor: f32,
    pub render_mode: String,
    pub wireframe_radius: f32,
    pub wireframe_color: Vec3,
}

/// Builds UI for a sparse volume grid. Returns true if anything changed.
///
/// The edge checkbox switches the width between 0 and [`DEFAULT_EDGE_WIDTH`];
/// the width slider only shows while edges are on.
pub fn build_sparse_volume_grid_ui(
    ui: &mut dyn WidgetBuilder,
    num_cells: usize,
    appearance: &mut SparseGridAppearance,
    render_modes: &[&str],
    available_materials: &[&str],
    ui_scale: f32,
) -> bool {
    let mut changed = false;

    ui.text(&format!("{num_cells} cells"));

    ui.push_item_width(100.0 * ui_scale);
    if ui.combo("Render Mode", &mut appearance.render_mode, render_modes) {
        changed = true;
    }

    if appearance.render_mode == "Wireframe" {
        if ui.color_edit("Wireframe Color", &mut appearance.wireframe_color) {
            changed = true;
        }
        if ui.slider(
            "Wireframe Radius",
            &mut appearance.wireframe_radius,
            0.01..=5.0,
            true,
        ) {
            changed = true;
        }
    } else {
        if ui.color_edit("Color", &mut appearance.color) {
            changed = true;
        }

        let mut show_edges = appearance.edge_width > 0.0;
        if ui.checkbox("Edges", &mut show_edges) {
            appearance.edge_width = if show_edges { DEFAULT_EDGE_WIDTH } else { 0.0 };
            changed = true;
        } else if show_edges {
            if ui.color_edit("Edge Color", &mut appearance.edge_color) {
                changed = true;
            }
            ui.push_item_width(75.0 * ui_scale);
            if ui.slider("Width", &mut appearance.edge_width, 0.001..=2.0, false) {
                changed = true;
            }
            ui.pop_item_width();
        }
    }
    ui.pop_item_width();

    ui.separator();

    if build_material_selector(ui, &mut appearance.material, available_materials) {
        changed = true;
    }

    ui.push_item_width(150.0 * ui_scale);
    if ui.slider(
        "Cell Shrink",
        &mut appearance.cube_size_factor,
        0.0..=1.0,
        true,
    ) {
        changed = true;
    }
    ui.pop_item_width();

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{ScriptedEdit, ScriptedUi};

    fn appearance() -> SparseGridAppearance {
        SparseGridAppearance {
            color: Vec3::new(0.2, 0.4, 0.8),
            edge_width: 0.0,
            edge_color: Vec3::ZERO,
            material: "clay".into(),
            cube_size_factor: 0.0,
            render_mode: "Gridcube".into(),
            wireframe_radius: 1.0,
            wireframe_color: Vec3::splat(0.2),
        }
    }

    const MODES: &[&str] = &["Gridcube", "Wireframe"];

    #[test]
    fn test_edge_toggle_sets_default_width() {
        let mut ui = ScriptedUi::new();
        ui.script("Edges", ScriptedEdit::Toggle);
        let mut a = appearance();
        assert!(build_sparse_volume_grid_ui(&mut ui, 4, &mut a, MODES, &[], 1.0));
        assert!((a.edge_width - DEFAULT_EDGE_WIDTH).abs() < f32::EPSILON);
        assert!(!ui.has_widget("Width"));
        assert_eq!(ui.texts()[0], "4 cells");
    }

    #[test]
    fn test_width_slider_only_with_edges() {
        let mut ui = ScriptedUi::new();
        ui.script("Width", ScriptedEdit::SetFloat(1.5));
        let mut a = appearance();
        a.edge_width = 0.5;
        assert!(build_sparse_volume_grid_ui(&mut ui, 1, &mut a, MODES, &[], 1.0));
        assert!((a.edge_width - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wireframe_mode_shows_wireframe_options() {
        let mut ui = ScriptedUi::new();
        let mut a = appearance();
        a.render_mode = "Wireframe".into();
        assert!(!build_sparse_volume_grid_ui(&mut ui, 1, &mut a, MODES, &[], 2.0));
        assert!(ui.has_widget("Wireframe Radius"));
        assert!(!ui.has_widget("Edges"));
        assert!(ui.has_widget("Material"));
    }

    #[test]
    fn test_material_selector_falls_back_to_builtins() {
        let mut ui = ScriptedUi::new();
        ui.script("Material", ScriptedEdit::Select("jade".into()));
        let mut material = "clay".to_string();
        assert!(build_material_selector(&mut ui, &mut material, &[]));
        assert_eq!(material, "jade");
    }
}
