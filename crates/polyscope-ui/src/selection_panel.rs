//! Selection/pick results panel.

use polyscope_core::{PickResult, WidgetBuilder};

/// Builds the selection panel for the current pick.
///
/// Shows the picked structure, then hands over to the structure's own pick UI.
pub fn build_selection_panel(
    ui: &mut dyn WidgetBuilder,
    selection: &PickResult,
    build_structure_pick_ui: impl FnOnce(&mut dyn WidgetBuilder),
) {
    ui.text("Selection");
    ui.separator();
    ui.text(&format!(
        "{}: {}",
        selection.structure_type, selection.structure_name
    ));
    ui.text(&format!("Depth: {:.4}", selection.depth));
    ui.separator();
    build_structure_pick_ui(ui);
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::scripted::ScriptedUi;

    #[test]
    fn test_panel_header_then_structure_rows() {
        let mut ui = ScriptedUi::new();
        let pick = PickResult::new("Sparse Volume Grid", "g", 3, Vec3::ZERO, 0.25);
        build_selection_panel(&mut ui, &pick, |ui| ui.info_row("Cell #", "3"));
        assert_eq!(ui.texts()[1], "Sparse Volume Grid: g");
        assert_eq!(ui.info_value("Cell #"), Some("3"));
    }
}
