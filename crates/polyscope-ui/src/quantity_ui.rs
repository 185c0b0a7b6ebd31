//! Quantity-specific UI builders.

use polyscope_core::WidgetBuilder;

/// Builds UI for a scalar quantity.
pub fn build_scalar_quantity_ui(
    ui: &mut dyn WidgetBuilder,
    name: &str,
    enabled: &mut bool,
    colormap: &mut String,
    range_min: &mut f32,
    range_max: &mut f32,
    available_colormaps: &[&str],
) -> bool {
    let mut changed = ui.checkbox(name, enabled);

    if *enabled {
        ui.indent(&mut |ui| {
            if ui.combo("Colormap", colormap, available_colormaps) {
                changed = true;
            }
            if ui.drag("Range Low", range_min, 0.01) {
                changed = true;
            }
            if ui.drag("Range High", range_max, 0.01) {
                changed = true;
            }
        });
    }

    changed
}

/// Builds UI for a color quantity.
pub fn build_color_quantity_ui(
    ui: &mut dyn WidgetBuilder,
    name: &str,
    enabled: &mut bool,
    num_colors: usize,
) -> bool {
    let changed = ui.checkbox(name, enabled);
    ui.text(&format!("({num_colors} colors)"));
    changed
}
