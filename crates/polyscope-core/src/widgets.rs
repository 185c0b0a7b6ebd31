//! Capability boundary to the immediate-mode UI.
//!
//! Structures describe their panels through [`WidgetBuilder`]; the UI backend
//! (egui, dear imgui, a scripted test UI, ...) decides how they look. Every
//! editing widget returns `true` on the frame its value changed.

use std::ops::RangeInclusive;

use glam::Vec3;

/// Immediate-mode widget calls used by structure and quantity panels.
pub trait WidgetBuilder {
    /// A line of text.
    fn text(&mut self, text: &str);

    /// A horizontal separator.
    fn separator(&mut self);

    /// A labelled checkbox.
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;

    /// A color swatch with a picker.
    fn color_edit(&mut self, label: &str, color: &mut Vec3) -> bool;

    /// A bounded slider; `logarithmic` spaces the values exponentially.
    fn slider(
        &mut self,
        label: &str,
        value: &mut f32,
        range: RangeInclusive<f32>,
        logarithmic: bool,
    ) -> bool;

    /// An unbounded draggable number.
    fn drag(&mut self, label: &str, value: &mut f32, speed: f32) -> bool;

    /// A drop-down choice among `options`.
    fn combo(&mut self, label: &str, selected: &mut String, options: &[&str]) -> bool;

    /// A push button.
    fn button(&mut self, label: &str) -> bool;

    /// A two-column `key | value` row of an info table.
    fn info_row(&mut self, key: &str, value: &str);

    /// A two-column row showing a color swatch and its value.
    fn color_row(&mut self, key: &str, color: Vec3);

    /// Builds `contents` indented one level.
    fn indent(&mut self, contents: &mut dyn FnMut(&mut dyn WidgetBuilder));

    /// Sets the width of subsequent editing widgets, in logical pixels.
    fn push_item_width(&mut self, width: f32);

    /// Restores the previous item width.
    fn pop_item_width(&mut self);
}
