//! A UI backend that records widgets and replays scripted user edits.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use glam::Vec3;
use polyscope_core::WidgetBuilder;

/// A widget call as seen by [`ScriptedUi`], with the value it displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Text(String),
    Separator,
    Checkbox { label: String, value: bool },
    ColorEdit { label: String, value: Vec3 },
    Slider { label: String, value: f32 },
    Drag { label: String, value: f32 },
    Combo { label: String, selected: String, options: Vec<String> },
    Button(String),
    InfoRow { key: String, value: String },
    ColorRow { key: String, color: Vec3 },
    IndentBegin,
    IndentEnd,
}

/// A pending user interaction, applied the next time its widget is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedEdit {
    Toggle,
    SetColor(Vec3),
    SetFloat(f32),
    Select(String),
    Click,
}

/// Records widget calls and plays back scripted edits by label.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    events: Vec<UiEvent>,
    edits: HashMap<String, ScriptedEdit>,
    item_widths: Vec<f32>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an edit for the widget labelled `label`.
    pub fn script(&mut self, label: impl Into<String>, edit: ScriptedEdit) -> &mut Self {
        self.edits.insert(label.into(), edit);
        self
    }

    /// Widgets built so far.
    pub fn events(&self) -> &[UiEvent] {
        &self.events
    }

    /// Drops recorded widgets, keeping unapplied edits.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Edits that were scripted but never met their widget.
    pub fn pending_edits(&self) -> impl Iterator<Item = &str> {
        self.edits.keys().map(String::as_str)
    }

    /// All text lines, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Value of the first info row with this key.
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.events.iter().find_map(|e| match e {
            UiEvent::InfoRow { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Returns whether a widget with this label was built.
    pub fn has_widget(&self, label: &str) -> bool {
        self.events.iter().any(|e| match e {
            UiEvent::Checkbox { label: l, .. }
            | UiEvent::ColorEdit { label: l, .. }
            | UiEvent::Slider { label: l, .. }
            | UiEvent::Drag { label: l, .. }
            | UiEvent::Combo { label: l, .. }
            | UiEvent::Button(l) => l == label,
            _ => false,
        })
    }

    /// Current item width, 0 when none was pushed.
    pub fn item_width(&self) -> f32 {
        self.item_widths.last().copied().unwrap_or(0.0)
    }

    fn take_edit(&mut self, label: &str) -> Option<ScriptedEdit> {
        self.edits.remove(label)
    }
}

impl WidgetBuilder for ScriptedUi {
    fn text(&mut self, text: &str) {
        self.events.push(UiEvent::Text(text.to_string()));
    }

    fn separator(&mut self) {
        self.events.push(UiEvent::Separator);
    }

    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        self.events.push(UiEvent::Checkbox {
            label: label.to_string(),
            value: *value,
        });
        match self.take_edit(label) {
            Some(ScriptedEdit::Toggle) => {
                *value = !*value;
                true
            }
            _ => false,
        }
    }

    fn color_edit(&mut self, label: &str, color: &mut Vec3) -> bool {
        self.events.push(UiEvent::ColorEdit {
            label: label.to_string(),
            value: *color,
        });
        match self.take_edit(label) {
            Some(ScriptedEdit::SetColor(c)) => {
                *color = c;
                true
            }
            _ => false,
        }
    }

    fn slider(
        &mut self,
        label: &str,
        value: &mut f32,
        range: RangeInclusive<f32>,
        _logarithmic: bool,
    ) -> bool {
        self.events.push(UiEvent::Slider {
            label: label.to_string(),
            value: *value,
        });
        match self.take_edit(label) {
            Some(ScriptedEdit::SetFloat(v)) => {
                *value = v.clamp(*range.start(), *range.end());
                true
            }
            _ => false,
        }
    }

    fn drag(&mut self, label: &str, value: &mut f32, _speed: f32) -> bool {
        self.events.push(UiEvent::Drag {
            label: label.to_string(),
            value: *value,
        });
        match self.take_edit(label) {
            Some(ScriptedEdit::SetFloat(v)) => {
                *value = v;
                true
            }
            _ => false,
        }
    }

    fn combo(&mut self, label: &str, selected: &mut String, options: &[&str]) -> bool {
        self.events.push(UiEvent::Combo {
            label: label.to_string(),
            selected: selected.clone(),
            options: options.iter().map(ToString::to_string).collect(),
        });
        match self.take_edit(label) {
            Some(ScriptedEdit::Select(choice)) if options.contains(&choice.as_str()) => {
                let changed = *selected != choice;
                *selected = choice;
                changed
            }
            Some(ScriptedEdit::Select(choice)) => {
                log::warn!("scripted choice '{choice}' is not an option of '{label}'");
                false
            }
            _ => false,
        }
    }

    fn button(&mut self, label: &str) -> bool {
        self.events.push(UiEvent::Button(label.to_string()));
        matches!(self.take_edit(label), Some(ScriptedEdit::Click))
    }

    fn info_row(&mut self, key: &str, value: &str) {
        self.events.push(UiEvent::InfoRow {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn color_row(&mut self, key: &str, color: Vec3) {
        self.events.push(UiEvent::ColorRow {
            key: key.to_string(),
            color,
        });
    }

    fn indent(&mut self, contents: &mut dyn FnMut(&mut dyn WidgetBuilder)) {
        self.events.push(UiEvent::IndentBegin);
        contents(self);
        self.events.push(UiEvent::IndentEnd);
    }

    fn push_item_width(&mut self, width: f32) {
        self.item_widths.push(width);
    }

    fn pop_item_width(&mut self) {
        self.item_widths.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_applies_once() {
        let mut ui = ScriptedUi::new();
        ui.script("Edges", ScriptedEdit::Toggle);

        let mut edges = false;
        assert!(ui.checkbox("Edges", &mut edges));
        assert!(edges);
        assert!(!ui.checkbox("Edges", &mut edges));
        assert!(edges);
        assert_eq!(ui.pending_edits().count(), 0);
    }

    #[test]
    fn test_slider_clamps() {
        let mut ui = ScriptedUi::new();
        ui.script("Width", ScriptedEdit::SetFloat(5.0));
        let mut w = 1.0;
        assert!(ui.slider("Width", &mut w, 0.001..=2.0, false));
        assert!((w - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_combo_rejects_unknown_choice() {
        let mut ui = ScriptedUi::new();
        ui.script("Mode", ScriptedEdit::Select("Voxels".into()));
        let mut mode = "Gridcube".to_string();
        assert!(!ui.combo("Mode", &mut mode, &["Gridcube", "Wireframe"]));
        assert_eq!(mode, "Gridcube");
    }

    #[test]
    fn test_indent_records_nested_rows() {
        let mut ui = ScriptedUi::new();
        ui.indent(&mut |ui| ui.info_row("density", "0.5"));
        assert_eq!(ui.events().first(), Some(&UiEvent::IndentBegin));
        assert_eq!(ui.info_value("density"), Some("0.5"));
        assert_eq!(ui.events().last(), Some(&UiEvent::IndentEnd));
    }
}
