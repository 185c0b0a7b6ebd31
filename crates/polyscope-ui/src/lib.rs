//! UI layer for polyscope-rs.
//!
//! Panels are written against [`polyscope_core::WidgetBuilder`] so any
//! immediate-mode backend can host them. [`ScriptedUi`] is a backend that
//! records the widgets it is asked for and replays scripted edits.

pub mod quantity_ui;
pub mod scripted;
pub mod selection_panel;
pub mod structure_ui;

pub use quantity_ui::*;
pub use scripted::{ScriptedEdit, ScriptedUi, UiEvent};
pub use selection_panel::*;
pub use structure_ui::*;
