//! Per-frame entry points for an external render and UI loop.
//!
//! polyscope-rs does not own a window here. The host calls [`draw_frame`] and
//! [`draw_pick_frame`] with its render backend, and [`build_structures_ui`] /
//! [`build_pick_ui`] with its widget backend.

use polyscope_core::state::try_with_context_mut;
use polyscope_core::{RenderContext, Structure, WidgetBuilder};
use polyscope_structures::sparse_volume_grid::STRUCTURE_TYPE;
use polyscope_structures::SparseVolumeGrid;

use crate::{with_sparse_volume_grid_ref, PickResult, PolyscopeError, Result};

/// Draws every enabled structure.
pub fn draw_frame(ctx: &mut dyn RenderContext) -> Result<()> {
    try_with_context_mut(|state| -> Result<()> {
        for structure in state.registry.iter_mut() {
            structure.draw(ctx)?;
        }
        Ok(())
    })
    .ok_or(PolyscopeError::NotInitialized)?
}

/// Draws every enabled structure into the pick buffer.
pub fn draw_pick_frame(ctx: &mut dyn RenderContext) -> Result<()> {
    try_with_context_mut(|state| -> Result<()> {
        for structure in state.registry.iter_mut() {
            structure.draw_pick(ctx)?;
        }
        Ok(())
    })
    .ok_or(PolyscopeError::NotInitialized)?
}

/// Drops all cached render programs, e.g. after the backend was recreated.
pub fn refresh() {
    try_with_context_mut(|state| {
        for structure in state.registry.iter_mut() {
            structure.refresh();
        }
    });
}

/// Builds the panel of every sparse volume grid. Returns true if anything changed.
pub fn build_structures_ui(ui: &mut dyn WidgetBuilder) -> bool {
    try_with_context_mut(|state| {
        let mut changed = false;
        for structure in state.registry.iter_mut() {
            if let Some(grid) = structure.as_any_mut().downcast_mut::<SparseVolumeGrid>() {
                ui.text(&format!("{STRUCTURE_TYPE}: {}", grid.name()));
                changed |= grid.build_ui(ui);
                ui.separator();
            }
        }
        if changed {
            state.update_extents();
        }
        changed
    })
    .unwrap_or(false)
}

/// Builds the selection panel for a pick record.
pub fn build_pick_ui(ui: &mut dyn WidgetBuilder, pick: &PickResult) -> Result<()> {
    if pick.structure_type != STRUCTURE_TYPE {
        return Err(PolyscopeError::StructureNotFound(pick.structure_name.clone()));
    }
    with_sparse_volume_grid_ref(&pick.structure_name, |grid| grid.build_pick_ui(ui, pick))
        .ok_or_else(|| PolyscopeError::StructureNotFound(pick.structure_name.clone()))?
}
