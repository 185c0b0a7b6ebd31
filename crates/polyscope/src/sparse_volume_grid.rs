//! Sparse volume grid registration and manipulation.
//!
//! A sparse volume grid shows an arbitrary set of occupied cells of a regular
//! lattice. Values can live on the cells or on the nodes (cell corners).
//!
//! # Example
//!
//! ```no_run
//! use polyscope_rs::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let cells = vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(1, 1, 0)];
//!     let grid = register_sparse_volume_grid("voxels", Vec3::ZERO, Vec3::splat(0.1), cells)?;
//!     grid.add_cell_scalar_quantity("height", vec![0.0, 0.0, 1.0], DataType::Standard)?;
//!     grid.set_quantity_enabled("height", true)?;
//!     Ok(())
//! }
//! ```

use glam::{IVec3, Vec3};
use polyscope_core::state::{try_with_context, try_with_context_mut};
use polyscope_structures::sparse_volume_grid::STRUCTURE_TYPE;
use polyscope_structures::{
    DataType, SparseVolumeGrid, SparseVolumeGridPickResult, SparseVolumeGridRenderMode,
};

use crate::{PickResult, PolyscopeError, Result};

/// Registers a sparse volume grid.
///
/// Cell `(i, j, k)` spans `origin + (i, j, k) * cell_width` to
/// `origin + (i + 1, j + 1, k + 1) * cell_width`. Fails if a cell is listed
/// twice or a grid with this name already exists; nothing is registered then.
pub fn register_sparse_volume_grid(
    name: impl Into<String>,
    origin: Vec3,
    cell_width: Vec3,
    occupied_cells: Vec<IVec3>,
) -> Result<SparseVolumeGridHandle> {
    let name = name.into();
    try_with_context_mut(|ctx| -> Result<()> {
        let grid = SparseVolumeGrid::with_options(
            name.clone(),
            origin,
            cell_width,
            occupied_cells,
            &ctx.options,
        )?;
        let num_cells = grid.num_cells();
        ctx.registry.register(Box::new(grid))?;
        ctx.update_extents();
        log::info!("registered sparse volume grid '{name}' with {num_cells} cells");
        Ok(())
    })
    .ok_or(PolyscopeError::NotInitialized)??;

    Ok(SparseVolumeGridHandle { name })
}

/// Gets a registered sparse volume grid by name.
pub fn get_sparse_volume_grid(name: &str) -> Option<SparseVolumeGridHandle> {
    has_sparse_volume_grid(name).then(|| SparseVolumeGridHandle {
        name: name.to_string(),
    })
}

/// Returns whether a sparse volume grid with this name is registered.
pub fn has_sparse_volume_grid(name: &str) -> bool {
    try_with_context(|ctx| ctx.registry.contains(STRUCTURE_TYPE, name)).unwrap_or(false)
}

/// Removes a sparse volume grid.
///
/// A missing grid is an error only if `error_if_absent` is set.
pub fn remove_sparse_volume_grid(name: &str, error_if_absent: bool) -> Result<()> {
    let removed = try_with_context_mut(|ctx| {
        let removed = ctx.registry.remove(STRUCTURE_TYPE, name).is_some();
        if removed {
            ctx.update_extents();
        }
        removed
    })
    .ok_or(PolyscopeError::NotInitialized)?;

    if removed {
        log::info!("removed sparse volume grid '{name}'");
        Ok(())
    } else if error_if_absent {
        Err(PolyscopeError::StructureNotFound(name.to_string()))
    } else {
        Ok(())
    }
}

/// Executes a closure with mutable access to a sparse volume grid.
///
/// Returns `None` if the grid does not exist. Scene extents are recomputed
/// afterwards, since the closure may move the grid.
pub fn with_sparse_volume_grid<F, R>(name: &str, f: F) -> Option<R>
where
    F: FnOnce(&mut SparseVolumeGrid) -> R,
{
    try_with_context_mut(|ctx| {
        let result = ctx
            .registry
            .get_typed_mut::<SparseVolumeGrid>(STRUCTURE_TYPE, name)
            .map(f);
        if result.is_some() {
            ctx.update_extents();
        }
        result
    })
    .flatten()
}

/// Executes a closure with read access to a sparse volume grid.
pub fn with_sparse_volume_grid_ref<F, R>(name: &str, f: F) -> Option<R>
where
    F: FnOnce(&SparseVolumeGrid) -> R,
{
    try_with_context(|ctx| {
        ctx.registry
            .get_typed::<SparseVolumeGrid>(STRUCTURE_TYPE, name)
            .map(f)
    })
    .flatten()
}

/// Resolves a raw pick record to a cell or node of the grid it hit.
pub fn interpret_sparse_volume_grid_pick(pick: &PickResult) -> Result<SparseVolumeGridPickResult> {
    with_sparse_volume_grid_ref(&pick.structure_name, |grid| grid.interpret_pick_result(pick))
        .ok_or_else(|| PolyscopeError::StructureNotFound(pick.structure_name.clone()))?
}

/// Handle for a registered sparse volume grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseVolumeGridHandle {
    name: String,
}

impl SparseVolumeGridHandle {
    /// Returns the name of this grid.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn with_grid<R>(&self, f: impl FnOnce(&mut SparseVolumeGrid) -> R) -> Result<R> {
        with_sparse_volume_grid(&self.name, f)
            .ok_or_else(|| PolyscopeError::StructureNotFound(self.name.clone()))
    }

    fn with_grid_ref<R>(&self, f: impl FnOnce(&SparseVolumeGrid) -> R) -> Result<R> {
        with_sparse_volume_grid_ref(&self.name, f)
            .ok_or_else(|| PolyscopeError::StructureNotFound(self.name.clone()))
    }

    /// Returns the number of occupied cells.
    pub fn num_cells(&self) -> Result<usize> {
        self.with_grid_ref(SparseVolumeGrid::num_cells)
    }

    /// Returns the number of canonical nodes.
    pub fn num_nodes(&self) -> Result<usize> {
        self.with_grid_ref(SparseVolumeGrid::num_nodes)
    }

    /// Enables node picking without a node quantity.
    pub fn mark_nodes_as_used(&self) -> Result<&Self> {
        self.with_grid(|g| {
            g.mark_nodes_as_used();
        })?;
        Ok(self)
    }

    /// Sets the base color of the cubes.
    pub fn set_color(&self, color: Vec3) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_color(color);
        })?;
        Ok(self)
    }

    /// Sets the edge width; 0 hides edges.
    pub fn set_edge_width(&self, width: f32) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_edge_width(width);
        })?;
        Ok(self)
    }

    /// Sets the edge color.
    pub fn set_edge_color(&self, color: Vec3) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_edge_color(color);
        })?;
        Ok(self)
    }

    /// Sets the material by name.
    pub fn set_material(&self, material: &str) -> Result<&Self> {
        self.with_grid(|g| g.set_material(material).map(|_| ()))??;
        Ok(self)
    }

    /// Sets how much the cubes shrink inside their cells (0 = none, 1 = fully).
    pub fn set_cube_size_factor(&self, factor: f32) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_cube_size_factor(factor);
        })?;
        Ok(self)
    }

    /// Switches between cube and wireframe drawing.
    pub fn set_render_mode(&self, mode: SparseVolumeGridRenderMode) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_render_mode(mode);
        })?;
        Ok(self)
    }

    /// Chooses whether slice planes drop whole cubes or cut through them.
    pub fn set_cull_whole_elements(&self, cull: bool) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_cull_whole_elements(cull);
        })?;
        Ok(self)
    }

    /// Sets the wireframe radius, relative to the smallest cell width.
    pub fn set_wireframe_radius(&self, radius: f32) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_wireframe_radius(radius);
        })?;
        Ok(self)
    }

    /// Sets the wireframe color.
    pub fn set_wireframe_color(&self, color: Vec3) -> Result<&Self> {
        self.with_grid(|g| {
            g.set_wireframe_color(color);
        })?;
        Ok(self)
    }

    /// Adds a scalar quantity with one value per cell.
    pub fn add_cell_scalar_quantity(
        &self,
        name: &str,
        values: Vec<f32>,
        data_type: DataType,
    ) -> Result<&Self> {
        self.with_grid(|g| g.add_cell_scalar_quantity(name, values, data_type).map(|_| ()))??;
        Ok(self)
    }

    /// Adds a scalar quantity with one value per node.
    pub fn add_node_scalar_quantity(
        &self,
        name: &str,
        node_indices: &[IVec3],
        values: Vec<f32>,
        data_type: DataType,
    ) -> Result<&Self> {
        self.with_grid(|g| {
            g.add_node_scalar_quantity(name, node_indices, values, data_type)
                .map(|_| ())
        })??;
        Ok(self)
    }

    /// Adds a color quantity with one color per cell.
    pub fn add_cell_color_quantity(&self, name: &str, colors: Vec<Vec3>) -> Result<&Self> {
        self.with_grid(|g| g.add_cell_color_quantity(name, colors).map(|_| ()))??;
        Ok(self)
    }

    /// Adds a color quantity with one color per node.
    pub fn add_node_color_quantity(
        &self,
        name: &str,
        node_indices: &[IVec3],
        colors: Vec<Vec3>,
    ) -> Result<&Self> {
        self.with_grid(|g| {
            g.add_node_color_quantity(name, node_indices, colors)
                .map(|_| ())
        })??;
        Ok(self)
    }

    /// Enables or disables a quantity; enabling disables the others.
    pub fn set_quantity_enabled(&self, quantity_name: &str, enabled: bool) -> Result<&Self> {
        self.with_grid(|g| g.set_quantity_enabled(quantity_name, enabled))??;
        Ok(self)
    }

    /// Removes a quantity by name.
    pub fn remove_quantity(&self, quantity_name: &str) -> Result<&Self> {
        self.with_grid(|g| g.remove_quantity(quantity_name))??;
        Ok(self)
    }

    /// Removes every quantity.
    pub fn remove_all_quantities(&self) -> Result<&Self> {
        self.with_grid(SparseVolumeGrid::remove_all_quantities)?;
        Ok(self)
    }
}
