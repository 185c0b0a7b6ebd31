//! Initialization and lifecycle management for polyscope-rs.

use std::path::Path;

use polyscope_core::persistent::{load_persistent_cache, save_persistent_cache};
use polyscope_core::state::{try_with_context, try_with_context_mut};

use crate::{Options, PolyscopeError, Result};

/// Initializes polyscope with default settings.
///
/// This must be called before any other polyscope functions. It also
/// installs `env_logger`, so `RUST_LOG` controls log output.
///
/// # Errors
///
/// Returns an error if polyscope has already been initialized.
///
/// # Example
///
/// ```no_run
/// use polyscope_rs::*;
///
/// fn main() -> Result<()> {
///     init()?;
///     // Now you can register structures
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    let _ = env_logger::try_init();
    polyscope_core::state::init_context()?;
    log::info!("polyscope-rs initialized");
    Ok(())
}

/// Returns whether polyscope has been initialized.
#[must_use]
pub fn is_initialized() -> bool {
    polyscope_core::state::is_initialized()
}

/// Shuts down polyscope and releases all resources.
///
/// This clears all registered structures and resets the global state.
/// After calling this, you can call [`init()`] again to reinitialize.
pub fn shutdown() {
    polyscope_core::state::shutdown_context();
    log::info!("polyscope-rs shut down");
}

/// Returns a copy of the global options.
pub fn options() -> Result<Options> {
    try_with_context(|ctx| ctx.options.clone()).ok_or(PolyscopeError::NotInitialized)
}

/// Replaces the global options. Structures registered later pick them up.
pub fn set_options(options: Options) -> Result<()> {
    try_with_context_mut(|ctx| {
        ctx.options = options;
        ctx.update_extents();
    })
    .ok_or(PolyscopeError::NotInitialized)
}

/// Removes every registered structure.
pub fn remove_all_structures() {
    try_with_context_mut(|ctx| {
        ctx.registry.clear();
        ctx.update_extents();
    });
}

/// Returns the scene bounding box and length scale.
pub fn scene_extents() -> Result<((crate::Vec3, crate::Vec3), f32)> {
    try_with_context(|ctx| (ctx.bounding_box, ctx.length_scale)).ok_or(PolyscopeError::NotInitialized)
}

/// Saves remembered structure options (colors, materials, ...) as JSON.
pub fn save_persistent_options(path: impl AsRef<Path>) -> Result<()> {
    save_persistent_cache(path)
}

/// Loads remembered structure options saved by [`save_persistent_options`].
pub fn load_persistent_options(path: impl AsRef<Path>) -> Result<()> {
    load_persistent_cache(path)
}
