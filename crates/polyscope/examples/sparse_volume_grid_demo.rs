//! Demo showing sparse volume grid usage with the headless backend.
//!
//! Builds a voxelized sphere shell, attaches cell and node data, and prints
//! what the backend was asked to draw. Run with `RUST_LOG=debug` to see the
//! lazy node derivation and program builds.

use polyscope_rs::*;

fn main() -> Result<()> {
    init()?;

    // Voxelize a spherical shell of radius 8 cells
    let n = 10;
    let mut cells = Vec::new();
    for i in -n..n {
        for j in -n..n {
            for k in -n..n {
                let c = IVec3::new(i, j, k).as_vec3() + 0.5;
                let r = c.length();
                if (6.0..8.0).contains(&r) {
                    cells.push(IVec3::new(i, j, k));
                }
            }
        }
    }
    let width = Vec3::splat(0.1);
    let grid = register_sparse_volume_grid("shell", Vec3::ZERO, width, cells.clone())?;
    grid.set_edge_width(1.0)?.set_cube_size_factor(0.1)?;

    let heights: Vec<f32> = cells.iter().map(|c| c.z as f32).collect();
    grid.add_cell_scalar_quantity("height", heights, DataType::Symmetric)?;

    // Node data, deliberately in reverse canonical order
    let nodes: Vec<IVec3> = with_sparse_volume_grid_ref("shell", |g| g.canonical_nodes().to_vec())
        .unwrap_or_default();
    let node_indices: Vec<IVec3> = nodes.iter().rev().copied().collect();
    let distances: Vec<f32> = node_indices
        .iter()
        .map(|n| n.as_vec3().length())
        .collect();
    grid.add_node_scalar_quantity("radius", &node_indices, distances, DataType::Magnitude)?;
    grid.set_quantity_enabled("radius", true)?;

    println!(
        "{} cells, {} nodes",
        grid.num_cells()?,
        grid.num_nodes()?
    );

    let mut backend = HeadlessRenderContext::new();
    draw_frame(&mut backend)?;
    draw_pick_frame(&mut backend)?;
    for draw in backend.take_draws() {
        println!("{} {:?}", draw.program_name, draw.rules);
    }

    grid.set_render_mode(SparseVolumeGridRenderMode::Wireframe)?;
    draw_frame(&mut backend)?;
    println!("wireframe: {} draws", backend.take_draws().len());

    let ((min, max), length_scale) = scene_extents()?;
    println!("scene bounds {min} .. {max}, length scale {length_scale:.3}");

    shutdown();
    Ok(())
}
