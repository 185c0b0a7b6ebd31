//! Gridcube program geometry and uniform layouts.
//!
//! A gridcube draw is one instance per cell. Each instance is a unit cube
//! emitted as a single triangle strip; the vertex shader places it at
//! `origin + (ijk + 0.5) * spacing` and shrinks it by the cube size factor.

use glam::Mat4;

/// Corner visiting order of the 14-vertex triangle strip covering a cube.
///
/// Corner `c` sits at offset `((c >> 2) & 1, (c >> 1) & 1, c & 1)`.
pub const GRIDCUBE_STRIP: [u32; 14] = [7, 3, 5, 1, 0, 3, 2, 7, 6, 5, 4, 0, 6, 2];

/// Uniforms for the gridcube shader.
/// Layout must match WGSL `GridcubeUniforms` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct GridcubeUniforms {
    /// Model transform matrix.
    pub model: [[f32; 4]; 4],
    /// Cell width per axis.
    pub grid_spacing: [f32; 3],
    /// Fraction of the cell the cube fills (1 = touching neighbors).
    pub cube_size_factor: f32,
    /// Edge color.
    pub edge_color: [f32; 3],
    /// Edge width in pixels, 0 disables edges.
    pub edge_width: f32,
    /// Base color.
    pub base_color: [f32; 3],
    /// Scalar range low end.
    pub range_low: f32,
    /// Scalar range high end.
    pub range_high: f32,
    /// Padding to 16-byte alignment.
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl Default for GridcubeUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            grid_spacing: [1.0; 3],
            cube_size_factor: 1.0,
            edge_color: [0.0; 3],
            edge_width: 0.0,
            base_color: [0.5; 3],
            range_low: 0.0,
            range_high: 1.0,
            _pad0: 0.0,
            _pad1: 0.0,
            _pad2: 0.0,
        }
    }
}

/// GPU uniforms for gridcube pick rendering.
///
/// Layout must match WGSL `GridcubePickUniforms` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct GridcubePickUniforms {
    /// Model transform matrix.
    pub model: [[f32; 4]; 4],
    /// Cell width per axis.
    pub grid_spacing: [f32; 3],
    /// Cube size factor (0..1).
    pub cube_size_factor: f32,
}

impl Default for GridcubePickUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            grid_spacing: [1.0; 3],
            cube_size_factor: 1.0,
        }
    }
}

/// Uniforms shared by the sphere and cylinder impostors of the wireframe mode.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RaycastUniforms {
    /// Model transform matrix.
    pub model: [[f32; 4]; 4],
    /// Impostor color.
    pub base_color: [f32; 3],
    /// Sphere or cylinder radius in world units.
    pub radius: f32,
}

impl Default for RaycastUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            base_color: [0.2; 3],
            radius: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn corner_offset(corner: u32) -> Vec3 {
        Vec3::new(
            ((corner >> 2) & 1) as f32,
            ((corner >> 1) & 1) as f32,
            (corner & 1) as f32,
        )
    }

    fn gridcube_strip_positions() -> [Vec3; 14] {
        GRIDCUBE_STRIP.map(|c| corner_offset(c) - Vec3::splat(0.5))
    }

    #[test]
    fn test_gridcube_uniforms_size() {
        let size = std::mem::size_of::<GridcubeUniforms>();
        assert_eq!(size % 16, 0, "GridcubeUniforms size ({size} bytes) must be 16-byte aligned");
        // model(64) + spacing/size(16) + edge(16) + base/low(16) + high/pad(16) = 128
        assert_eq!(size, 128, "GridcubeUniforms should be 128 bytes, got {size}");
    }

    #[test]
    fn test_pick_and_raycast_uniforms_size() {
        assert_eq!(std::mem::size_of::<GridcubePickUniforms>(), 80);
        assert_eq!(std::mem::size_of::<RaycastUniforms>(), 80);
    }

    #[test]
    fn test_strip_covers_every_corner() {
        let mut seen = [false; 8];
        for c in GRIDCUBE_STRIP {
            seen[c as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_strip_triangles_are_non_degenerate() {
        let p = gridcube_strip_positions();
        for w in p.windows(3) {
            let n = (w[1] - w[0]).cross(w[2] - w[0]);
            assert!(n.length() > 0.0);
        }
        for v in p {
            assert!(v.abs().max_element() <= 0.5);
        }
    }

    #[test]
    fn test_corner_offset_convention() {
        assert_eq!(corner_offset(0), Vec3::ZERO);
        assert_eq!(corner_offset(4), Vec3::X);
        assert_eq!(corner_offset(2), Vec3::Y);
        assert_eq!(corner_offset(1), Vec3::Z);
        assert_eq!(corner_offset(7), Vec3::ONE);
    }
}
