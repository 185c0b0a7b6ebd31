//! Configuration options for polyscope.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Global configuration options for polyscope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Whether to automatically compute scene extents.
    pub auto_compute_scene_extents: bool,

    /// Scale factor applied to UI widget widths.
    pub ui_scale: f32,

    /// Material given to newly registered structures.
    pub default_material: String,

    /// Background color.
    pub background_color: Vec3,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            auto_compute_scene_extents: true,
            ui_scale: 1.0,
            default_material: "clay".to_string(),
            background_color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: Options = serde_json::from_str(r#"{ "ui_scale": 2.0 }"#).unwrap();
        assert!((options.ui_scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(options.default_material, "clay");
        assert!(options.auto_compute_scene_extents);
    }
}
