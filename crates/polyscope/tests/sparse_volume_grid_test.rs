//! Integration tests for the sparse volume grid API.
//!
//! Note: Due to polyscope using global state that can only be initialized once
//! per process (OnceLock), all tests are combined into a single test function.

use polyscope_rs::*;
use polyscope_ui::{ScriptedEdit, ScriptedUi};

fn l_shape() -> Vec<IVec3> {
    vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(1, 1, 0)]
}

/// Main integration test that runs all sparse volume grid tests in sequence.
#[test]
fn test_sparse_volume_grid_api() {
    init().expect("init failed");
    assert!(is_initialized());
    assert!(matches!(init(), Err(PolyscopeError::AlreadyInitialized)));

    // Test 1: Registration and lookup
    {
        let grid = register_sparse_volume_grid("it_grid", Vec3::ZERO, Vec3::ONE, l_shape())
            .expect("registration failed");
        assert_eq!(grid.name(), "it_grid");
        assert!(has_sparse_volume_grid("it_grid"));
        assert!(get_sparse_volume_grid("it_grid").is_some());
        assert!(get_sparse_volume_grid("nonexistent").is_none());
        assert_eq!(grid.num_cells().unwrap(), 3);
        assert_eq!(grid.num_nodes().unwrap(), 16);

        let ((min, max), _) = scene_extents().unwrap();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(2.0, 2.0, 1.0));
    }

    // Test 2: Failed registrations leave nothing behind
    {
        let dup = register_sparse_volume_grid(
            "it_dup",
            Vec3::ZERO,
            Vec3::ONE,
            vec![IVec3::ZERO, IVec3::ZERO],
        );
        assert!(matches!(dup, Err(PolyscopeError::DuplicateCell { .. })));
        assert!(!has_sparse_volume_grid("it_dup"));

        let again = register_sparse_volume_grid("it_grid", Vec3::ZERO, Vec3::ONE, l_shape());
        assert!(matches!(again, Err(PolyscopeError::StructureExists(_))));
    }

    // Test 3: Quantities through the handle
    {
        let grid = get_sparse_volume_grid("it_grid").unwrap();
        grid.add_cell_scalar_quantity("cell", vec![1.0, 2.0, 3.0], DataType::Standard)
            .unwrap();
        assert!(grid
            .add_cell_color_quantity("bad", vec![Vec3::ONE; 2])
            .is_err());

        let nodes = with_sparse_volume_grid_ref("it_grid", |g| g.canonical_nodes().to_vec())
            .unwrap();
        let mut shuffled: Vec<IVec3> = nodes.iter().rev().copied().collect();
        shuffled.push(IVec3::new(50, 50, 50));
        let colors: Vec<Vec3> = shuffled.iter().map(|n| n.as_vec3() / 2.0).collect();
        grid.add_node_color_quantity("node", &shuffled, colors).unwrap();

        let canonical = with_sparse_volume_grid_ref("it_grid", |g| match g.get_quantity("node") {
            Some(SparseVolumeGridQuantity::NodeColor(q)) => {
                assert_eq!(q.colors()[0], nodes[0].as_vec3() / 2.0);
                q.was_canonical()
            }
            _ => panic!("expected a node color quantity"),
        })
        .unwrap();
        assert!(!canonical);

        grid.set_quantity_enabled("cell", true).unwrap();
        grid.set_quantity_enabled("node", true).unwrap();
        let enabled: Vec<String> = with_sparse_volume_grid_ref("it_grid", |g| {
            g.quantities()
                .iter()
                .filter(|q| q.is_enabled())
                .map(|q| q.name().to_string())
                .collect()
        })
        .unwrap();
        assert_eq!(enabled, vec!["node".to_string()]);
        assert!(grid.set_quantity_enabled("missing", true).is_err());
    }

    // Test 4: Drawing through the headless backend
    {
        let mut backend = HeadlessRenderContext::new();
        draw_frame(&mut backend).unwrap();
        let draws = backend.take_draws();
        assert_eq!(draws.len(), 1);
        assert!(draws[0].has_rule("GRIDCUBE_PROPAGATE_ATTR_NODE_COLOR"));

        let grid = get_sparse_volume_grid("it_grid").unwrap();
        grid.set_render_mode(SparseVolumeGridRenderMode::Wireframe).unwrap();
        draw_frame(&mut backend).unwrap();
        let draws = backend.take_draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].program_name, "RAYCAST_SPHERE");
        grid.set_render_mode(SparseVolumeGridRenderMode::Gridcube).unwrap();
        assert_eq!(grid.num_cells().unwrap(), 3);
    }

    // Test 5: Picking
    {
        let mut backend = HeadlessRenderContext::new();
        draw_pick_frame(&mut backend).unwrap();
        assert!(!backend.take_draws().is_empty());

        let pick = PickResult::new("Sparse Volume Grid", "it_grid", 2, Vec3::new(1.97, 1.97, 0.5), 0.3);
        let result = interpret_sparse_volume_grid_pick(&pick).unwrap();
        assert_eq!(result.cell_index, IVec3::new(1, 1, 0));
        assert_eq!(result.element_type, SparseVolumeGridElement::Cell);

        let corner = PickResult::new("Sparse Volume Grid", "it_grid", 2, Vec3::new(1.97, 1.97, 0.97), 0.3);
        let result = interpret_sparse_volume_grid_pick(&corner).unwrap();
        assert_eq!(result.element_type, SparseVolumeGridElement::Node);
        assert_eq!(result.node_index, Some(IVec3::new(2, 2, 1)));

        let mut ui = ScriptedUi::new();
        build_pick_ui(&mut ui, &corner).unwrap();
        assert_eq!(ui.info_value("Node index"), Some("(2, 2, 1)"));
        assert!(ui.info_value("Node #").is_some());

        let foreign = PickResult::new("Sparse Volume Grid", "nope", 0, Vec3::ZERO, 0.0);
        assert!(interpret_sparse_volume_grid_pick(&foreign).is_err());
    }

    // Test 6: Structure panel through the scripted UI
    {
        let mut ui = ScriptedUi::new();
        ui.script("Cell Shrink", ScriptedEdit::SetFloat(0.5));
        assert!(build_structures_ui(&mut ui));
        assert!(ui.texts().contains(&"3 cells"));
        let shrink = with_sparse_volume_grid_ref("it_grid", SparseVolumeGrid::cube_size_factor).unwrap();
        assert!((shrink - 0.5).abs() < f32::EPSILON);
    }

    // Test 7: Options and transforms
    {
        let mut options = options().unwrap();
        options.default_material = "wax".into();
        set_options(options).unwrap();
        register_sparse_volume_grid("it_wax", Vec3::ZERO, Vec3::ONE, vec![IVec3::ZERO]).unwrap();
        let material = with_sparse_volume_grid_ref("it_wax", |g| g.material().to_string()).unwrap();
        assert_eq!(material, "wax");

        with_sparse_volume_grid("it_wax", |g| {
            g.set_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)));
        });
        let ((_, max), _) = scene_extents().unwrap();
        assert_eq!(max.z, 11.0);
    }

    // Test 8: Removal
    {
        remove_sparse_volume_grid("it_wax", true).unwrap();
        assert!(!has_sparse_volume_grid("it_wax"));
        assert!(remove_sparse_volume_grid("it_wax", false).is_ok());
        assert!(matches!(
            remove_sparse_volume_grid("it_wax", true),
            Err(PolyscopeError::StructureNotFound(_))
        ));

        remove_all_structures();
        assert!(!has_sparse_volume_grid("it_grid"));
    }

    shutdown();
    assert!(!is_initialized());
}
