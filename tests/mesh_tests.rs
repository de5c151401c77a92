use glam::Vec3;
use scene_viewer::config::SceneSettings;
use scene_viewer::scene::{
    grid_instances, ground_plane, prop, sphere, Mesh, GROUND_COLOR, SKYBOX_INDICES,
    SKYBOX_VERTICES,
};

fn assert_indices_in_range(mesh: &Mesh) {
    let vertex_count = mesh.vertices.len() as u32;
    assert_eq!(mesh.indices.len() % 3, 0, "not a triangle list");
    assert!(
        mesh.indices.iter().all(|&index| index < vertex_count),
        "index out of range for {} vertices",
        vertex_count
    );
}

#[cfg(test)]
mod mesh_generation_tests {
    use super::*;

    #[test]
    fn test_ground_plane_counts() {
        for n in [1u32, 2, 7, 40] {
            let mesh = ground_plane(100.0, n, 0.0, GROUND_COLOR);
            assert_eq!(mesh.vertices.len() as u32, (n + 1) * (n + 1));
            assert_eq!(mesh.indices.len() as u32, 6 * n * n);
            assert_indices_in_range(&mesh);
        }
    }

    #[test]
    fn test_ground_plane_zero_subdivisions_is_one_quad() {
        let mesh = ground_plane(10.0, 0, 0.0, GROUND_COLOR);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_ground_plane_is_flat_and_centred() {
        let mesh = ground_plane(50.0, 10, -2.0, GROUND_COLOR);

        assert!(mesh.vertices.iter().all(|v| v.position[1] == -2.0));

        let (min_x, max_x) = mesh.vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position[0]), hi.max(v.position[0]))
        });
        assert!((min_x + 25.0).abs() < 1e-4);
        assert!((max_x - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_counts() {
        for (stacks, sectors) in [(2u32, 3u32), (8, 12), (18, 36)] {
            let mesh = sphere(stacks, sectors, Vec3::ZERO, 1.0);
            assert_eq!(mesh.vertices.len() as u32, (stacks + 1) * (sectors + 1));
            assert_eq!(mesh.indices.len() as u32, 6 * sectors * (stacks - 1));
            assert_indices_in_range(&mesh);
        }
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let mesh = sphere(10, 20, center, 2.5);

        for vertex in &mesh.vertices {
            let distance = (Vec3::from(vertex.position) - center).length();
            assert!((distance - 2.5).abs() < 1e-4, "vertex at distance {}", distance);
            assert!(vertex.color.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_sphere_raises_degenerate_resolution() {
        let mesh = sphere(0, 0, Vec3::ZERO, 1.0);
        assert_eq!(mesh.vertices.len(), 3 * 4);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn test_prop_stands_on_origin() {
        let mesh = prop();
        assert_indices_in_range(&mesh);

        let lowest = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MAX, f32::min);
        assert_eq!(lowest, 0.0);
    }

    #[test]
    fn test_skybox_cube() {
        assert_eq!(SKYBOX_VERTICES.len(), 8);
        assert_eq!(SKYBOX_INDICES.len(), 36);
        assert!(SKYBOX_INDICES.iter().all(|&i| i < 8));
    }
}

#[cfg(test)]
mod instance_tests {
    use super::*;

    #[test]
    fn test_instance_count_and_centre() {
        let offsets = grid_instances(3, 5, 10.0, -2.0);
        assert_eq!(offsets.len(), 15);

        let mean = offsets.iter().copied().sum::<Vec3>() / offsets.len() as f32;
        assert!(mean.x.abs() < 1e-4 && mean.z.abs() < 1e-4, "mean {:?}", mean);
        assert!(offsets.iter().all(|o| o.y == -2.0));
    }

    #[test]
    fn test_default_scene_fits_on_ground() {
        let scene = SceneSettings::default();
        let offsets = grid_instances(
            scene.prop_rows,
            scene.prop_columns,
            scene.prop_spacing,
            scene.ground_height,
        );

        let half = scene.ground_size * 0.5;
        assert!(offsets
            .iter()
            .all(|o| o.x.abs() < half && o.z.abs() < half));
    }
}
