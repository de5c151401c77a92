use glam::Vec3;

/// Per-instance translations for a `rows` x `columns` grid of props.
///
/// The grid is centred on the origin in the XZ plane and placed at `height`.
pub fn grid_instances(rows: u32, columns: u32, spacing: f32, height: f32) -> Vec<Vec3> {
    let x_origin = (columns.saturating_sub(1)) as f32 * spacing * 0.5;
    let z_origin = (rows.saturating_sub(1)) as f32 * spacing * 0.5;

    (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |column| {
                Vec3::new(
                    column as f32 * spacing - x_origin,
                    height,
                    row as f32 * spacing - z_origin,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_instance_sits_at_origin() {
        assert_eq!(grid_instances(1, 1, 10.0, 0.0), vec![Vec3::ZERO]);
    }

    #[test]
    fn empty_grid() {
        assert!(grid_instances(0, 5, 1.0, 0.0).is_empty());
        assert!(grid_instances(5, 0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn neighbours_are_spacing_apart() {
        let offsets = grid_instances(2, 3, 4.0, 0.0);
        assert_eq!(offsets[1].x - offsets[0].x, 4.0);
        assert_eq!(offsets[3].z - offsets[0].z, 4.0);
    }
}
