use glam::{Mat3, Mat4};

use crate::camera::Camera;

//        7--------6
//       /|       /|
//      4--------5 |
//      | |      | |
//      | 3------|-2
//      |/       |/
//      0--------1
pub const SKYBOX_VERTICES: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

pub const SKYBOX_INDICES: [u32; 36] = super::mesh::BOX_INDICES;

/// View-projection for the skybox cube.
///
/// Uses the camera's projection and only the rotational part of its view, so
/// the sky follows where the camera looks but never where it is.
pub fn skybox_view_projection(camera: &Camera) -> Mat4 {
    let rotation = Mat4::from_mat3(Mat3::from_mat4(camera.view_matrix()));
    camera.projection_matrix() * rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;
    use glam::Vec3;

    #[test]
    fn ignores_camera_translation() {
        let origin = Camera::new(1280, 720, &CameraSettings::default());
        let moved = Camera::new(
            1280,
            720,
            &CameraSettings {
                position: Vec3::new(40.0, -3.0, 12.5),
                ..CameraSettings::default()
            },
        );

        assert!(skybox_view_projection(&origin).abs_diff_eq(skybox_view_projection(&moved), 1e-4));
    }

    #[test]
    fn look_direction_projects_to_screen_centre() {
        let mut camera = Camera::new(1280, 720, &CameraSettings::default());
        camera.look(300.0, -80.0);

        let clip = skybox_view_projection(&camera) * camera.direction().extend(1.0);
        let ndc = clip / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(clip.w > 0.0);
    }
}
