use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Vec3};

use crate::config::CameraSettings;
use crate::core::viewport::ViewportSize;

pub const MIN_FIELD_OF_VIEW: f32 = 30.0;
pub const MAX_FIELD_OF_VIEW: f32 = 180.0;

/// Lowest pitch: looking straight up.
pub const MIN_VERTICAL_ANGLE: f32 = FRAC_PI_2;
/// Highest pitch: looking straight down.
pub const MAX_VERTICAL_ANGLE: f32 = 3.0 * PI / 2.0;

/// Free-flying camera driven by yaw/pitch angles.
///
/// Every mutator recomputes the cached matrices before returning, so
/// `view_projection_matrix()` is always `projection_matrix() * view_matrix()`
/// for the current state. Projection follows the OpenGL clip-space
/// convention (depth in -1..1); the renderer converts when uploading.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
    viewport: ViewportSize,
    position: Vec3,
    direction: Vec3,
    right: Vec3,
    up: Vec3,
    horizontal_angle: f32,
    vertical_angle: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    field_of_view: f32,
    near: f32,
    far: f32,
    aspect_ratio: f32,
}

impl Camera {
    /// Create a camera for a `width` x `height` pixel viewport.
    ///
    /// Angles and field of view from `settings` are normalized the same way
    /// the mutators normalize them.
    pub fn new(width: u32, height: u32, settings: &CameraSettings) -> Self {
        let horizontal_angle = wrap_horizontal_angle(settings.horizontal_angle);
        let vertical_angle = clamp_vertical_angle(settings.vertical_angle);

        let right = right_from_yaw(horizontal_angle);
        let direction = direction_from_angles(horizontal_angle, vertical_angle);
        let up = right.cross(direction);

        let mut camera = Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            viewport: ViewportSize::new(width, height),
            position: settings.position,
            direction,
            right,
            up,
            horizontal_angle,
            vertical_angle,
            movement_speed: settings.movement_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            field_of_view: clamp_field_of_view(settings.field_of_view),
            near: settings.near,
            far: settings.far,
            aspect_ratio: 1.0,
        };

        camera.view_matrix = camera.look_at();
        camera.compute_projection(width, height);
        camera
    }

    /// Rotate around the vertical axis by `delta` raw input units.
    ///
    /// The yaw wraps into `[0, 2π)`. Only the horizontal components of the
    /// direction depend on yaw; `right` stays in the horizontal plane.
    pub fn apply_yaw(&mut self, delta: f32) {
        self.horizontal_angle =
            wrap_horizontal_angle(self.horizontal_angle + self.mouse_sensitivity * delta);

        let cos_pitch = self.vertical_angle.cos();
        self.direction.x = cos_pitch * self.horizontal_angle.cos();
        self.direction.z = cos_pitch * self.horizontal_angle.sin();

        let right = right_from_yaw(self.horizontal_angle);
        self.right.x = right.x;
        self.right.z = right.z;

        self.up = self.right.cross(self.direction);
        self.update_view();
    }

    /// Rotate around the horizontal axis by `delta` raw input units.
    ///
    /// The pitch is clamped to `[π/2, 3π/2]` so the camera never flips over
    /// the poles. `right` does not depend on pitch.
    pub fn apply_pitch(&mut self, delta: f32) {
        self.vertical_angle =
            clamp_vertical_angle(self.vertical_angle + self.mouse_sensitivity * delta);

        self.direction = direction_from_angles(self.horizontal_angle, self.vertical_angle);

        self.up = self.right.cross(self.direction);
        self.update_view();
    }

    /// One pointer movement: yaw from the horizontal delta, then pitch from
    /// the vertical delta.
    pub fn look(&mut self, horizontal_delta: f32, vertical_delta: f32) {
        self.apply_yaw(horizontal_delta);
        self.apply_pitch(vertical_delta);
    }

    pub fn move_forward(&mut self, dt: f32) {
        self.position += self.direction * self.movement_speed * dt;
        self.update_view();
    }

    pub fn move_backward(&mut self, dt: f32) {
        self.position -= self.direction * self.movement_speed * dt;
        self.update_view();
    }

    pub fn move_left(&mut self, dt: f32) {
        self.position -= self.right * self.movement_speed * dt;
        self.update_view();
    }

    pub fn move_right(&mut self, dt: f32) {
        self.position += self.right * self.movement_speed * dt;
        self.update_view();
    }

    /// Store a new viewport size and rebuild the projection.
    ///
    /// Both dimensions must be non-zero; a zero height yields a degenerate
    /// aspect ratio.
    pub fn compute_projection(&mut self, width: u32, height: u32) {
        self.viewport = ViewportSize::new(width, height);
        self.aspect_ratio = self.viewport.aspect_ratio();

        self.projection_matrix = Mat4::perspective_rh_gl(
            self.field_of_view.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        );

        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Set the vertical field of view in degrees, clamped to `[30, 180]`.
    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = clamp_field_of_view(field_of_view);
        self.refresh_projection();
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
        self.refresh_projection();
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        self.refresh_projection();
    }

    pub fn set_movement_speed(&mut self, movement_speed: f32) {
        self.movement_speed = movement_speed;
    }

    pub fn set_mouse_sensitivity(&mut self, mouse_sensitivity: f32) {
        self.mouse_sensitivity = mouse_sensitivity;
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Yaw in radians, always in `[0, 2π)`.
    pub fn horizontal_angle(&self) -> f32 {
        self.horizontal_angle
    }

    /// Pitch in radians, always in `[π/2, 3π/2]`.
    pub fn vertical_angle(&self) -> f32 {
        self.vertical_angle
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    /// Vertical field of view in degrees.
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    fn look_at(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    fn update_view(&mut self) {
        self.view_matrix = self.look_at();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    fn refresh_projection(&mut self) {
        self.compute_projection(self.viewport.width, self.viewport.height);
    }
}

fn direction_from_angles(horizontal_angle: f32, vertical_angle: f32) -> Vec3 {
    Vec3::new(
        vertical_angle.cos() * horizontal_angle.cos(),
        vertical_angle.sin(),
        vertical_angle.cos() * horizontal_angle.sin(),
    )
}

fn right_from_yaw(horizontal_angle: f32) -> Vec3 {
    Vec3::new(
        (horizontal_angle - FRAC_PI_2).cos(),
        0.0,
        (horizontal_angle - FRAC_PI_2).sin(),
    )
}

/// `angle mod 2π` in `[0, 2π)`.
///
/// `rem_euclid` can round up to exactly 2π for tiny negative inputs; that
/// case folds back to 0.
pub fn wrap_horizontal_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

pub fn clamp_vertical_angle(angle: f32) -> f32 {
    angle.clamp(MIN_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE)
}

pub fn clamp_field_of_view(field_of_view: f32) -> f32 {
    field_of_view.clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW)
}
