use crate::camera::Camera;

use super::controller::{Button, Controller};

const FORWARD: [Button; 2] = [Button::ArrowUp, Button::KeyW];
const BACKWARD: [Button; 2] = [Button::ArrowDown, Button::KeyS];
const LEFT: [Button; 2] = [Button::ArrowLeft, Button::KeyA];
const RIGHT: [Button; 2] = [Button::ArrowRight, Button::KeyD];

/// Held movement directions for one frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    /// Read the arrow keys and WASD from a controller
    pub fn from_controller(controller: &dyn Controller) -> Self {
        Self {
            forward: controller.any_down(&FORWARD),
            backward: controller.any_down(&BACKWARD),
            left: controller.any_down(&LEFT),
            right: controller.any_down(&RIGHT),
        }
    }

    pub const fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    /// Translate the camera for `dt` seconds.
    ///
    /// Returns true when the camera moved and its matrices need re-uploading.
    /// Opposite directions are both applied and cancel out.
    pub fn apply(&self, camera: &mut Camera, dt: f32) -> bool {
        if self.forward {
            camera.move_forward(dt);
        }
        if self.backward {
            camera.move_backward(dt);
        }
        if self.left {
            camera.move_left(dt);
        }
        if self.right {
            camera.move_right(dt);
        }
        !self.is_idle()
    }
}
