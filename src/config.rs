//! Viewer configuration.
//!
//! Every section uses `#[serde(default)]`, so a JSON file only needs the
//! fields it overrides. Command-line flags are layered on top with
//! [`ViewerConfig::apply_cli`].

use std::f32::consts::{FRAC_PI_2, PI};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Initial camera state and tuning.
pub struct CameraSettings {
    /// World-space start position.
    pub position: Vec3,
    /// Yaw in radians.
    pub horizontal_angle: f32,
    /// Pitch in radians. `π` looks at the horizon.
    pub vertical_angle: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Radians per raw pointer unit.
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub near: f32,
    pub far: f32,
    /// Degrees of field of view per mouse wheel line.
    pub zoom_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            horizontal_angle: FRAC_PI_2,
            vertical_angle: PI,
            movement_speed: 5.0,
            mouse_sensitivity: 0.005,
            field_of_view: 70.0,
            near: 0.1,
            far: 725.0,
            zoom_step: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Procedural scene layout.
pub struct SceneSettings {
    /// Edge length of the square ground plane.
    pub ground_size: f32,
    /// World-space height of the ground plane.
    pub ground_height: f32,
    pub ground_subdivisions: u32,
    pub prop_rows: u32,
    pub prop_columns: u32,
    /// Distance between neighbouring props.
    pub prop_spacing: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            ground_size: 400.0,
            ground_height: -2.0,
            ground_subdivisions: 40,
            prop_rows: 8,
            prop_columns: 8,
            prop_spacing: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub scene: SceneSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            camera: CameraSettings {
                position: Vec3::new(0.0, 0.0, 2.5),
                ..CameraSettings::default()
            },
            scene: SceneSettings::default(),
        }
    }
}

impl ViewerConfig {
    /// Load a configuration from a JSON file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ViewerError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ViewerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the effective configuration: the `--config` file (if any) with
    /// command-line overrides applied.
    pub fn from_cli(cli: &Cli) -> Result<Self, ViewerError> {
        let mut config = match &cli.config {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the camera cannot build a projection from: an empty
    /// window, a near plane at or behind the eye, or far not beyond near.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ViewerError::ConfigParse(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let CameraSettings { near, far, .. } = self.camera;
        if !(near.is_finite() && near > 0.0) {
            return Err(ViewerError::ConfigParse(format!(
                "camera.near must be positive, got {near}"
            )));
        }
        if !(far.is_finite() && far > near) {
            return Err(ViewerError::ConfigParse(format!(
                "camera.far must be greater than camera.near ({near}), got {far}"
            )));
        }

        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.window.width = width;
        }
        if let Some(height) = cli.height {
            self.window.height = height;
        }
        if let Some(fov) = cli.fov {
            self.camera.field_of_view = fov;
        }
        if let Some(speed) = cli.speed {
            self.camera.movement_speed = speed;
        }
        if let Some(sensitivity) = cli.sensitivity {
            self.camera.mouse_sensitivity = sensitivity;
        }
        if cli.no_vsync {
            self.window.vsync = false;
        }
    }
}
