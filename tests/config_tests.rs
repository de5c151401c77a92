use std::f32::consts::{FRAC_PI_2, PI};

use clap::Parser;
use glam::Vec3;
use scene_viewer::cli::{Backend, Cli};
use scene_viewer::config::{CameraSettings, ViewerConfig};
use scene_viewer::ViewerError;

#[cfg(test)]
mod config_defaults_tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = CameraSettings::default();
        assert_eq!(camera.horizontal_angle, FRAC_PI_2);
        assert_eq!(camera.vertical_angle, PI);
        assert_eq!(camera.movement_speed, 5.0);
        assert_eq!(camera.mouse_sensitivity, 0.005);
        assert_eq!(camera.field_of_view, 70.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 725.0);
    }

    #[test]
    fn test_viewer_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.window.title, "Scene Viewer");
        assert_eq!((config.window.width, config.window.height), (1280, 720));
        assert!(config.window.vsync);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{ "window": { "width": 800 }, "camera": { "field_of_view": 90.0, "position": [1.0, 2.0, 3.0] } }"#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.field_of_view, 90.0);
        assert_eq!(config.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera.far, 725.0);
        assert_eq!(config.scene, Default::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ViewerConfig::from_json("{ \"window\": ").unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ViewerConfig::load(std::path::Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ViewerError::Io(_)), "got {:?}", err);
    }
}

#[cfg(test)]
mod config_validation_tests {
    use super::*;

    #[test]
    fn test_inverted_clip_planes_rejected() {
        let err = ViewerConfig::from_json(r#"{ "camera": { "near": 5.0, "far": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse(_)), "got {:?}", err);
    }

    #[test]
    fn test_equal_clip_planes_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "camera": { "near": 2.0, "far": 2.0 } }"#).is_err());
    }

    #[test]
    fn test_non_positive_near_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "camera": { "near": 0.0 } }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "camera": { "near": -0.5 } }"#).is_err());
    }

    #[test]
    fn test_zero_window_size_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "window": { "width": 0 } }"#).is_err());

        let cli = Cli::try_parse_from(["scene-viewer", "--height", "0"]).unwrap();
        let err = ViewerConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse(_)), "got {:?}", err);
    }

    #[test]
    fn test_valid_custom_clip_planes_accepted() {
        let config =
            ViewerConfig::from_json(r#"{ "camera": { "near": 0.001, "far": 10000.0 } }"#).unwrap();
        assert_eq!(config.camera.near, 0.001);
        assert_eq!(config.camera.far, 10000.0);
        assert!(ViewerConfig::default().validate().is_ok());
    }
}

#[cfg(test)]
mod cli_override_tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["scene-viewer"]).unwrap();
        assert_eq!(cli.backend, Backend::Primary);
        assert!(!cli.debug && !cli.no_ui);

        let config = ViewerConfig::from_cli(&cli).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "scene-viewer",
            "--width",
            "640",
            "--height",
            "480",
            "--fov",
            "100",
            "--speed",
            "12.5",
            "--sensitivity",
            "0.01",
            "--no-vsync",
            "--backend",
            "gl",
        ])
        .unwrap();

        let mut config = ViewerConfig::from_json(r#"{ "window": { "width": 1920 } }"#).unwrap();
        config.apply_cli(&cli);

        assert_eq!((config.window.width, config.window.height), (640, 480));
        assert_eq!(config.camera.field_of_view, 100.0);
        assert_eq!(config.camera.movement_speed, 12.5);
        assert_eq!(config.camera.mouse_sensitivity, 0.01);
        assert!(!config.window.vsync);
        assert_eq!(cli.backend.to_wgpu(), wgpu::Backends::GL);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Cli::try_parse_from(["scene-viewer", "--backend", "metal2"]).is_err());
    }

    #[test]
    fn test_config_file_loaded_from_cli() {
        let path = std::env::temp_dir().join(format!("scene-viewer-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "scene": { "prop_rows": 2 }, "camera": { "near": 0.5 } }"#)
            .unwrap();

        let cli = Cli::try_parse_from(["scene-viewer", "--config", path.to_str().unwrap(), "--fov", "45"])
            .unwrap();
        let config = ViewerConfig::from_cli(&cli).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.scene.prop_rows, 2);
        assert_eq!(config.camera.near, 0.5);
        assert_eq!(config.camera.field_of_view, 45.0);
    }
}
