// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// GPU backend family to request from wgpu.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Platform default (Vulkan, Metal or DX12)
    #[default]
    Primary,
    /// OpenGL / GLES
    Gl,
}

impl Backend {
    pub fn to_wgpu(self) -> wgpu::Backends {
        match self {
            Backend::Primary => wgpu::Backends::PRIMARY,
            Backend::Gl => wgpu::Backends::GL,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scene-viewer")]
#[command(about = "Interactive scene viewer with a free-fly camera", long_about = None)]
pub struct Cli {
    /// Enable GPU validation and debug logging
    #[arg(short, long, default_value = "false")]
    pub debug: bool,

    /// Disable the on-screen camera overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Disable vertical sync
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Vertical field of view in degrees (clamped to 30..=180)
    #[arg(long)]
    pub fov: Option<f32>,

    /// Camera movement speed in world units per second
    #[arg(long)]
    pub speed: Option<f32>,

    /// Mouse look sensitivity in radians per pixel
    #[arg(long)]
    pub sensitivity: Option<f32>,

    #[arg(long, value_enum, default_value_t = Backend::Primary)]
    pub backend: Backend,
}
