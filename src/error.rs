//! Crate-level error types.

use std::fmt;

/// Errors produced while configuring or starting the viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Configuration file could not be parsed.
    ConfigParse(String),
    /// The window surface could not be created.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter compatible with the surface.
    Adapter(String),
    /// Device request was rejected.
    Device(wgpu::RequestDeviceError),
    /// Window creation failure.
    Window(winit::error::OsError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::Surface(e) => write!(f, "failed to create surface: {e}"),
            Self::Adapter(msg) => write!(f, "no suitable GPU adapter: {msg}"),
            Self::Device(e) => write!(f, "failed to create device: {e}"),
            Self::Window(e) => write!(f, "failed to create window: {e}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Surface(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::Window(e) => Some(e),
            Self::ConfigParse(_) | Self::Adapter(_) => None,
        }
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<wgpu::CreateSurfaceError> for ViewerError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for ViewerError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        Self::Window(e)
    }
}
