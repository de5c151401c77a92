use std::sync::Arc;
use wgpu::{Adapter, Backends, Device, DeviceDescriptor, Instance, InstanceFlags, Queue, Surface};
use winit::window::Window;

use crate::error::ViewerError;

type Result<T> = std::result::Result<T, ViewerError>;

/// Device, queue and window surface negotiated for one window
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Create a GPU context compatible with `window`
    ///
    /// `debug` turns on backend validation, the equivalent of a debug
    /// context on OpenGL.
    pub async fn new(window: Arc<Window>, backends: Backends, debug: bool) -> Result<Self> {
        let flags = if debug {
            InstanceFlags::debugging()
        } else {
            InstanceFlags::default()
        };

        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends,
            flags,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        let adapter = Self::request_adapter(&instance, &surface).await?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);
        log::debug!("Driver: {} {}", info.driver, info.driver_info);

        let (device, queue) = Self::request_device(&adapter).await?;

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
        })
    }

    /// Build a surface configuration for the given size
    pub fn surface_config(&self, width: u32, height: u32, vsync: bool) -> wgpu::SurfaceConfiguration {
        let surface_caps = self.surface.get_capabilities(&self.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    /// Request adapter with surface compatibility
    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::Adapter(e.to_string()))
    }

    /// Request device and queue
    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await?;
        Ok((device, queue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_context_is_send() {
        // Creating a context needs a window and GPU; this only checks the type is movable
        // across threads like the wgpu handles it wraps
        fn assert_send<T: Send>() {}
        assert_send::<GpuContext>();
    }
}
