use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::core::{Clock, FpsCounter, MovementState, ViewportSize, WinitController};
use crate::error::ViewerError;
use crate::renderer::{Renderer, RendererOptions};

/// Trackpads report pixels; this many count as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Window, renderer and camera for one viewer session
pub struct App {
    config: ViewerConfig,
    options: RendererOptions,
    camera: Camera,
    controller: WinitController,
    clock: Clock,
    fps: FpsCounter,
    camera_dirty: bool,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    error: Option<ViewerError>,
}

impl App {
    pub fn new(config: ViewerConfig, options: RendererOptions) -> Self {
        let camera = Camera::new(config.window.width, config.window.height, &config.camera);

        Self {
            config,
            options,
            camera,
            controller: WinitController::new(),
            clock: Clock::new(),
            fps: FpsCounter::default(),
            camera_dirty: true,
            window: None,
            renderer: None,
            error: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<ViewerError> {
        self.error.take()
    }

    /// Apply one frame of input: pending mouse-look first, then movement.
    pub fn step(&mut self, dt: f32) {
        if let Some((dx, dy)) = self.controller.take_look_delta() {
            self.camera.look(dx, dy);
            self.camera_dirty = true;
        }

        if MovementState::from_controller(&self.controller).apply(&mut self.camera, dt) {
            self.camera_dirty = true;
        }
    }

    /// Narrow or widen the field of view by `lines` wheel notches
    pub fn zoom(&mut self, lines: f32) {
        if lines == 0.0 {
            return;
        }
        let field_of_view = self.camera.field_of_view() - self.config.camera.zoom_step * lines;
        self.camera.set_field_of_view(field_of_view);
        self.camera_dirty = true;
    }

    /// Follow a new framebuffer size.
    ///
    /// Returns false when the size is empty or unchanged.
    pub fn resize_camera(&mut self, size: ViewportSize) -> bool {
        if size.is_empty() || size == self.camera.viewport() {
            return false;
        }
        self.camera.compute_projection(size.width, size.height);
        self.camera_dirty = true;
        true
    }

    /// Bring the camera and surface to `size`.
    ///
    /// The surface is reconfigured when the size changed, or always with
    /// `force` (a lost or outdated surface). Empty sizes are ignored.
    fn apply_surface_size(&mut self, size: ViewportSize, force: bool) {
        let changed = self.resize_camera(size);
        if changed || (force && !size.is_empty()) {
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(size);
            }
        }
    }

    /// Pass releases and focus loss to the controller even when the overlay
    /// consumed them, so no button stays held.
    fn forward_release(&mut self, event: &WindowEvent) {
        let release = match event {
            WindowEvent::KeyboardInput { event, .. } => event.state == ElementState::Released,
            WindowEvent::MouseInput { state, .. } => *state == ElementState::Released,
            WindowEvent::Focused(focused) => !focused,
            _ => false,
        };
        if !release {
            return;
        }

        let was_looking = self.controller.is_looking();
        self.controller.process_event(event);
        if was_looking && !self.controller.is_looking() {
            self.set_looking(false);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn set_looking(&self, looking: bool) {
        let Some(window) = &self.window else {
            return;
        };

        if looking {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("Cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Cursor release failed: {e}");
            }
            window.set_cursor_visible(true);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        if let Some(fps) = self.fps.tick(dt) {
            log::debug!("{:.1} fps", fps);
        }

        self.step(dt);

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        if self.camera_dirty {
            renderer.update_camera(&self.camera);
            self.camera_dirty = false;
        }

        let mut reconfigure = None;
        match renderer.render(window, &self.camera, self.fps.fps()) {
            Ok(edits) => {
                if edits.apply(&mut self.camera) {
                    self.camera_dirty = true;
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                reconfigure = Some(ViewportSize::from(window.inner_size()));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e}"),
        }

        if let Some(size) = reconfigure {
            self.apply_surface_size(size, true);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        self.resize_camera(ViewportSize::from(window.inner_size()));

        let renderer = match pollster::block_on(Renderer::new(
            window.clone(),
            &self.config,
            &self.camera,
            self.options,
        )) {
            Ok(r) => r,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };

        log::info!("Controls: WASD/arrows move, hold left mouse to look, wheel zooms, Escape quits");

        self.clock.reset();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                self.forward_release(&event);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.apply_surface_size(ViewportSize::from(size), false),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.zoom(lines);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.controller.process_event(&event);
                self.set_looking(state == ElementState::Pressed);
            }
            WindowEvent::Focused(false) => {
                self.controller.process_event(&event);
                self.set_looking(false);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => self.controller.process_event(&event),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.controller.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
