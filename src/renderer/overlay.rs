use winit::window::Window;

use crate::camera::{Camera, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW};

const NEAR_RANGE: std::ops::RangeInclusive<f32> = 0.01..=10.0;
const FAR_RANGE: std::ops::RangeInclusive<f32> = 20.0..=5000.0;

/// Camera changes requested from the overlay during one frame
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CameraEdits {
    pub field_of_view: Option<f32>,
    pub near: Option<f32>,
    pub far: Option<f32>,
}

impl CameraEdits {
    pub fn is_empty(&self) -> bool {
        self.field_of_view.is_none() && self.near.is_none() && self.far.is_none()
    }

    /// Apply the edits. Returns true when the camera changed.
    pub fn apply(&self, camera: &mut Camera) -> bool {
        if let Some(field_of_view) = self.field_of_view {
            camera.set_field_of_view(field_of_view);
        }
        if let Some(near) = self.near {
            camera.set_near(near);
        }
        if let Some(far) = self.far {
            camera.set_far(far);
        }
        !self.is_empty()
    }
}

/// egui panel showing frame rate and camera state
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Record the overlay pass on top of `target`.
    ///
    /// Returns the edits made this frame and any command buffers egui needs
    /// submitted before `encoder`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        camera: &Camera,
        fps: f32,
    ) -> (CameraEdits, Vec<wgpu::CommandBuffer>) {
        let raw_input = self.state.take_egui_input(window);

        let mut edits = CameraEdits::default();
        let full_output = self.ctx.run(raw_input, |ctx| {
            edits = camera_panel(ctx, camera, fps);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };

        let commands =
            self.renderer
                .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        (edits, commands)
    }
}

/// Lay out the camera panel and report which values the user changed.
///
/// Sliders only clamp user edits, so a near or far plane configured outside
/// the slider range survives untouched frames. Clip plane edits that would
/// put near at or beyond far are dropped.
fn camera_panel(ctx: &egui::Context, camera: &Camera, fps: f32) -> CameraEdits {
    let position = camera.position();
    let mut field_of_view = camera.field_of_view();
    let mut near = camera.near();
    let mut far = camera.far();

    egui::Window::new("Camera")
        .title_bar(true)
        .resizable(false)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .default_width(250.0)
        .show(ctx, |ui| {
            ui.heading(
                egui::RichText::new(format!("{:.0} FPS", fps))
                    .size(24.0)
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );

            ui.add_space(5.0);
            ui.separator();

            ui.monospace(format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                position.x, position.y, position.z
            ));
            ui.monospace(format!("Yaw:   {:.1}°", camera.horizontal_angle().to_degrees()));
            ui.monospace(format!("Pitch: {:.1}°", camera.vertical_angle().to_degrees()));
            ui.monospace(format!("Aspect: {:.3}", camera.aspect_ratio()));

            ui.add_space(5.0);
            ui.separator();

            ui.add(
                egui::Slider::new(&mut field_of_view, MIN_FIELD_OF_VIEW..=MAX_FIELD_OF_VIEW)
                    .clamping(egui::SliderClamping::Edits)
                    .text("FOV"),
            );
            ui.add(
                egui::Slider::new(&mut near, NEAR_RANGE)
                    .clamping(egui::SliderClamping::Edits)
                    .logarithmic(true)
                    .text("Near"),
            );
            ui.add(
                egui::Slider::new(&mut far, FAR_RANGE)
                    .clamping(egui::SliderClamping::Edits)
                    .logarithmic(true)
                    .text("Far"),
            );

            ui.add_space(5.0);
            ui.label("Hold left mouse to look, WASD or arrows to move");
        });

    let mut edits = CameraEdits {
        field_of_view: (field_of_view != camera.field_of_view()).then_some(field_of_view),
        near: (near != camera.near()).then_some(near),
        far: (far != camera.far()).then_some(far),
    };
    if near >= far {
        edits.near = None;
        edits.far = None;
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;

    #[test]
    fn test_empty_edits_leave_camera_alone() {
        let mut camera = Camera::new(800, 600, &CameraSettings::default());
        let before = camera.projection_matrix();

        assert!(!CameraEdits::default().apply(&mut camera));
        assert_eq!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_edits_rebuild_projection() {
        let mut camera = Camera::new(800, 600, &CameraSettings::default());
        let before = camera.projection_matrix();

        let edits = CameraEdits {
            field_of_view: Some(90.0),
            near: Some(0.5),
            far: None,
        };
        assert!(edits.apply(&mut camera));

        assert_eq!(camera.field_of_view(), 90.0);
        assert_eq!(camera.near(), 0.5);
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_field_of_view_edit_is_clamped() {
        let mut camera = Camera::new(800, 600, &CameraSettings::default());
        CameraEdits {
            field_of_view: Some(250.0),
            ..Default::default()
        }
        .apply(&mut camera);

        assert_eq!(camera.field_of_view(), MAX_FIELD_OF_VIEW);
    }

    fn untouched_panel(camera: &Camera) -> CameraEdits {
        let ctx = egui::Context::default();
        let mut edits = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            edits = Some(camera_panel(ctx, camera, 60.0));
        });
        edits.expect("panel ran")
    }

    #[test]
    fn test_untouched_panel_makes_no_edits() {
        let camera = Camera::new(800, 600, &CameraSettings::default());
        assert_eq!(untouched_panel(&camera), CameraEdits::default());
    }

    #[test]
    fn test_untouched_panel_keeps_out_of_range_clip_planes() {
        let settings = CameraSettings {
            near: 0.001,
            far: 10000.0,
            ..CameraSettings::default()
        };
        let mut camera = Camera::new(800, 600, &settings);

        let edits = untouched_panel(&camera);
        assert_eq!(edits, CameraEdits::default());

        edits.apply(&mut camera);
        assert_eq!(camera.near(), 0.001);
        assert_eq!(camera.far(), 10000.0);
    }

    #[test]
    fn test_slider_ranges_keep_near_below_far() {
        assert!(NEAR_RANGE.end() < FAR_RANGE.start());
    }
}
