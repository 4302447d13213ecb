use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};
use glam::{Mat4, Vec3};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

// Import from the library crate
use umbra::{controller, logging, model, ui, view};

use controller::{CameraController, InputState};
use model::{Camera, Scene};
use view::render;
use view::shadow::{self, ShadowPipeline};
use view::texture;
use view::{CameraUniform, GpuContext, LightUniform};

const DIFFUSE_TEXTURE_PATH: &str = "assets/wood.png";

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    // Rendering state
    pipeline: wgpu::RenderPipeline,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
    scene: Scene,
    shadow: ShadowPipeline,

    // egui
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Simulation state
    camera: Camera,
    input_state: InputState,
    camera_controller: CameraController,
    light_controls: ui::LightControls,
    shadow_far: f32,
    elapsed: f32,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let gpu = GpuContext::new(window.clone()).await;
        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        // Forward depth buffer for the visible pass
        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (depth_texture, depth_view) = render::create_depth_texture(&device, size.width, size.height);

        // Start inside the room, looking down -Z toward the boxes
        let camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0);

        let camera_resources = render::create_camera_resources(&device);
        let camera_buffer = camera_resources.camera_buffer;
        let light_buffer = camera_resources.light_buffer;
        let camera_bgl = camera_resources.bind_group_layout;
        let camera_bind_group = camera_resources.camera_bind_group;

        let scene = Scene::new(&device);
        let shadow = ShadowPipeline::new(
            &device,
            &scene.model_layout,
            shadow::DEFAULT_RESOLUTION,
            shadow::DEFAULT_NEAR,
            shadow::DEFAULT_FAR,
        );

        let diffuse_view = texture::load_diffuse(&device, &queue, Path::new(DIFFUSE_TEXTURE_PATH));
        let material = render::create_material_resources(&device, &diffuse_view, &shadow.cube_view);

        let pipeline = render::create_scene_pipeline(
            &device,
            config.format,
            &camera_bgl,
            &scene.model_layout,
            &material.bind_group_layout,
            depth_format,
        );

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            pipeline,
            depth_texture,
            depth_view,
            camera_buffer,
            light_buffer,
            camera_bind_group,
            material_bind_group: material.bind_group,
            scene,
            shadow,
            egui_renderer,
            egui_state,
            egui_ctx,
            camera,
            input_state: InputState::new(),
            camera_controller: CameraController::new(),
            light_controls: ui::LightControls::default(),
            shadow_far: shadow::DEFAULT_FAR,
            elapsed: 0.0,
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, repeat, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            self.input_state.press(*code);

                            // Toggle shadows on Space (latched against key repeat)
                            if *code == KeyCode::Space && !repeat {
                                self.input_state.request_shadow_toggle();
                            }
                            // Release mouse on Escape
                            if *code == KeyCode::Escape {
                                self.input_state.mouse_locked = false;
                                self.window.set_cursor_visible(true);
                                let _ = self.window.set_cursor_grab(winit::window::CursorGrabMode::None);
                            }
                        }
                        ElementState::Released => {
                            self.input_state.release(*code);
                        }
                    }
                }
                true
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                self.input_state.mouse_locked = true;
                self.window.set_cursor_visible(false);
                let _ = self.window.set_cursor_grab(winit::window::CursorGrabMode::Locked);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.input_state.accumulate_scroll(dy);
                true
            }
            WindowEvent::Focused(false) => {
                self.input_state.clear_keys();
                true
            }
            _ => false,
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.input_state.accumulate_look(dx as f32, dy as f32);
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (depth_texture, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;
        }
    }

    fn update(&mut self, dt: f32) {
        // Update FPS
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        if self.input_state.take_shadow_toggle() {
            self.shadow.settings.enabled = !self.shadow.settings.enabled;
            info!("shadows {}", if self.shadow.settings.enabled { "on" } else { "off" });
        }

        self.camera_controller.update(&mut self.camera, &mut self.input_state, dt);

        // The light orbits through the scene unless parked from the UI
        self.elapsed += dt;
        let light_pos = if self.light_controls.animate {
            Vec3::new(0.0, 0.0, (self.elapsed * 0.5).sin() * 3.0)
        } else {
            Vec3::new(0.0, 0.0, self.light_controls.manual_z)
        };
        self.shadow.move_light(&self.queue, light_pos);
        self.shadow.set_clip_planes(&self.queue, shadow::DEFAULT_NEAR, self.shadow_far);

        // Upload camera and light uniforms
        let aspect = self.config.width as f32 / self.config.height.max(1) as f32;
        let projection =
            Mat4::perspective_rh(self.camera.zoom().to_radians(), aspect, 0.1, 100.0);
        let camera_uniform = CameraUniform {
            view_proj: (projection * self.camera.view_matrix()).to_cols_array_2d(),
            eye: self.camera.position.to_array(),
            _pad: 0.0,
        };
        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));

        let settings = self.shadow.settings;
        let light_uniform = LightUniform {
            position: self.shadow.light_position().to_array(),
            far_plane: self.shadow.far(),
            bias: settings.bias,
            shadows_enabled: if settings.enabled { 1.0 } else { 0.0 },
            lit_ambient: if settings.lit_ambient { 1.0 } else { 0.0 },
            _pad: 0.0,
        };
        self.queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&light_uniform));
    }

    fn render_ui(&mut self) -> (Vec<egui::epaint::ClippedShape>, egui::TexturesDelta) {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let light_pos = self.shadow.light_position();
        let output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_debug_window(ctx, &self.camera, light_pos, self.fps);
            ui::draw_settings_window(
                ctx,
                &mut self.shadow.settings,
                &mut self.light_controls,
                &mut self.shadow_far,
                self.config.width,
            );
        });

        self.egui_state.handle_platform_output(&self.window, output.platform_output);
        (output.shapes, output.textures_delta)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (shapes, textures_delta) = self.render_ui();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let primitives = self.egui_ctx.tessellate(shapes, self.window.scale_factor() as f32);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        // Upload egui textures
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(&self.device, &self.queue, &mut encoder, &primitives, &screen_descriptor);

        // 1. Depth pass: scene depth into the shadow cube map, one pass
        //    per face. Must complete before the lighting pass samples it.
        let scene = &self.scene;
        self.shadow.encode_depth_pass(&mut encoder, |pass| scene.draw(pass));

        // 2. Lighting pass: visible scene with the cube map bound
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lighting_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_bind_group(2, &self.material_bind_group, &[]);
            self.scene.draw(&mut render_pass);
        }

        // Render egui on top
        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        // Cleanup egui textures
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("umbra")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone()));
    info!("initialized, entering event loop");

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            app.update(dt);

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => tracing::error!("surface error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: winit::event::DeviceEvent::MouseMotion { delta }, .. } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    }).unwrap();
}
