use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glyphfield_animation::BlendChannel;
use glyphfield_atlas::{AtlasImage, AtlasRasterizer, FontDescriptor, GlyphAtlasRasterizer};
use glyphfield_field::{AnimatedCharacterField, FieldConfig};
use glyphfield_render_wgpu::{ViewCamera, WgpuFieldRenderer};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "glyphfield-desktop", about = "Animated character field viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// TrueType/OpenType font used to rasterize the glyph atlas
    #[arg(long)]
    font: PathBuf,

    /// JSON field configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state independent of the GPU.
struct AppState {
    field: AnimatedCharacterField,
    /// Rasterized atlas waiting for the GPU to come up.
    pending_atlas: Option<AtlasImage>,
    camera: ViewCamera,
    show_panel: bool,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    last_frame: Instant,
}

impl AppState {
    fn new(field: AnimatedCharacterField, atlas: AtlasImage) -> Self {
        Self {
            field,
            pending_atlas: Some(atlas),
            camera: ViewCamera::default(),
            show_panel: true,
            dragging: false,
            last_cursor: None,
            last_frame: Instant::now(),
        }
    }

    fn update(&mut self, dt: f32) {
        if let Err(e) = self.field.update(dt) {
            tracing::warn!("field update skipped: {e}");
        }
    }

    fn activate(&mut self, channel: BlendChannel) {
        if let Err(e) = self.field.activate_animation(channel.number()) {
            tracing::error!("activation failed: {e}");
            return;
        }
        tracing::info!("blending to {channel}");
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Digit1 | KeyCode::Numpad1 => self.activate(BlendChannel::One),
            KeyCode::Digit2 | KeyCode::Numpad2 => self.activate(BlendChannel::Two),
            KeyCode::Digit3 | KeyCode::Numpad3 => self.activate(BlendChannel::Three),
            KeyCode::F1 => self.show_panel = !self.show_panel,
            KeyCode::KeyR => {
                self.camera = ViewCamera {
                    aspect: self.camera.aspect,
                    ..ViewCamera::default()
                }
            }
            _ => {}
        }
    }

    fn handle_cursor(&mut self, x: f64, y: f64) {
        if let (true, Some((lx, ly))) = (self.dragging, self.last_cursor) {
            self.camera.orbit((x - lx) as f32, (y - ly) as f32);
        }
        self.last_cursor = Some((x, y));
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::Window::new("Animations")
            .default_pos([16.0, 16.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for channel in [BlendChannel::One, BlendChannel::Two, BlendChannel::Three] {
                        let label = format!("Animation {}", channel.number());
                        let active = self.field.blend().target() == Some(channel);
                        if ui.selectable_label(active, label).clicked() {
                            self.activate(channel);
                        }
                    }
                });
                ui.separator();

                for (i, w) in self.field.weights().into_iter().enumerate() {
                    ui.add(
                        egui::ProgressBar::new(w)
                            .desired_width(220.0)
                            .text(format!("weight{} {w:.3}", i + 1)),
                    );
                }

                ui.separator();
                ui.label(format!(
                    "Cells: {}  Time: {:.3}",
                    self.field.num_cells(),
                    self.field.time()
                ));
                if let Some(progress) = self.field.blend().progress() {
                    ui.label(format!("Transition: {:.0}%", progress * 100.0));
                }
                ui.small(
                    "1/2/3: Animations | LMB drag: Orbit | Wheel: Zoom | R: Reset | F1: Panel",
                );
            });
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuFieldRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Glyph Field")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glyphfield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        self.state.camera.set_viewport(config.width, config.height);

        let mut renderer =
            WgpuFieldRenderer::new(&device, surface_format, config.width, config.height);

        if let Some(atlas) = self.state.pending_atlas.take() {
            let handle =
                renderer.upload_atlas(&device, &queue, atlas.width, atlas.height, &atlas.pixels);
            self.state
                .field
                .bind_atlas(handle, atlas.layout)
                .context("bind atlas")?;
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.gpu = Some(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.camera,
            &self.state.field,
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("GPU initialization failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                    self.state
                        .camera
                        .set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_cursor(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

/// Load the font and rasterize the atlas, then build the field. The field
/// is never constructed before the font is available.
fn prepare(cli: &Cli) -> Result<AppState> {
    let config = match &cli.config {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => FieldConfig::default(),
    };

    let rasterizer = GlyphAtlasRasterizer::from_file(&cli.font)
        .with_context(|| format!("loading font {}", cli.font.display()))?;
    let font = FontDescriptor {
        family: config.font_family.clone(),
        cell_pixel_size: config.cell_pixel_size,
        columns: config.grid_columns,
        ..FontDescriptor::default()
    };
    let atlas = rasterizer
        .rasterize(&config.glyphs, &font)
        .context("rasterizing glyph atlas")?;

    let field = AnimatedCharacterField::from_config(&config, atlas.layout)?;
    tracing::info!(
        cells = field.num_cells(),
        glyphs = atlas.layout.used_length,
        "field ready"
    );
    Ok(AppState::new(field, atlas))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("glyphfield-desktop starting");
    let state = prepare(&cli)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
