use anyhow::{Context, Result};
use clap::Parser;
use cubefall_common::DemoConfig;
use cubefall_input::{Action, ActionState};
use cubefall_kernel::{DrawList, Scene};
use cubefall_physics::{RapierOracle, rapier_scene};
use cubefall_render_wgpu::{FlyCamera, WgpuRenderer};
use cubefall_tools::{FpsCounter, SceneInspector};
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Longest frame time fed to the camera and accumulator.
const MAX_FRAME_TIME: f32 = 0.25;

#[derive(Parser)]
#[command(name = "cubefall-desktop", about = "Falling crates and sphere projectiles")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn action_for(key: KeyCode, ctrl: bool) -> Option<Action> {
    Some(match key {
        KeyCode::KeyX if ctrl => Action::Quit,
        KeyCode::KeyW => Action::MoveForward,
        KeyCode::KeyS => Action::MoveBackward,
        KeyCode::KeyA => Action::MoveLeft,
        KeyCode::KeyD => Action::MoveRight,
        KeyCode::KeyE => Action::MoveUp,
        KeyCode::KeyQ => Action::MoveDown,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Action::Sprint,
        KeyCode::Space => Action::Spawn,
        KeyCode::KeyP => Action::Step,
        _ => return None,
    })
}

/// Application state.
struct AppState {
    config: DemoConfig,
    scene: Scene<RapierOracle>,
    camera: FlyCamera,
    actions: ActionState,
    draws: DrawList,
    fps: FpsCounter,
    ctrl_held: bool,
    mouse_captured: bool,
    show_overlay: bool,
    quit_requested: bool,
    evicted_total: u64,
    last_frame: Instant,
}

impl AppState {
    fn new(config: DemoConfig) -> Result<Self> {
        let camera = FlyCamera::from_config(&config.window);
        let scene = rapier_scene(&config, camera.position).context("failed to build scene")?;
        Ok(Self {
            config,
            scene,
            camera,
            actions: ActionState::new(),
            draws: DrawList::default(),
            fps: FpsCounter::new(),
            ctrl_held: false,
            mouse_captured: false,
            show_overlay: true,
            quit_requested: false,
            evicted_total: 0,
            last_frame: Instant::now(),
        })
    }

    /// Camera update, then one pass of the frame loop. Returns a new window
    /// title when the frame counter rolls over.
    fn update(&mut self) -> Result<Option<String>> {
        let now = Instant::now();
        let elapsed = now - self.last_frame;
        self.last_frame = now;
        let dt = elapsed.as_secs_f32().min(MAX_FRAME_TIME);

        let input = self.actions.snapshot();
        self.camera.apply_input(&input, dt);
        let frame = self
            .scene
            .frame(dt as f64, &input, &self.camera.viewer())
            .context("frame loop failed")?;
        self.evicted_total += frame.evicted.len() as u64;
        self.draws = frame.draws;
        // The overlay reads the summary; the event log is not kept.
        self.scene.drain_events();

        Ok(self
            .fps
            .frame(elapsed)
            .map(|fps| FpsCounter::title(&self.config.window.title, fps)))
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed && key == KeyCode::F1 {
            self.show_overlay = !self.show_overlay;
            return;
        }
        match action_for(key, self.ctrl_held) {
            Some(Action::Quit) if pressed => {
                tracing::info!("quit requested");
                self.quit_requested = true;
            }
            Some(action) => {
                self.actions.set(action, pressed);
            }
            None => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);

        egui::Window::new("cubefall")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "FPS: {}",
                    self.fps.last().map_or("-".to_string(), |f| f.to_string())
                ));
                ui.label(format!("Tick: {}  Frames: {}", summary.tick, summary.frames));
                ui.label(format!(
                    "Crates: {}  Projectiles: {}",
                    summary.crates, summary.projectiles
                ));
                ui.label(format!(
                    "Actors: {}  Evicted: {}",
                    summary.actors, self.evicted_total
                ));
                ui.label(format!("Contacts: {}", summary.contacts));
                ui.label(format!("Step: {:?}", self.scene.clock().activation()));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    self.camera.position.x, self.camera.position.y, self.camera.position.z
                ));
                ui.separator();
                ui.small("WASD/QE: Move | Shift: Sprint | Space: Fire | P: Step");
                ui.small("RMB: Look | F1: Overlay | Ctrl+X: Quit");
            });
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window_config = &self.state.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubefall_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &self.state.config.assets,
        )
        .context("failed to load textures")?;

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

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) -> Result<()> {
        if let Some(title) = self.state.update()? {
            if let Some(gpu) = &self.gpu {
                gpu.window.set_title(&title);
            }
        }

        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout; skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire surface texture"),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut render_view = self.state.camera.render_view();
        render_view.aspect = gpu.config.width as f32 / gpu.config.height.max(1) as f32;
        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.draws,
            &render_view,
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
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                self.state.camera.aspect =
                    gpu.config.width as f32 / gpu.config.height.max(1) as f32;
                self.gpu = Some(gpu);
                // Do not count GPU setup as simulated time.
                self.state.last_frame = Instant::now();
            }
            Err(err) => self.fail(event_loop, err),
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
                    self.state.camera.aspect =
                        gpu.config.width as f32 / gpu.config.height as f32;
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.actions.clear();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.state.ctrl_held = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
                if self.state.quit_requested {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(gpu) = &self.gpu {
                    gpu.window.set_cursor_visible(!self.state.mouse_captured);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU resources go first, then the simulation.
        self.gpu = None;
        if let Err(err) = self.state.scene.shutdown() {
            tracing::error!("shutdown failed: {err}");
            self.error.get_or_insert(err.into());
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("cubefall-desktop starting");

    let config = DemoConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    let state = AppState::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
