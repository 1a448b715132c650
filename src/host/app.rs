//! Interactive window loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use super::state::{control_for_key, ParameterState};
use crate::config::WindowConfig;
use crate::gpu::{GpuError, SurfaceRenderer};
use crate::params::{Palette, SnowflakeParams};

/// How often the frame rate is logged.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Errors that end the interactive loop.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Everything the host loop needs at startup.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub window: WindowConfig,
    pub params: SnowflakeParams,
    pub palette: Palette,
    /// Keep the given seed instead of drawing one at startup.
    pub keep_seed: bool,
}

/// Window, renderer and parameter state driven by winit.
pub struct SnowflakeApp {
    config: HostConfig,
    state: ParameterState,
    rng: StdRng,
    window: Option<Arc<Window>>,
    renderer: Option<SurfaceRenderer>,
    started: Instant,
    frames: u32,
    last_fps_log: Instant,
    error: Option<HostError>,
}

impl SnowflakeApp {
    pub fn new(config: HostConfig) -> Self {
        let mut rng = StdRng::from_entropy();
        let mut params = config.params;
        if !config.keep_seed {
            params.randomize_seed(&mut rng);
        }

        Self {
            state: ParameterState::new(params),
            config,
            rng,
            window: None,
            renderer: None,
            started: Instant::now(),
            frames: 0,
            last_fps_log: Instant::now(),
            error: None,
        }
    }

    /// Parameters currently shown.
    pub fn params(&self) -> &SnowflakeParams {
        self.state.params()
    }

    /// Take the error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<HostError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: HostError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn refresh_title(&mut self) {
        if !self.state.take_dirty() {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&format!("{} | {}", self.config.window.title, self.state.summary()));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let time = self.started.elapsed().as_secs_f32();
        match renderer.render(self.state.params(), time) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timed out; skipping frame"),
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        }

        self.frames += 1;
        let since = self.last_fps_log.elapsed();
        if since >= FPS_LOG_INTERVAL {
            log::debug!("{:.1} fps", self.frames as f32 / since.as_secs_f32());
            self.frames = 0;
            self.last_fps_log = Instant::now();
        }

        self.refresh_title();
    }
}

impl ApplicationHandler for SnowflakeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width.max(1),
                self.config.window.height.max(1),
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let renderer = match pollster::block_on(SurfaceRenderer::new(
            window.clone(),
            self.config.palette,
        )) {
            Ok(renderer) => renderer,
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let info = renderer.adapter_info();
        log::info!("Rendering on {} ({:?})", info.name, info.backend);
        log::info!("Keys: up/down complexity, left/right thickness, [ ] glow, r or click new seed, 0 reset");

        self.window = Some(window.clone());
        self.renderer = Some(renderer);
        self.started = Instant::now();
        self.last_fps_log = Instant::now();
        self.refresh_title();
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.state
                        .set_pointer(position.x, position.y, size.width, size.height);
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.state.randomize(&mut self.rng),

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    event_loop.exit();
                } else if let Some(control) = control_for_key(&event.logical_key) {
                    self.state.apply(control, &mut self.rng);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // FIFO presentation paces the loop to the display refresh
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: HostConfig) -> Result<SnowflakeParams, HostError> {
    let event_loop = EventLoop::new()?;
    let mut app = SnowflakeApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(*app.params()),
    }
}
