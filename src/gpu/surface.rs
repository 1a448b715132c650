//! On-screen renderer presenting to a window surface.

use std::sync::Arc;

use wgpu::{BindGroup, Surface, SurfaceConfiguration, TextureFormat};
use winit::window::Window;

use super::{
    context::{GpuContext, GpuError},
    pipeline::{SnowflakePipeline, SnowflakeUniforms},
};
use crate::params::{Palette, SnowflakeParams};

/// Renderer bound to a window surface.
pub struct SurfaceRenderer {
    ctx: GpuContext,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    pipeline: SnowflakePipeline,
    bind_group: BindGroup,
    palette: Palette,
}

impl SurfaceRenderer {
    /// Create the surface, device and pipeline for `window`.
    ///
    /// Fails with [`GpuError::NoAdapter`] when no adapter can drive the
    /// window; this is the startup capability check.
    pub async fn new(window: Arc<Window>, palette: Palette) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let instance = GpuContext::create_instance();
        let surface = instance.create_surface(window)?;
        let ctx = GpuContext::with_surface(instance, &surface).await?;

        let caps = surface.get_capabilities(&ctx.adapter);
        let format = pick_format(&caps.formats).ok_or(GpuError::UnsupportedSurface)?;
        let present_mode = if caps.present_modes.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            caps.present_modes
                .first()
                .copied()
                .ok_or(GpuError::UnsupportedSurface)?
        };
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            present_mode
        );

        let pipeline = SnowflakePipeline::new(&ctx.device, format);
        let bind_group = pipeline.create_bind_group(&ctx.device);

        Ok(Self {
            ctx,
            surface,
            config,
            pipeline,
            bind_group,
            palette,
        })
    }

    /// Resize the swap chain. Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let max = self.ctx.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            log::warn!(
                "Requested surface size {}x{} exceeds GPU limit {}; keeping {}x{}",
                width,
                height,
                max,
                self.config.width,
                self.config.height
            );
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.ctx.device, &self.config);
    }

    /// Reconfigure with the current size, after a lost or outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.ctx.device, &self.config);
    }

    /// Push parameters and draw one frame to the window.
    pub fn render(&mut self, params: &SnowflakeParams, time: f32) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let resolution = [self.config.width as f32, self.config.height as f32];
        let uniforms = SnowflakeUniforms::new(params, &self.palette, resolution, time);
        self.pipeline.write_uniforms(&self.ctx.queue, &uniforms);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("surface_encoder"),
            });
        self.pipeline
            .draw(&mut encoder, &view, &self.bind_group, self.palette.background);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Get GPU adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }
}

/// Prefer a non-sRGB format so shader output is written without gamma
/// conversion, as a WebGL canvas does.
fn pick_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}
