//! Headless snowflake renderer.

use super::{
    context::{GpuContext, GpuError},
    pipeline::{SnowflakePipeline, SnowflakeUniforms},
    textures::{ReadbackBuffer, RenderTarget},
};
use crate::params::{Palette, SnowflakeParams};
use wgpu::BindGroup;

/// Configuration for offscreen rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            palette: Palette::default(),
        }
    }
}

/// Headless snowflake renderer.
pub struct SnowflakeRenderer {
    ctx: GpuContext,
    pipeline: SnowflakePipeline,
    bind_group: BindGroup,
    target: RenderTarget,
    readback: ReadbackBuffer,
    config: RenderConfig,
}

impl SnowflakeRenderer {
    /// Create a new renderer with the given configuration.
    pub async fn new(config: RenderConfig) -> Result<Self, GpuError> {
        let ctx = GpuContext::new().await?;
        Self::with_context(ctx, config)
    }

    /// Create a renderer on an existing context.
    ///
    /// Fails with [`GpuError::TextureTooLarge`] when the output does not fit
    /// in a single texture on this device.
    pub fn with_context(ctx: GpuContext, config: RenderConfig) -> Result<Self, GpuError> {
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let width = config.width.max(1);
        let height = config.height.max(1);

        let max = ctx.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(GpuError::TextureTooLarge { width, height, max });
        }

        let pipeline = SnowflakePipeline::new(&ctx.device, format);
        let bind_group = pipeline.create_bind_group(&ctx.device);
        let target = RenderTarget::for_output(&ctx.device, "snowflake_target", width, height, format);
        let readback = ReadbackBuffer::new(&ctx.device, width, height);

        log::debug!("Offscreen renderer ready at {}x{}", width, height);

        Ok(Self {
            ctx,
            pipeline,
            bind_group,
            target,
            readback,
            config: RenderConfig {
                width,
                height,
                ..config
            },
        })
    }

    /// Render one frame at `time` seconds.
    ///
    /// Returns tightly packed RGBA pixel data, top row first.
    pub fn render_frame(&self, params: &SnowflakeParams, time: f32) -> Result<Vec<u8>, GpuError> {
        let resolution = [self.config.width as f32, self.config.height as f32];
        let uniforms = SnowflakeUniforms::new(params, &self.config.palette, resolution, time);
        self.pipeline.write_uniforms(&self.ctx.queue, &uniforms);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        self.pipeline.draw(
            &mut encoder,
            self.target.view(),
            &self.bind_group,
            self.config.palette.background,
        );
        self.readback.copy_from(&mut encoder, &self.target);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        self.readback.read_pixels(&self.ctx.device)
    }

    /// Get the render configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Get GPU adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_renderer_creation() {
        let config = RenderConfig {
            width: 320,
            height: 180,
            ..Default::default()
        };

        let result = SnowflakeRenderer::new(config).await;
        if let Ok(renderer) = result {
            let info = renderer.adapter_info();
            assert!(!info.name.is_empty());
            assert_eq!(renderer.config().width, 320);
        }
    }

    #[tokio::test]
    async fn test_oversized_output_is_an_error() {
        let ctx = match GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return, // Skip if no GPU
        };
        let max = ctx.device.limits().max_texture_dimension_2d;

        let config = RenderConfig {
            width: max + 1,
            height: 8,
            ..Default::default()
        };
        match SnowflakeRenderer::with_context(ctx, config) {
            Err(GpuError::TextureTooLarge { width, height, .. }) => {
                assert_eq!((width, height), (max + 1, 8));
            }
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("oversized target was accepted"),
        }
    }

    #[tokio::test]
    async fn test_render_frame() {
        // Odd size puts a pixel centre exactly on the origin
        let config = RenderConfig {
            width: 321,
            height: 181,
            ..Default::default()
        };

        let result = SnowflakeRenderer::new(config.clone()).await;
        if let Ok(renderer) = result {
            let params = SnowflakeParams::default().with_seed(42.0);
            let pixels = renderer.render_frame(&params, 0.0).expect("readback");

            assert_eq!(pixels.len(), (config.width * config.height * 4) as usize);

            // The stem starts at the centre of the frame
            let center = ((90 * config.width + 160) * 4) as usize;
            assert!(pixels[center + 2] > 200, "centre pixel should be lit");
        }
    }
}
