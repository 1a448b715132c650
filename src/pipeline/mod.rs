//! Still and image-sequence export.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::gpu::{GpuError, RenderConfig, SnowflakeRenderer};
use crate::params::{Palette, SnowflakeParams};
use crate::raster;

/// Which renderer produces the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// wgpu offscreen render with readback.
    #[default]
    Gpu,
    /// Per-pixel evaluation of the CPU model.
    Cpu,
}

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    /// Elapsed seconds for the first (or only) frame.
    pub time: f32,
    pub params: SnowflakeParams,
    pub palette: Palette,
    pub backend: Backend,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            time: 0.0,
            params: SnowflakeParams::default(),
            palette: Palette::default(),
            backend: Backend::Gpu,
        }
    }
}

impl ExportConfig {
    pub fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            palette: self.palette,
        }
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidDimensions(self.width, self.height));
        }
        Ok(())
    }
}

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f32),
}

/// Produces frames for one export run.
enum FrameSource {
    Gpu(SnowflakeRenderer),
    Cpu,
}

impl FrameSource {
    async fn new(config: &ExportConfig) -> Result<Self, PipelineError> {
        match config.backend {
            Backend::Gpu => {
                let renderer = SnowflakeRenderer::new(config.to_render_config()).await?;
                let info = renderer.adapter_info();
                log::info!("Exporting on {} ({:?})", info.name, info.backend);
                Ok(Self::Gpu(renderer))
            }
            Backend::Cpu => {
                log::info!("Exporting with the CPU rasteriser");
                Ok(Self::Cpu)
            }
        }
    }

    fn frame(
        &self,
        config: &ExportConfig,
        params: &SnowflakeParams,
        time: f32,
    ) -> Result<RgbaImage, PipelineError> {
        match self {
            Self::Gpu(renderer) => {
                let pixels = renderer.render_frame(params, time)?;
                RgbaImage::from_raw(config.width, config.height, pixels)
                    .ok_or(PipelineError::InvalidDimensions(config.width, config.height))
            }
            Self::Cpu => Ok(raster::render_image(
                config.width,
                config.height,
                time,
                params,
                &config.palette,
            )),
        }
    }
}

/// Render one frame at `config.time` to a PNG file.
pub async fn render_still<P: AsRef<Path>>(
    output_path: P,
    config: &ExportConfig,
) -> Result<(), PipelineError> {
    config.validate()?;
    let params = config.params.clamped();

    let source = FrameSource::new(config).await?;
    let image = source.frame(config, &params, config.time)?;

    let path = output_path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image.save(path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// File name of frame `index` inside a sequence directory.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:05}.png", index)
}

/// Render `frames` PNGs into `output_dir`, advancing time by `1 / fps`.
///
/// Returns the written paths in frame order. `progress` receives the
/// completed fraction after every frame.
pub async fn render_sequence<P: AsRef<Path>>(
    output_dir: P,
    config: &ExportConfig,
    frames: usize,
    fps: f32,
    progress_callback: Option<Box<dyn Fn(f32) + Send>>,
) -> Result<Vec<PathBuf>, PipelineError> {
    config.validate()?;
    if !fps.is_finite() || fps <= 0.0 {
        return Err(PipelineError::InvalidFrameRate(fps));
    }
    let params = config.params.clamped();

    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let source = FrameSource::new(config).await?;
    let mut written = Vec::with_capacity(frames);

    for frame_idx in 0..frames {
        let time = config.time + frame_idx as f32 / fps;
        let image = source.frame(config, &params, time)?;

        let path = dir.join(frame_file_name(frame_idx));
        image.save(&path)?;
        log::debug!("Wrote {} (t = {:.3}s)", path.display(), time);
        written.push(path);

        if let Some(ref callback) = progress_callback {
            callback((frame_idx + 1) as f32 / frames as f32);
        }
    }

    log::info!("Wrote {} frames to {}", written.len(), dir.display());
    Ok(written)
}
