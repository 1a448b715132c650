//! GPU rendering using wgpu.
//!
//! Runs the snowflake fragment shader either headless (offscreen target plus
//! CPU readback, for export) or against a window surface (interactive view).

pub mod context;
pub mod layouts;
pub mod pipeline;
pub mod pipelines;
pub mod renderer;
pub mod surface;
pub mod textures;

pub use context::{GpuContext, GpuError};
pub use pipeline::{SnowflakePipeline, SnowflakeUniforms};
pub use renderer::{RenderConfig, SnowflakeRenderer};
pub use surface::SurfaceRenderer;
