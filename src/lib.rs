//! Procedural Snowflake
//!
//! Real-time snowflake generated per pixel from a signed-distance model.
//!
//! # Features
//!
//! - Hexagonal polar folding with seeded, hash-driven branch placement
//! - GPU rendering via wgpu (Metal on macOS, Vulkan on Linux)
//! - Interactive window via winit, driven by keyboard and pointer
//! - Headless PNG still and frame-sequence export (GPU or CPU)

pub mod config;
pub mod gpu;
pub mod host;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod sdf;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, WindowConfig};
pub use gpu::{GpuContext, GpuError, RenderConfig, SnowflakeRenderer, SurfaceRenderer};
pub use host::{HostConfig, HostError, ParameterState};
pub use params::{parse_hex_color, Palette, SnowflakeParams};
pub use pipeline::{render_sequence, render_still, Backend, ExportConfig, PipelineError};
pub use raster::render_image;
