//! Shared fixtures for integration tests.

#![allow(dead_code)]

use snowflake::{GpuContext, Palette, RenderConfig, SnowflakeParams, SnowflakeRenderer};

/// Parameters with a small seed so GPU and CPU `sin` agree closely.
pub fn test_params() -> SnowflakeParams {
    SnowflakeParams {
        seed: 0.37,
        complexity: 6.0,
        thickness: 0.006,
        glow: 0.4,
        mouse: [0.5, 0.5],
    }
}

/// Small offscreen configuration.
pub fn small_config() -> RenderConfig {
    RenderConfig {
        width: 96,
        height: 64,
        palette: Palette::default(),
    }
}

/// Offscreen renderer, or `None` when the machine has no usable adapter.
pub async fn create_renderer(config: RenderConfig) -> Option<SnowflakeRenderer> {
    match GpuContext::new().await {
        Ok(ctx) => Some(SnowflakeRenderer::with_context(ctx, config).unwrap()),
        Err(err) => {
            eprintln!("Skipping GPU test: {}", err);
            None
        }
    }
}

/// Mean absolute per-channel difference between two RGBA buffers (alpha ignored).
pub fn mean_rgb_difference(a: &[u8], b: &[u8]) -> f32 {
    assert_eq!(a.len(), b.len());
    let mut total = 0u64;
    let mut count = 0u64;
    for (pa, pb) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
        for channel in 0..3 {
            total += (pa[channel] as i32 - pb[channel] as i32).unsigned_abs() as u64;
            count += 1;
        }
    }
    total as f32 / count.max(1) as f32
}
