//! Per-pixel colouring.

use super::{branch_layout, fold_hexagonal, length, snowflake_distance};
use crate::params::{Palette, SnowflakeParams};

/// Half-width of the anti-aliased edge of the silhouette.
const EDGE_WIDTH: f32 = 0.002;
/// Radians per second of idle spin.
const SPIN_RATE: f32 = 0.05;

/// Hermite interpolation between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map a fragment coordinate (bottom-left origin, pixels) to centred
/// coordinates where the short side of the viewport spans one unit.
pub fn normalized_uv(frag: [f32; 2], resolution: [f32; 2]) -> [f32; 2] {
    let short = resolution[0].min(resolution[1]).max(1.0);
    [
        (frag[0] - 0.5 * resolution[0]) / short,
        (frag[1] - 0.5 * resolution[1]) / short,
    ]
}

/// Rotation of the whole flake: a slow spin plus a pointer-driven offset.
#[inline]
pub fn view_rotation(time: f32, mouse_x: f32) -> f32 {
    time * SPIN_RATE + (mouse_x - 0.5) * 2.0
}

/// Apply the shader's `uv * mat2(c, -s, s, c)` rotation.
#[inline]
pub fn rotate(p: [f32; 2], angle: f32) -> [f32; 2] {
    let (s, c) = angle.sin_cos();
    [p[0] * c - p[1] * s, p[0] * s + p[1] * c]
}

/// Colour of one fragment, each channel in `[0, 1]`.
pub fn shade(
    frag: [f32; 2],
    resolution: [f32; 2],
    time: f32,
    params: &SnowflakeParams,
    palette: &Palette,
) -> [f32; 3] {
    let layout = branch_layout(params);
    shade_with_layout(frag, resolution, time, params, palette, &layout)
}

/// Same as [`shade`] but reuses a precomputed layout; rasterisers call this
/// once per pixel.
pub(crate) fn shade_with_layout(
    frag: [f32; 2],
    resolution: [f32; 2],
    time: f32,
    params: &SnowflakeParams,
    palette: &Palette,
    layout: &[super::Segment],
) -> [f32; 3] {
    let uv = rotate(
        normalized_uv(frag, resolution),
        view_rotation(time, params.mouse[0]),
    );
    let d = snowflake_distance(fold_hexagonal(uv), layout);

    let mask = 1.0 - smoothstep(0.0, EDGE_WIDTH, d);
    let glow = (-d * (15.0 + (1.0 - params.glow) * 80.0)).exp();
    let vignette = 1.0 - length(uv) * 0.8;

    let mut color = [0.0; 3];
    for (channel, out) in color.iter_mut().enumerate() {
        let value = mask * palette.base[channel] + glow * params.glow * palette.glow[channel];
        *out = (value * vignette).clamp(0.0, 1.0);
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uv_centre_is_origin() {
        let uv = normalized_uv([320.0, 240.0], [640.0, 480.0]);
        assert_eq!(uv, [0.0, 0.0]);
        let uv = normalized_uv([640.0, 240.0], [640.0, 480.0]);
        assert!((uv[0] - 320.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_is_neutral_at_rest() {
        assert_eq!(view_rotation(0.0, 0.5), 0.0);
        assert!((view_rotation(10.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((view_rotation(0.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_centre_pixel_is_lit() {
        let params = SnowflakeParams::default();
        let color = shade([320.0, 240.0], [640.0, 480.0], 0.0, &params, &Palette::default());
        assert!(color[0] > 0.8 && color[2] > 0.9);
    }

    #[test]
    fn test_corner_pixel_is_dark() {
        let params = SnowflakeParams::default();
        let color = shade([0.5, 0.5], [640.0, 480.0], 0.0, &params, &Palette::default());
        assert!(color.iter().all(|&c| c < 0.05));
    }
}
