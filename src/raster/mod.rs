//! CPU rasteriser for the snowflake model.
//!
//! Evaluates [`crate::sdf::shade`] at every pixel centre. Slow compared to
//! the GPU path but needs no adapter, which makes it the reference image for
//! tests and the `--cpu` export backend.

use image::{Rgba, RgbaImage};

use crate::params::{Palette, SnowflakeParams};
use crate::sdf::{self, branch_layout};

/// Render a full image at `time` seconds. Row 0 is the top of the image.
pub fn render_image(
    width: u32,
    height: u32,
    time: f32,
    params: &SnowflakeParams,
    palette: &Palette,
) -> RgbaImage {
    let layout = branch_layout(params);
    let resolution = [width as f32, height as f32];

    RgbaImage::from_fn(width, height, |x, y| {
        // Pixel centre, flipped to the shader's bottom-left origin
        let frag = [x as f32 + 0.5, height as f32 - (y as f32 + 0.5)];
        let color = sdf::shade_with_layout(frag, resolution, time, params, palette, &layout);
        Rgba([to_byte(color[0]), to_byte(color[1]), to_byte(color[2]), 255])
    })
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_dimensions() {
        let img = render_image(64, 48, 0.0, &SnowflakeParams::default(), &Palette::default());
        assert_eq!(img.dimensions(), (64, 48));
    }

    #[test]
    fn test_to_byte_rounds_and_clamps() {
        assert_eq!(to_byte(-0.1), 0);
        assert_eq!(to_byte(1.5), 255);
        assert_eq!(to_byte(0.5), 128);
    }

    #[test]
    fn test_image_mirrors_across_horizontal_axis() {
        // Odd height puts the axis on a pixel row; rotation is zero at rest
        let params = SnowflakeParams::default().with_seed(3.0);
        let img = render_image(81, 81, 0.0, &params, &Palette::default());
        for y in 0..81 {
            for x in 0..81 {
                let a = img.get_pixel(x, y);
                let b = img.get_pixel(x, 80 - y);
                for channel in 0..3 {
                    assert!((a[channel] as i32 - b[channel] as i32).abs() <= 2);
                }
            }
        }
    }
}
