//! Signed-distance model of the snowflake.
//!
//! CPU mirror of the math in `gpu/shaders/snowflake.wgsl`:
//! - Polar folding into 12 wedges (6-fold symmetry plus reflection)
//! - Capsule distance to the stem and each branch
//! - Seeded hash for branch placement
//!
//! Everything here is closed-form and stateless, so the same inputs always
//! give the same silhouette.

mod shading;

pub use shading::{normalized_uv, rotate, shade, smoothstep, view_rotation};
pub(crate) use shading::shade_with_layout;

use std::f32::consts::PI;

use crate::params::{SnowflakeParams, MAX_COMPLEXITY};

/// Angular width of one arm.
const ARM_ANGLE: f32 = PI / 3.0;
/// End of the main stem along the folded x axis.
pub const STEM_LENGTH: f32 = 0.4;

/// A stroke of the flake, stored in folded space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: [f32; 2],
    pub end: [f32; 2],
    /// Capsule radius added around the centre line.
    pub radius: f32,
}

impl Segment {
    /// Distance from `p` to the capsule around this segment.
    #[inline]
    pub fn distance(&self, p: [f32; 2]) -> f32 {
        capsule_distance(p, self.start, self.end, self.radius)
    }
}

/// Fold a point into the first half-wedge `[0, π/6]`.
///
/// Rotating the input by any multiple of 60° or mirroring it across the x
/// axis leaves the result unchanged; the radius is preserved.
pub fn fold_hexagonal(p: [f32; 2]) -> [f32; 2] {
    let r = length(p);
    let a = p[1].atan2(p[0]) + ARM_ANGLE * 0.5;
    let a = (a.rem_euclid(ARM_ANGLE) - ARM_ANGLE * 0.5).abs();
    [a.cos() * r, a.sin() * r]
}

/// Unsigned distance from `p` to the segment `a`-`b`.
pub fn segment_distance(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let pa = sub(p, a);
    let ba = sub(b, a);
    let len_sq = dot(ba, ba);
    if len_sq <= f32::EPSILON {
        return length(pa);
    }
    let h = (dot(pa, ba) / len_sq).clamp(0.0, 1.0);
    length(sub(pa, scale(ba, h)))
}

/// Distance to a capsule of the given radius around `a`-`b`.
#[inline]
pub fn capsule_distance(p: [f32; 2], a: [f32; 2], b: [f32; 2], radius: f32) -> f32 {
    segment_distance(p, a, b) - radius
}

/// Classic `fract(sin(n) * 43758.5453)` hash; always in `[0, 1)`.
#[inline]
pub fn hash(n: f32) -> f32 {
    let v = n.sin() * 43758.545_312_3;
    let f = v - v.floor();
    // fract of values just below an integer can round to 1.0 in f32
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Build the strokes of one folded arm.
///
/// The stem comes first as a bare centre line, then one branch per unit of
/// complexity (at most ten). Above a complexity of four every branch also spawns a sub-branch
/// from its midpoint.
pub fn branch_layout(params: &SnowflakeParams) -> Vec<Segment> {
    let thickness = params.thickness;
    let count = params.branch_count();
    let with_subs = params.has_sub_branches();

    let mut segments = Vec::with_capacity(1 + count * if with_subs { 2 } else { 1 });
    segments.push(Segment {
        start: [0.0, 0.0],
        end: [STEM_LENGTH, 0.0],
        radius: 0.0,
    });

    for i in 1..=count.min(MAX_COMPLEXITY as usize) {
        let i = i as f32;
        let h2 = hash(params.seed * i + 0.5);
        let h3 = hash(params.seed - i * 2.0);

        let pos = 0.05 + i * 0.035;
        let len = 0.05 + h2 * 0.12;
        let ang = ARM_ANGLE * (0.4 + h3 * 0.4);

        let start = [pos, 0.0];
        let end = [start[0] + ang.cos() * len, ang.sin() * len];
        segments.push(Segment {
            start,
            end,
            radius: thickness * (1.0 - pos * 2.0),
        });

        if with_subs {
            let sub_start = [(start[0] + end[0]) * 0.5, (start[1] + end[1]) * 0.5];
            let sub_ang = ang + 0.5;
            let sub_end = [
                sub_start[0] + sub_ang.cos() * len * 0.5,
                sub_start[1] + sub_ang.sin() * len * 0.5,
            ];
            segments.push(Segment {
                start: sub_start,
                end: sub_end,
                radius: thickness * 0.5,
            });
        }
    }

    segments
}

/// Distance from a folded point to the nearest stroke.
pub fn snowflake_distance(p: [f32; 2], layout: &[Segment]) -> f32 {
    layout
        .iter()
        .map(|segment| segment.distance(p))
        .fold(1e10, f32::min)
}

#[inline]
pub(crate) fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub(crate) fn scale(a: [f32; 2], s: f32) -> [f32; 2] {
    [a[0] * s, a[1] * s]
}

#[inline]
pub(crate) fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub(crate) fn length(a: [f32; 2]) -> f32 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_fold_preserves_radius() {
        for &p in &[[0.3, 0.1], [-0.2, 0.7], [0.0, -0.5], [-0.4, -0.4]] {
            let folded = fold_hexagonal(p);
            assert!(approx(length(folded), length(p)));
        }
    }

    #[test]
    fn test_fold_lands_in_first_half_wedge() {
        for step in 0..360 {
            let angle = (step as f32).to_radians();
            let folded = fold_hexagonal([angle.cos() * 0.5, angle.sin() * 0.5]);
            let folded_angle = folded[1].atan2(folded[0]);
            assert!(folded_angle >= -1e-4 && folded_angle <= PI / 6.0 + 1e-4);
        }
    }

    #[test]
    fn test_segment_distance_cases() {
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];
        assert!(approx(segment_distance([0.5, 0.3], a, b), 0.3));
        assert!(approx(segment_distance([-0.3, 0.4], a, b), 0.5));
        assert!(approx(segment_distance([1.3, -0.4], a, b), 0.5));
        assert!(approx(segment_distance([0.3, 0.4], a, a), 0.5));
    }

    #[test]
    fn test_capsule_is_negative_inside() {
        let d = capsule_distance([0.5, 0.01], [0.0, 0.0], [1.0, 0.0], 0.02);
        assert!(d < 0.0);
    }

    #[test]
    fn test_hash_range() {
        for i in 0..1000 {
            let h = hash(i as f32 * 13.37 - 500.0);
            assert!((0.0..1.0).contains(&h));
        }
    }

    #[test]
    fn test_layout_counts() {
        let mut params = SnowflakeParams::default();
        params.complexity = 3.0;
        assert_eq!(branch_layout(&params).len(), 1 + 3);

        params.complexity = 6.0;
        assert_eq!(branch_layout(&params).len(), 1 + 6 * 2);

        params.complexity = 10.0;
        assert_eq!(branch_layout(&params).len(), 1 + 10 * 2);
    }

    #[test]
    fn test_stem_is_first() {
        let layout = branch_layout(&SnowflakeParams::default());
        assert_eq!(layout[0].start, [0.0, 0.0]);
        assert_eq!(layout[0].end, [STEM_LENGTH, 0.0]);
        assert_eq!(layout[0].radius, 0.0);
    }

    #[test]
    fn test_stem_width_ignores_thickness() {
        let params = SnowflakeParams {
            thickness: crate::params::MAX_THICKNESS,
            complexity: 3.0,
            ..Default::default()
        };
        let layout = branch_layout(&params);
        // Beside the stem tip, past the last branch base: outside the silhouette
        let d = snowflake_distance([0.38, 0.015], &layout[..1]);
        assert!((d - 0.015).abs() < 1e-6);
        assert!(snowflake_distance([0.395, 0.015], &layout) > 0.0);
    }

    #[test]
    fn test_distance_zero_on_stem() {
        let params = SnowflakeParams::default();
        let layout = branch_layout(&params);
        let d = snowflake_distance([0.2, 0.0], &layout);
        assert!(d <= 0.0);
    }
}
