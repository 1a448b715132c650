//! Snowflake parameter types.
//!
//! Contains the flat parameter record the host loop feeds into the shader,
//! plus the colour palette used when shading.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Exclusive upper bound for seeds.
pub const SEED_RANGE: f32 = 1000.0;
/// Smallest branch count.
pub const MIN_COMPLEXITY: f32 = 1.0;
/// Largest branch count (the shader loop is unrolled to this many branches).
pub const MAX_COMPLEXITY: f32 = 10.0;
/// Largest capsule radius for branch lines.
pub const MAX_THICKNESS: f32 = 0.02;
/// Branch count above which sub-branches are added.
pub const SUB_BRANCH_THRESHOLD: f32 = 4.0;

// ============================================================================
// Shape parameters
// ============================================================================

/// Parameters for the procedural snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowflakeParams {
    /// Seed keying the branch hash (0.0 - 1000.0).
    pub seed: f32,
    /// Number of branches per arm (1.0 - 10.0).
    pub complexity: f32,
    /// Line thickness as a fraction of the short viewport side (0.0 - 0.02).
    pub thickness: f32,
    /// Glow intensity (0.0 - 1.0).
    pub glow: f32,
    /// Normalised pointer position, top-left origin (0.0 - 1.0 per axis).
    pub mouse: [f32; 2],
}

impl Default for SnowflakeParams {
    fn default() -> Self {
        Self {
            seed: 0.0,
            complexity: 6.0,
            thickness: 0.004,
            glow: 0.2,
            mouse: [0.5, 0.5],
        }
    }
}

impl SnowflakeParams {
    /// Replace the seed.
    pub fn with_seed(mut self, seed: f32) -> Self {
        self.seed = seed;
        self
    }

    /// Draw a fresh seed uniformly from `[0, SEED_RANGE)`.
    pub fn randomize_seed<R: Rng>(&mut self, rng: &mut R) {
        self.seed = rng.gen_range(0.0..SEED_RANGE);
    }

    /// Force every field into its valid range.
    ///
    /// Seeds wrap around instead of saturating so that stepping past the end
    /// still produces a distinct flake. Non-finite values fall back to the
    /// defaults.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

        let seed = finite_or(self.seed, defaults.seed).rem_euclid(SEED_RANGE);
        Self {
            // rem_euclid can round up to the bound itself for tiny negatives
            seed: if seed >= SEED_RANGE { 0.0 } else { seed },
            complexity: finite_or(self.complexity, defaults.complexity)
                .clamp(MIN_COMPLEXITY, MAX_COMPLEXITY),
            thickness: finite_or(self.thickness, defaults.thickness).clamp(0.0, MAX_THICKNESS),
            glow: finite_or(self.glow, defaults.glow).clamp(0.0, 1.0),
            mouse: [
                finite_or(self.mouse[0], defaults.mouse[0]).clamp(0.0, 1.0),
                finite_or(self.mouse[1], defaults.mouse[1]).clamp(0.0, 1.0),
            ],
        }
    }

    /// Number of branches actually drawn per arm.
    pub fn branch_count(&self) -> usize {
        if self.complexity.is_nan() {
            return 0;
        }
        self.complexity.clamp(0.0, MAX_COMPLEXITY).floor() as usize
    }

    /// Whether branches carry a sub-branch.
    pub fn has_sub_branches(&self) -> bool {
        self.complexity > SUB_BRANCH_THRESHOLD
    }
}

// ============================================================================
// Colours
// ============================================================================

/// Colours used when shading the flake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Colour of the solid silhouette.
    pub base: [f32; 3],
    /// Colour of the halo around the silhouette.
    pub glow: [f32; 3],
    /// Clear colour behind the full-screen pass.
    pub background: [f32; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: [0.85, 0.95, 1.0],
            glow: [0.5, 0.8, 1.0],
            background: [0.02, 0.04, 0.06],
        }
    }
}

/// Parse hex color to RGB floats (accepts 6-char RGB or 8-char RGBA, alpha is ignored).
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
    Some([r, g, b])
}
