//! UI-driven parameter state.
//!
//! Input handlers mutate this record and the frame loop reads it; both run on
//! the event-loop thread, so it needs no synchronisation.

use rand::Rng;
use winit::keyboard::{Key, NamedKey};

use crate::params::SnowflakeParams;

/// Complexity change per key press.
pub const COMPLEXITY_STEP: f32 = 1.0;
/// Thickness change per key press.
pub const THICKNESS_STEP: f32 = 0.001;
/// Glow change per key press.
pub const GLOW_STEP: f32 = 0.05;

/// A discrete user adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ComplexityUp,
    ComplexityDown,
    ThicknessUp,
    ThicknessDown,
    GlowUp,
    GlowDown,
    /// Draw a new seed.
    Randomize,
    /// Restore the startup parameters with a new seed.
    Reset,
}

/// Map a key to the control it triggers.
///
/// | key | control |
/// |-----|---------|
/// | Up / Down | complexity |
/// | Right / Left | thickness |
/// | `]` / `[` | glow |
/// | `r`, Space | new seed |
/// | `0` | reset |
pub fn control_for_key(key: &Key) -> Option<Control> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(Control::ComplexityUp),
        Key::Named(NamedKey::ArrowDown) => Some(Control::ComplexityDown),
        Key::Named(NamedKey::ArrowRight) => Some(Control::ThicknessUp),
        Key::Named(NamedKey::ArrowLeft) => Some(Control::ThicknessDown),
        Key::Named(NamedKey::Space) => Some(Control::Randomize),
        Key::Character(s) => match s.as_str() {
            "]" => Some(Control::GlowUp),
            "[" => Some(Control::GlowDown),
            "r" | "R" | " " => Some(Control::Randomize),
            "0" => Some(Control::Reset),
            _ => None,
        },
        _ => None,
    }
}

/// Mutable parameter record owned by the host loop.
#[derive(Debug, Clone)]
pub struct ParameterState {
    params: SnowflakeParams,
    initial: SnowflakeParams,
    dirty: bool,
}

impl ParameterState {
    /// Start from `params` (clamped).
    pub fn new(params: SnowflakeParams) -> Self {
        let params = params.clamped();
        Self {
            params,
            initial: params,
            dirty: true,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &SnowflakeParams {
        &self.params
    }

    /// Apply one control; seed-changing controls draw from `rng`.
    pub fn apply<R: Rng>(&mut self, control: Control, rng: &mut R) {
        let p = &mut self.params;
        match control {
            Control::ComplexityUp => p.complexity += COMPLEXITY_STEP,
            Control::ComplexityDown => p.complexity -= COMPLEXITY_STEP,
            Control::ThicknessUp => p.thickness += THICKNESS_STEP,
            Control::ThicknessDown => p.thickness -= THICKNESS_STEP,
            Control::GlowUp => p.glow += GLOW_STEP,
            Control::GlowDown => p.glow -= GLOW_STEP,
            Control::Randomize => p.randomize_seed(rng),
            Control::Reset => {
                let mouse = p.mouse;
                *p = self.initial;
                p.mouse = mouse;
                p.randomize_seed(rng);
            }
        }
        self.params = self.params.clamped();
        self.dirty = true;
        log::debug!("{:?} -> {:?}", control, self.params);
    }

    /// Draw a fresh seed.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.apply(Control::Randomize, rng);
    }

    /// Record the pointer position in window pixels (top-left origin).
    ///
    /// Ignored while the window has no area.
    pub fn set_pointer(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.params.mouse = [
            ((x / width as f64) as f32).clamp(0.0, 1.0),
            ((y / height as f64) as f32).clamp(0.0, 1.0),
        ];
    }

    /// Whether shape parameters changed since the last call; clears the flag.
    ///
    /// Pointer moves do not count, they only rotate the view.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Short human-readable summary for the window title.
    pub fn summary(&self) -> String {
        let p = &self.params;
        format!(
            "seed {:.1} | complexity {} | thickness {:.3} | glow {:.2}",
            p.seed,
            p.branch_count(),
            p.thickness,
            p.glow
        )
    }
}
