//=========================================================================
// Render Interface
//=========================================================================
//
// The narrow drawing surface game code talks to.
//
// Architecture:
//   Assets   fonts by name, textures by path (cached)
//   Canvas   draw texture / draw text, centred, with alpha
//   DrawList Canvas that records commands for one tick
//
// No GPU backend lives here. The logic thread records a `DrawList` per
// tick; anything that wants pixels consumes the list.
//
//=========================================================================

//=== Module Declarations =================================================

mod assets;
mod draw_list;

//=== Public API ==========================================================

pub use assets::{Assets, Font, Texture};
pub use draw_list::{DrawCommand, DrawList};

//=== External Dependencies ===============================================

use std::ops::{Add, Sub};

//=== Vec2 ================================================================

/// 2D position in window pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

//=== Canvas ==============================================================

/// Drawing surface.
///
/// Every draw is positioned by its centre. Alpha is clamped to `0.0..=1.0`.
pub trait Canvas {
    fn draw_texture_at(&mut self, texture: &Texture, center: Vec2, alpha: f32);

    fn draw_text_at(&mut self, font: &Font, text: &str, center: Vec2, alpha: f32);
}

/// Clamps `alpha` into `0.0..=1.0`; NaN becomes fully transparent.
pub(crate) fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_arithmetic() {
        let center = Vec2::new(480.0, 270.0);
        assert_eq!(center + Vec2::new(0.0, 40.0), Vec2::new(480.0, 310.0));
        assert_eq!(center - center, Vec2::ZERO);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(clamp_alpha(-0.5), 0.0);
        assert_eq!(clamp_alpha(1.5), 1.0);
        assert_eq!(clamp_alpha(0.25), 0.25);
        assert_eq!(clamp_alpha(f32::NAN), 0.0);
    }
}
