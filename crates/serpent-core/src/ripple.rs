//! Ambient ripple lines: evenly spread wavy strokes independent of the field.

use crate::constants::{RIPPLE_SPACING_FRAC, RIPPLE_SPACING_MIN};
use crate::rng::RngExt;
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleLine {
    pub y: f32,
    pub freq: f32,
    pub phase: f32,
    pub speed: f32,
    pub amp: f32,
    /// Alpha multiplier in 0.7..1.2.
    pub shade: f32,
}

#[derive(Clone, Debug, Default)]
pub struct RippleSet {
    lines: Vec<RippleLine>,
    step: f32,
    polyline: Vec<Vec2>,
}

impl RippleSet {
    pub fn build<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        let min = width.min(height);
        let spacing = RIPPLE_SPACING_MIN.max(min * RIPPLE_SPACING_FRAC);
        let margin = spacing * 0.4;
        let mut lines = Vec::new();
        let mut y = margin;
        while y < height - margin {
            let shade = rng.span(0.7, 0.5);
            let spacing_scale = rng.span(0.65, 0.7);
            lines.push(RippleLine {
                y,
                freq: rng.span(0.003, 0.0035),
                phase: rng.angle(),
                speed: rng.span(0.08, 0.12),
                amp: spacing * rng.span(0.18, 0.2),
                shade,
            });
            y += spacing * spacing_scale;
        }
        Self {
            lines,
            step: (min * 0.018).round().max(14.0),
            polyline: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[RippleLine] {
        &self.lines
    }

    /// Points of line `index` across `[-step, width + step]` at time `now`.
    pub fn trace(&mut self, index: usize, width: f32, now: f64) -> &[Vec2] {
        self.polyline.clear();
        let Some(line) = self.lines.get(index).copied() else {
            return &self.polyline;
        };
        let t = now as f32;
        let mut x = -self.step;
        while x <= width + self.step {
            let wave = (x * line.freq + line.phase + t * line.speed).sin() * line.amp;
            self.polyline.push(Vec2::new(x, line.y + wave));
            x += self.step;
        }
        &self.polyline
    }
}
