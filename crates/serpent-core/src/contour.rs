//! Wavy horizontal iso-lines lifted locally by the serpent body.

use crate::constants::{CONTOUR_SPACING_FRAC, CONTOUR_SPACING_MIN};
use crate::path::Sample;
use crate::rng::RngExt;
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourLine {
    pub y: f32,
    pub wobble: f32,
    pub freq: f32,
    pub phase: f32,
    pub speed: f32,
    pub amp: f32,
}

/// Contour lines owned for the lifetime of one canvas size.
#[derive(Clone, Debug, Default)]
pub struct ContourSet {
    lines: Vec<ContourLine>,
    spacing: f32,
    polylines: Vec<Vec<Vec2>>,
}

impl ContourSet {
    pub fn build<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        let spacing = CONTOUR_SPACING_MIN.max(width.min(height) * CONTOUR_SPACING_FRAC);
        let mut lines = Vec::new();
        let mut y = spacing * 0.5;
        while y < height - spacing * 0.5 {
            y += spacing * rng.span(0.35, 0.55);
            lines.push(ContourLine {
                y,
                wobble: spacing * rng.span(0.06, 0.1),
                freq: rng.span(0.0035, 0.0035),
                phase: rng.angle(),
                speed: rng.span(0.08, 0.12),
                amp: rng.span(0.6, 0.8),
            });
        }
        Self {
            lines,
            spacing,
            polylines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[ContourLine] {
        &self.lines
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Per-line alpha relative to the style's base alpha.
    pub fn line_alpha(line: &ContourLine, base: f32) -> f32 {
        base * (0.7 + line.amp * 0.3)
    }

    /// Trace every line across the canvas at time `now`.
    ///
    /// Lines are lifted upward near samples and then clamped so they keep
    /// their order with at least `0.45 · spacing` between neighbors, shifted
    /// as a block to stay inside the vertical margins.
    pub fn trace(
        &mut self,
        width: f32,
        height: f32,
        now: f64,
        samples: &[Sample],
        visibility: f32,
    ) -> &[Vec<Vec2>] {
        let count = self.lines.len();
        self.polylines.resize_with(count, Vec::new);
        for poly in &mut self.polylines {
            poly.clear();
        }
        if count == 0 {
            return &self.polylines;
        }

        let min = width.min(height);
        let step = (min * 0.015).round().max(12.0);
        let reach_x = min * 0.22;
        let reach_y = min * 0.12;
        let lift_scale = min * 0.06 * visibility;
        let min_gap = self.spacing * 0.45;
        let margin = self.spacing * 0.25;
        let t = now as f32;

        let mut column = vec![0.0f32; count];
        let mut x = -step;
        while x <= width + step {
            for (slot, line) in column.iter_mut().zip(&self.lines) {
                let wobble = (x * line.freq + line.phase + t * line.speed).sin() * line.wobble;
                let base_y = line.y + wobble;
                let lift: f32 = samples
                    .iter()
                    .map(|s| {
                        let dx = x - s.pos.x;
                        let dy = base_y - s.pos.y;
                        (-(dx * dx) / (reach_x * reach_x) - (dy * dy) / (reach_y * reach_y)).exp()
                            * (0.35 + s.weight * 0.65)
                    })
                    .sum();
                *slot = base_y - lift * lift_scale * line.amp;
            }

            let mut prev = margin;
            for y in column.iter_mut() {
                *y = y.max(prev + min_gap);
                prev = *y;
            }
            let overflow = column[count - 1] - (height - margin);
            if overflow > 0.0 {
                column.iter_mut().for_each(|y| *y -= overflow);
            }
            let underflow = margin - column[0];
            if underflow > 0.0 {
                column.iter_mut().for_each(|y| *y += underflow);
            }

            for (poly, y) in self.polylines.iter_mut().zip(&column) {
                poly.push(Vec2::new(x, *y));
            }
            x += step;
        }
        &self.polylines
    }
}
