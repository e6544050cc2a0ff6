//! Style renderer: draws one frame through the [`Surface`] seam.
//!
//! The renderer never talks to a browser. Anything that can fill circles,
//! radial gradients and stroke lines implements [`Surface`]; the web crate
//! wraps a `CanvasRenderingContext2d`, tests use [`RecordingSurface`].

mod bloom;
mod glow;
mod lines;
mod particles;
mod recording;
mod stars;

pub use recording::{DrawOp, RecordingSurface};

use crate::color::{Rgb, Rgba};
use crate::constants::VISIBLE_EPSILON;
use crate::contour::ContourSet;
use crate::field::{BodyShape, Particle};
use crate::lifecycle::Envelope;
use crate::math::clamp01;
use crate::palette::{DotStyle, PaletteState, StyleTransition};
use crate::path::Sample;
use crate::ripple::RippleSet;
use crate::stars::{Starfield, WarpFrame};
use glam::Vec2;

/// Compositing mode of subsequent draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Composite {
    #[default]
    SourceOver,
    /// Erases what is underneath in proportion to source alpha.
    DestinationOut,
    /// Additive.
    Lighter,
}

/// End shape of stroked lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Canvas default; also what a resized canvas falls back to.
    #[default]
    Butt,
    Round,
}

/// Minimal 2D drawing context the renderer needs.
pub trait Surface {
    /// Reset transform and clear the logical `width × height` area.
    fn clear(&mut self, width: f32, height: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, mode: Composite);
    fn set_fill(&mut self, color: Rgb);
    fn set_stroke(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    /// Fill a circle with a radial gradient from `inner` (at `0.1 · radius`)
    /// to fully transparent at `radius`.
    fn fill_radial(&mut self, center: Vec2, radius: f32, inner: Rgba);
    fn stroke_polyline(&mut self, points: &[Vec2]);
    fn stroke_quadratic(&mut self, from: Vec2, control: Vec2, to: Vec2);

    /// Global alpha clamped to [0, 1].
    fn set_opacity(&mut self, alpha: f32) {
        self.set_global_alpha(clamp01(alpha));
    }
}

/// Everything one frame of drawing reads.
pub(crate) struct Scene<'a> {
    pub width: f32,
    pub height: f32,
    pub now: f64,
    pub palette: &'a PaletteState,
    pub background_opacity: f32,
    pub star_alpha: f32,
    pub warp: Option<WarpFrame>,
    pub starfield: &'a Starfield,
    /// Serpent layer strength; the layer is skipped at or below the epsilon.
    pub serpent_strength: f32,
    pub style: StyleTransition,
    pub density: f32,
    pub particles: &'a [Particle],
    pub samples: &'a [Sample],
    pub body: BodyShape,
    pub envelope: Envelope,
}

impl Scene<'_> {
    fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    fn dot_alpha_scale(&self) -> f32 {
        self.palette.dot_alpha_scale * self.serpent_strength
    }

    fn wake_alpha_scale(&self) -> f32 {
        self.palette.wake_alpha_scale * self.serpent_strength
    }
}

/// Owned line sets that keep trace buffers between frames.
pub(crate) struct LineLayers<'a> {
    pub contours: &'a mut ContourSet,
    pub ripples: &'a mut RippleSet,
}

pub(crate) fn draw_frame<S: Surface>(surface: &mut S, scene: &Scene, layers: LineLayers) {
    surface.set_composite(Composite::SourceOver);
    surface.clear(scene.width, scene.height);
    // Resizing a canvas resets its context, so the cap is set every frame.
    surface.set_line_cap(LineCap::Round);
    surface.set_opacity(1.0);

    if scene.background_opacity > VISIBLE_EPSILON {
        surface.set_opacity(scene.background_opacity);
        surface.set_fill(scene.palette.background);
        surface.fill_rect(0.0, 0.0, scene.width, scene.height);
        surface.set_opacity(1.0);
    }

    stars::draw(surface, scene);

    if scene.serpent_strength <= VISIBLE_EPSILON {
        return;
    }

    let LineLayers { contours, ripples } = layers;
    for (style, mix) in style_passes(&scene.style) {
        draw_style(surface, scene, style, mix, contours, ripples);
    }
    surface.set_opacity(1.0);

    glow::draw_erase(surface, scene);
    glow::draw_glow(surface, scene);
}

/// Styles to draw this frame with their alpha weights, outgoing first.
pub fn style_passes(style: &StyleTransition) -> impl Iterator<Item = (DotStyle, f32)> {
    let passes = if style.is_settled() {
        [(style.to, 1.0), (style.to, 0.0)]
    } else {
        [(style.from, 1.0 - style.progress), (style.to, style.progress)]
    };
    passes.into_iter().filter(|(_, mix)| *mix > 0.0)
}

fn draw_style<S: Surface>(
    surface: &mut S,
    scene: &Scene,
    style: DotStyle,
    mix: f32,
    contours: &mut ContourSet,
    ripples: &mut RippleSet,
) {
    match style {
        DotStyle::Dot | DotStyle::Dash | DotStyle::Cloud => {
            particles::draw(surface, scene, style, mix)
        }
        DotStyle::Contour => lines::draw_contours(surface, scene, contours, mix),
        DotStyle::Ripple => lines::draw_ripples(surface, scene, ripples, mix),
        DotStyle::Bloom => bloom::draw(surface, scene, mix),
    }
}
