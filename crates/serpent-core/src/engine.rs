//! The serpent engine: owns every piece of simulation state for one canvas.

use crate::constants::VISIBLE_EPSILON;
use crate::contour::ContourSet;
use crate::error::PaletteError;
use crate::field::{BodyShape, FieldStep, Particle, ParticleField};
use crate::lifecycle::Envelope;
use crate::math::clamp01;
use crate::palette::{PaletteCrossfade, PaletteDescriptor, PaletteState, StyleFade, StyleTransition};
use crate::path::{PathPlanner, Sample};
use crate::render::{self, LineLayers, Scene, Surface};
use crate::ripple::RippleSet;
use crate::rng::{self, LANE_CONTOURS, LANE_FIELD, LANE_PATH, LANE_RIPPLES, LANE_STARS};
use crate::stars::{StarFade, StarWarp, StarWarpTrigger, Starfield, WarpFrame};
use rand::rngs::StdRng;

/// Runtime configuration supplied by the host at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineParams {
    pub seed: u64,
    pub palette: PaletteDescriptor,
    pub serpent_visibility: f32,
    pub star_visibility: f32,
    pub background_opacity: f32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            seed: 0x5E4_9E47,
            palette: PaletteDescriptor::dark(),
            serpent_visibility: 1.0,
            star_visibility: 0.0,
            background_opacity: 1.0,
        }
    }
}

/// Whether the host should keep requesting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    /// Nothing visible and nothing in flight: stop the loop until kicked.
    Idle,
}

/// Colors for the non-canvas chrome around the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chrome {
    /// CSS background of the container, `transparent` when the background is off.
    pub container_background: String,
    /// CSS border color of the frame wrapper.
    pub frame_border: String,
}

/// Per-frame values computed by [`SerpentEngine::step`] and read by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub now: f64,
    pub palette: PaletteState,
    pub style: StyleTransition,
    pub serpent_strength: f32,
    pub star_alpha: f32,
    pub warp: Option<WarpFrame>,
    pub envelope: Envelope,
    pub body: BodyShape,
}

pub struct SerpentEngine {
    width: f32,
    height: f32,
    planner: PathPlanner,
    field: ParticleField,
    starfield: Starfield,
    contours: ContourSet,
    ripples: RippleSet,
    star_rng: StdRng,
    contour_rng: StdRng,
    ripple_rng: StdRng,
    palette: PaletteCrossfade,
    style: StyleFade,
    density: f32,
    serpent_visibility: f32,
    background_opacity: f32,
    star_fade: StarFade,
    warp: Option<StarWarp>,
    snapshot: FrameSnapshot,
}

impl SerpentEngine {
    /// Build an engine for a 1×1 canvas; call [`SerpentEngine::resize`] before drawing.
    pub fn new(params: EngineParams) -> Result<Self, PaletteError> {
        let state = PaletteState::try_from(&params.palette)?;
        let style = params.palette.dot_style;
        let mut engine = Self {
            width: 1.0,
            height: 1.0,
            planner: PathPlanner::new(rng::stream(params.seed, LANE_PATH)),
            field: ParticleField::new(rng::stream(params.seed, LANE_FIELD)),
            starfield: Starfield::default(),
            contours: ContourSet::default(),
            ripples: RippleSet::default(),
            star_rng: rng::stream(params.seed, LANE_STARS),
            contour_rng: rng::stream(params.seed, LANE_CONTOURS),
            ripple_rng: rng::stream(params.seed, LANE_RIPPLES),
            palette: PaletteCrossfade::new(state),
            style: StyleFade::new(style),
            density: params.palette.dot_density_scale,
            serpent_visibility: clamp01(params.serpent_visibility),
            background_opacity: clamp01(params.background_opacity),
            star_fade: StarFade::new(params.star_visibility),
            warp: None,
            snapshot: FrameSnapshot {
                now: 0.0,
                palette: state,
                style: StyleTransition::settled(style),
                serpent_strength: 0.0,
                star_alpha: 0.0,
                warp: None,
                envelope: Envelope::DORMANT,
                body: BodyShape::new(1.0, 1.0, 0.0, 0.2),
            },
        };
        engine.resize(1.0, 1.0);
        Ok(engine)
    }

    /// Rebuild every size-dependent piece; the serpent respawns on the next step.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0).floor();
        self.height = height.max(1.0).floor();
        let (w, h) = (self.width, self.height);
        self.field.rebuild(w, h);
        self.starfield = Starfield::build(w, h, &mut self.star_rng);
        self.contours = ContourSet::build(w, h, &mut self.contour_rng);
        self.ripples = RippleSet::build(w, h, &mut self.ripple_rng);
        self.planner.resize(w, h);
        let g = self.planner.geometry();
        log::info!(
            "[engine] resize {}x{} particles={} stars={} segments={} spacing={:.1}",
            w,
            h,
            self.field.len(),
            self.starfield.len(),
            g.segment_count,
            g.segment_spacing
        );
    }

    /// Start crossfading to a new palette (and style, if it changed).
    ///
    /// A descriptor that fails to parse leaves the current palette untouched.
    pub fn set_palette(&mut self, desc: &PaletteDescriptor, now: f64) -> Result<(), PaletteError> {
        let target = PaletteState::try_from(desc)?;
        self.style.request(desc.dot_style, now);
        self.density = desc.dot_density_scale;
        self.palette.retarget(target, now);
        Ok(())
    }

    pub fn set_serpent_visibility(&mut self, visibility: f32) {
        self.serpent_visibility = clamp01(visibility);
    }

    /// Returns whether a fade started, in which case the loop should be kicked.
    pub fn set_star_visibility(&mut self, visibility: f32, now: f64) -> bool {
        self.star_fade.set_visibility(visibility, now)
    }

    pub fn set_background_opacity(&mut self, opacity: f32) {
        self.background_opacity = clamp01(opacity);
    }

    /// Fire a star warp; a zero counter is ignored. Returns whether a warp started.
    pub fn trigger_star_warp(&mut self, trigger: StarWarpTrigger, now: f64) -> bool {
        match StarWarp::from_trigger(trigger, now) {
            Some(warp) => {
                self.warp = Some(warp);
                true
            }
            None => false,
        }
    }

    /// Any of serpent, stars or background is above the visibility epsilon.
    pub fn has_visible_signal(&self) -> bool {
        self.serpent_visibility > VISIBLE_EPSILON
            || self.star_fade.signal() > VISIBLE_EPSILON
            || self.background_opacity > VISIBLE_EPSILON
    }

    /// Advance transitions, the path planner and the particle field to `now`.
    pub fn step(&mut self, now: f64, dt: f32) -> FrameStatus {
        let palette = self.palette.sample(now);
        let style = self.style.sample(now);
        let warp = self.warp.map(|warp| warp.frame(now, self.width, self.height));
        if self.warp.is_some_and(|warp| warp.is_done(now)) {
            self.warp = None;
        }
        let star_alpha = self.star_fade.sample(now);
        let serpent_strength = self.serpent_visibility;

        self.snapshot = FrameSnapshot {
            now,
            palette,
            style,
            serpent_strength,
            star_alpha,
            warp,
            envelope: Envelope::DORMANT,
            body: self.snapshot.body,
        };

        if serpent_strength <= VISIBLE_EPSILON {
            let idle = star_alpha <= VISIBLE_EPSILON
                && !self.palette.in_flight()
                && !self.style.in_flight()
                && !self.star_fade.in_flight()
                && self.warp.is_none();
            return if idle {
                FrameStatus::Idle
            } else {
                FrameStatus::Continue
            };
        }

        self.planner.step(now, dt);
        let envelope = *self.planner.envelope();
        let g = self.planner.geometry();
        let body = BodyShape::new(
            g.min_dim,
            g.segment_spacing,
            envelope.grow_ease,
            envelope.growth_width,
        );
        if style.uses_particles() {
            self.field.step(&FieldStep {
                samples: self.planner.samples(),
                body,
                visibility: envelope.visibility,
                density: self.density,
                track_heading: style.uses_heading(),
                dt,
            });
        }
        self.snapshot.envelope = envelope;
        self.snapshot.body = body;
        FrameStatus::Continue
    }

    /// Draw the state computed by the last [`SerpentEngine::step`].
    pub fn render<S: Surface>(&mut self, surface: &mut S) {
        let snap = self.snapshot;
        let samples: &[Sample] = if snap.serpent_strength > VISIBLE_EPSILON {
            self.planner.samples()
        } else {
            &[]
        };
        let scene = Scene {
            width: self.width,
            height: self.height,
            now: snap.now,
            palette: &snap.palette,
            background_opacity: self.background_opacity,
            star_alpha: snap.star_alpha,
            warp: snap.warp,
            starfield: &self.starfield,
            serpent_strength: snap.serpent_strength,
            style: snap.style,
            density: self.density,
            particles: self.field.particles(),
            samples,
            body: snap.body,
            envelope: snap.envelope,
        };
        let layers = LineLayers {
            contours: &mut self.contours,
            ripples: &mut self.ripples,
        };
        render::draw_frame(surface, &scene, layers);
    }

    /// Step then draw one frame.
    pub fn frame<S: Surface>(&mut self, now: f64, dt: f32, surface: &mut S) -> FrameStatus {
        let status = self.step(now, dt);
        self.render(surface);
        status
    }

    /// Chrome colors for the palette shown by the last step.
    pub fn chrome(&self) -> Chrome {
        let palette = self.palette.current();
        let container_background = if self.background_opacity > VISIBLE_EPSILON {
            palette.background.to_css_alpha(self.background_opacity)
        } else {
            "transparent".to_string()
        };
        Chrome {
            container_background,
            frame_border: palette.border.to_css(),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn samples(&self) -> &[Sample] {
        self.planner.samples()
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn contours(&self) -> &ContourSet {
        &self.contours
    }

    pub fn ripples(&self) -> &RippleSet {
        &self.ripples
    }

    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    pub fn palette(&self) -> &PaletteCrossfade {
        &self.palette
    }

    pub fn star_alpha(&self) -> f32 {
        self.star_fade.alpha()
    }

    pub fn is_warping(&self) -> bool {
        self.warp.is_some()
    }
}
