//! Depth-biased starfield, its visibility fade, and the vertical warp transition.

use crate::constants::{STAR_AREA_PX, STAR_FADE_SEC, STAR_MAX, STAR_MIN, STAR_WARP_SEC, VISIBLE_EPSILON};
use crate::math::clamp01;
use crate::rng::RngExt;
use crate::tween::{ease_in_cubic, ease_out_cubic, Tween};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    /// Twinkle angular rate, rad/s.
    pub twinkle_rate: f32,
    pub phase: f32,
}

impl Star {
    /// Brightness multiplier in [0.3, 1].
    pub fn twinkle(&self, t: f32) -> f32 {
        0.65 + 0.35 * (t * self.twinkle_rate + self.phase).sin()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn count_for(width: f32, height: f32) -> usize {
        let by_area = (width.max(0.0) * height.max(0.0) / STAR_AREA_PX).floor() as usize;
        by_area.clamp(STAR_MIN, STAR_MAX)
    }

    pub fn build<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        let stars = (0..Self::count_for(width, height))
            .map(|_| {
                let depth = rng.unit();
                let size_bias = depth.powf(1.6);
                Star {
                    pos: Vec2::new(rng.unit() * width, rng.unit() * height),
                    radius: 0.22 + size_bias * 0.9,
                    alpha: 0.08 + depth * 0.3,
                    twinkle_rate: rng.span(0.3, 0.9),
                    phase: rng.angle(),
                }
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarpDirection {
    #[default]
    Up,
    Down,
}

impl WarpDirection {
    /// `"down"` selects [`WarpDirection::Down`]; anything else is up.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("down") {
            WarpDirection::Down
        } else {
            WarpDirection::Up
        }
    }

    fn sign(self) -> f32 {
        match self {
            WarpDirection::Up => -1.0,
            WarpDirection::Down => 1.0,
        }
    }
}

/// One-shot request from the page shell. A zero counter means "no warp yet".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StarWarpTrigger {
    pub counter: u32,
    pub direction: WarpDirection,
    pub entering: bool,
}

/// An in-flight warp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarWarp {
    pub start: f64,
    pub direction: WarpDirection,
    pub entering: bool,
}

impl StarWarp {
    pub fn from_trigger(trigger: StarWarpTrigger, now: f64) -> Option<Self> {
        (trigger.counter != 0).then_some(Self {
            start: now,
            direction: trigger.direction,
            entering: trigger.entering,
        })
    }

    pub fn progress(&self, now: f64) -> f32 {
        clamp01(((now - self.start) / STAR_WARP_SEC) as f32)
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Geometry of the warp at `now` for a canvas of the given size.
    pub fn frame(&self, now: f64, width: f32, height: f32) -> WarpFrame {
        let t = self.progress(now);
        let ease = if self.entering {
            ease_out_cubic(t)
        } else {
            ease_in_cubic(t)
        };
        let min = width.min(height);
        let pad = (min * 0.08).max(18.0);
        let fade_band = (min * 0.1).max(28.0);
        let distance = height + pad * 2.0;
        let travel = if self.entering { ease - 1.0 } else { ease };
        WarpFrame {
            offset: self.direction.sign() * distance * travel,
            pad,
            fade_line: height + fade_band - (height + fade_band * 2.0) * ease,
            fade_band,
            height,
            entering: self.entering,
        }
    }
}

/// Per-frame warp geometry applied to every star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpFrame {
    /// Vertical shift added to every star.
    pub offset: f32,
    /// Stars beyond this distance outside the canvas are culled.
    pub pad: f32,
    /// Center of the moving fade band (leaving warps only).
    pub fade_line: f32,
    pub fade_band: f32,
    pub height: f32,
    pub entering: bool,
}

impl WarpFrame {
    /// Shifted y of a star, or `None` when it has slid out of view.
    pub fn place(&self, y: f32) -> Option<f32> {
        let shifted = y + self.offset;
        (shifted >= -self.pad && shifted <= self.height + self.pad).then_some(shifted)
    }

    /// Alpha multiplier of the fade band at shifted y.
    pub fn fade_alpha(&self, y: f32) -> f32 {
        if self.entering {
            return 1.0;
        }
        if y >= self.fade_line + self.fade_band {
            0.0
        } else if y > self.fade_line - self.fade_band {
            (self.fade_line + self.fade_band - y) / (2.0 * self.fade_band)
        } else {
            1.0
        }
    }
}

/// Star layer opacity, tweened toward the latest visibility signal.
#[derive(Clone, Debug)]
pub struct StarFade {
    signal: f32,
    alpha: f32,
    tween: Option<Tween<f32>>,
}

impl StarFade {
    pub fn new(visibility: f32) -> Self {
        let v = clamp01(visibility);
        Self {
            signal: v,
            alpha: v,
            tween: None,
        }
    }

    /// Retarget the fade. Returns whether a tween started (the loop should run).
    pub fn set_visibility(&mut self, visibility: f32, now: f64) -> bool {
        let target = clamp01(visibility);
        self.signal = target;
        let from = self.alpha;
        if target <= 0.0 {
            if from > VISIBLE_EPSILON {
                self.tween = Some(Tween::new(now, STAR_FADE_SEC, from, 0.0));
                return true;
            }
            self.tween = None;
            self.alpha = 0.0;
            return false;
        }
        if (from - target).abs() < VISIBLE_EPSILON {
            self.tween = None;
            self.alpha = target;
            return false;
        }
        self.tween = Some(Tween::new(now, STAR_FADE_SEC, from, target));
        true
    }

    /// Advance to `now` and return the layer alpha.
    ///
    /// A fade-out keeps drawing until its tween lands; otherwise a signal at
    /// or below the visibility epsilon switches the layer off at once.
    pub fn sample(&mut self, now: f64) -> f32 {
        match &self.tween {
            Some(tween) => {
                self.alpha = tween.value(now);
                if tween.is_done(now) {
                    self.tween = None;
                }
            }
            None if self.signal > VISIBLE_EPSILON => self.alpha = self.signal,
            None => self.alpha = 0.0,
        }
        self.alpha
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn signal(&self) -> f32 {
        self.signal
    }

    pub fn in_flight(&self) -> bool {
        self.tween.is_some()
    }
}
