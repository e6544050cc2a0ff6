//! One serpent "run": grow in, cruise, fade out, then stay dormant until respawn.

use crate::constants::*;
use crate::math::clamp01;
use crate::rng::RngExt;
use crate::tween::ease_out_quad;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Growing,
    Cruising,
    Fading,
    Dormant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifeCycle {
    pub start: f64,
    pub life_duration: f32,
    pub respawn_delay: f32,
}

impl LifeCycle {
    pub fn random<R: Rng + ?Sized>(start: f64, rng: &mut R) -> Self {
        Self {
            start,
            life_duration: rng.span(LIFE_MIN_SEC, LIFE_SPAN_SEC),
            respawn_delay: rng.span(RESPAWN_MIN_SEC, RESPAWN_SPAN_SEC),
        }
    }

    /// Length of the whole run including the dormant tail.
    pub fn total(&self) -> f32 {
        self.life_duration + self.respawn_delay
    }

    pub fn age(&self, now: f64) -> f32 {
        (now - self.start).max(0.0) as f32
    }

    pub fn is_over(&self, now: f64) -> bool {
        self.age(now) >= self.total()
    }

    pub fn fade_duration(&self) -> f32 {
        FADE_MAX_SEC.min(self.life_duration * FADE_LIFE_FRACTION)
    }

    pub fn phase(&self, now: f64) -> Phase {
        let age = self.age(now);
        if age >= self.life_duration {
            Phase::Dormant
        } else if age >= self.life_duration - self.fade_duration() {
            Phase::Fading
        } else if age < GROW_SEC {
            Phase::Growing
        } else {
            Phase::Cruising
        }
    }

    pub fn envelope(&self, now: f64) -> Envelope {
        let age = self.age(now);
        let fade = self.fade_duration();
        let grow_ease = ease_out_quad(age / GROW_SEC);
        let fade_ease = ease_out_quad((age - (self.life_duration - fade)) / fade);
        let scale_visibility = clamp01((grow_ease - 0.2) / 0.8) * (1.0 - fade_ease);
        Envelope {
            phase: self.phase(now),
            grow_ease,
            visibility: grow_ease * (1.0 - fade_ease),
            growth_width: 0.2 + 0.8 * grow_ease * (1.0 - fade_ease),
            overlay_alpha: scale_visibility * 0.35,
        }
    }
}

/// Per-frame scalars derived from the life cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub phase: Phase,
    /// Eased grow-in progress, 0..1.
    pub grow_ease: f32,
    /// Opacity multiplier for body, glow, and field push.
    pub visibility: f32,
    /// Body width factor, 0.2..1.
    pub growth_width: f32,
    /// Strength of the erase overlay under the head.
    pub overlay_alpha: f32,
}

impl Envelope {
    pub const DORMANT: Envelope = Envelope {
        phase: Phase::Dormant,
        grow_ease: 0.0,
        visibility: 0.0,
        growth_width: 0.2,
        overlay_alpha: 0.0,
    };

    pub fn is_dormant(&self) -> bool {
        self.phase == Phase::Dormant
    }

    /// Number of body segments in play: ramps 1..=count while growing, 0 when dormant.
    pub fn active_segments(&self, segment_count: usize) -> usize {
        if self.is_dormant() {
            return 0;
        }
        let ramp = 1.0 + (segment_count.saturating_sub(1)) as f32 * self.grow_ease;
        (ramp.round() as usize).clamp(1, segment_count.max(1))
    }
}
