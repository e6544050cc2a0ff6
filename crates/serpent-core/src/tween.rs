//! Time-based interpolation shared by palette, style, and star fades.

use crate::math::{clamp01, lerp};

#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * t
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t).powi(3)
}

/// Linear interpolation between two values of the same type.
pub trait Lerp {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

/// A value animated from `from` to `to` over `duration` seconds starting at `start`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    pub start: f64,
    pub duration: f64,
    pub from: T,
    pub to: T,
}

impl<T: Lerp + Clone> Tween<T> {
    pub fn new(start: f64, duration: f64, from: T, to: T) -> Self {
        Self {
            start,
            duration,
            from,
            to,
        }
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        clamp01(((now - self.start) / self.duration) as f32)
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Smoothstep-eased value; exactly `to` once the tween has finished.
    pub fn value(&self, now: f64) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to.clone();
        }
        self.from.lerp(&self.to, smoothstep(t))
    }
}
