//! Seeded random streams for procedural geometry.
//!
//! Every procedural build (particles, stars, contour and ripple lines) and
//! every steering decision draws from a `StdRng` derived from one engine seed,
//! so a given seed and canvas size reproduce the same animation.

use rand::prelude::*;
use std::f32::consts::TAU;

pub const LANE_PATH: u64 = 1;
pub const LANE_FIELD: u64 = 2;
pub const LANE_STARS: u64 = 3;
pub const LANE_CONTOURS: u64 = 4;
pub const LANE_RIPPLES: u64 = 5;

/// Derive an independent stream from a base seed so consumers never shift each other.
pub fn stream(seed: u64, lane: u64) -> StdRng {
    let mix = seed ^ lane.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mix)
}

pub trait RngExt: Rng {
    /// Uniform in [0, 1).
    fn unit(&mut self) -> f32 {
        self.gen::<f32>()
    }

    /// Uniform in [-1, 1).
    fn signed(&mut self) -> f32 {
        self.gen::<f32>() * 2.0 - 1.0
    }

    /// Uniform in [lo, lo + span).
    fn span(&mut self, lo: f32, span: f32) -> f32 {
        lo + self.gen::<f32>() * span
    }

    fn angle(&mut self) -> f32 {
        self.gen::<f32>() * TAU
    }

    fn coin_sign(&mut self) -> f32 {
        if self.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }
}

impl<R: Rng + ?Sized> RngExt for R {}
