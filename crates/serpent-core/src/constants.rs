use std::f32::consts::PI;

// Simulation and drawing tuning shared by the engine and its renderers.
// Lengths are logical canvas px unless noted; `min` is min(width, height).

// Frame stepping
pub const MIN_FRAME_DT: f32 = 0.008; // s, ~125fps step
pub const MAX_FRAME_DT: f32 = 0.033; // s, ~30fps step
pub const VISIBLE_EPSILON: f32 = 0.01; // signals at or below this count as "off"

// Transitions (seconds)
pub const PALETTE_FADE_SEC: f64 = 0.7;
pub const STYLE_FADE_SEC: f64 = 0.7;
pub const STAR_FADE_SEC: f64 = 0.6;
pub const STAR_WARP_SEC: f64 = 0.52;

// Serpent life cycle
pub const GROW_SEC: f32 = 1.1;
pub const FADE_MAX_SEC: f32 = 0.6;
pub const FADE_LIFE_FRACTION: f32 = 0.25;
pub const LIFE_MIN_SEC: f32 = 6.0;
pub const LIFE_SPAN_SEC: f32 = 3.0;
pub const RESPAWN_MIN_SEC: f32 = 1.6;
pub const RESPAWN_SPAN_SEC: f32 = 1.4;

// Path geometry (derived from `min` on resize)
pub const SEGMENTS_PER_PX: f32 = 1.0 / 30.0;
pub const SEGMENT_COUNT_MIN: usize = 18;
pub const SEGMENT_COUNT_MAX: usize = 32;
pub const SEGMENT_SPACING_MIN: f32 = 6.0;
pub const SEGMENT_SPACING_FRAC: f32 = 0.012;
pub const SAMPLES_PER_BODY: f32 = 12.0;
pub const TRAIL_SPACING_MIN: f32 = 4.0;
pub const TRAIL_SPACING_FRAC: f32 = 0.6; // of segment spacing
pub const TRAIL_LENGTH_FACTOR: f32 = 12.0; // max trail points = min / spacing * factor
pub const HEAD_SPEED_FRAC: f32 = 0.12; // of `min`, px/s
pub const CHAIN_FOLLOW: f32 = 0.72;

// Spawning
pub const SPAWN_INSET_FRAC: f32 = 0.18;
pub const SPAWN_ATTEMPTS: usize = 18;
pub const SPAWN_MIN_SEPARATION_FRAC: f32 = 0.35;
pub const SPAWN_PATH_CLEARANCE_SEGMENTS: f32 = 7.0;
pub const SPAWN_PATH_CLEARANCE_FRAC: f32 = 0.2;
pub const SPAWN_HEADING_JITTER: f32 = 0.5; // rad
pub const SPAWN_MIN_TURN_FRAC: f32 = 0.35; // of MAX_TURN

// Steering
pub const MAX_TURN: f32 = PI / 2.3; // rad, largest planned curve
pub const MAX_TURN_RATE: f32 = PI / 1.5; // rad/s
pub const MIN_TURN_RATE: f32 = PI / 2.6; // rad/s
pub const MIN_TURN_FRAC: f32 = 0.25; // of MAX_TURN
pub const STEER_WEIGHT: f32 = 0.65;
pub const HORIZONTAL_BIAS: f32 = 0.8;
pub const TURN_EASE_PER_SEC: f32 = 6.0;
pub const AVOID_PRESSURE_GAIN: f32 = 2.0; // turn-rate multiplier 1 + gain * pressure
pub const CANDIDATE_HEADINGS: usize = 6;
pub const LOOKAHEAD_SEGMENTS: f32 = 6.0;
pub const AVOID_SKIP_SEGMENTS: usize = 6;
pub const EDGE_PAD_FRAC: f32 = 0.12;
pub const BOUNCE_PAD_FRAC: f32 = 0.6; // of edge pad
pub const SELF_AVOID_SEGMENTS: f32 = 4.2; // radius in segment spacings
pub const TRAIL_AVOID_SCALE: f32 = 1.2; // of self-avoid radius
pub const TRAIL_AVOID_WEIGHT: f32 = 1.1;
pub const TRAIL_IGNORE_MIN: usize = 12;
pub const TRAIL_SCAN_POINTS: f32 = 180.0;
pub const AVOID_BLEND_MAX: f32 = 0.98;
pub const AVOID_PANIC_FRAC: f32 = 0.7; // of avoid radius

// Particle field
pub const PARTICLE_AREA_PX: f32 = 50.0; // one particle per this many px²
pub const PARTICLE_MAX: usize = 70_000;
pub const PUSH_STRENGTH: f32 = 80.0;
pub const RETURN_STRENGTH: f32 = 0.42;
pub const RETURN_BASE: f32 = 0.012;
pub const DRAG_NEAR: f32 = 0.985;
pub const DRAG_FAR: f32 = 0.972;
pub const WAKE_SPEED_SCALE: f32 = 0.01;
pub const RADIAL_PUSH: f32 = 0.4;
pub const FORWARD_PUSH: f32 = 0.2;
pub const SWIRL_PUSH: f32 = 0.24;
pub const INFLUENCE_CUTOFF: f32 = 0.00002;
pub const BODY_RADIUS_FRAC: f32 = 0.008;
pub const HEADING_EASE_PER_SEC: f32 = 6.0;

// Stars
pub const STAR_AREA_PX: f32 = 1800.0;
pub const STAR_MIN: usize = 160;
pub const STAR_MAX: usize = 900;
pub const STAR_STRENGTH: f32 = 0.7;
pub const STAR_ALPHA_CUTOFF: f32 = 0.02;

// Contours
pub const CONTOUR_SPACING_MIN: f32 = 10.0;
pub const CONTOUR_SPACING_FRAC: f32 = 0.02;

// Ripples
pub const RIPPLE_SPACING_MIN: f32 = 20.0;
pub const RIPPLE_SPACING_FRAC: f32 = 0.055;
