//! Serpent particle-field engine: platform-agnostic simulation and drawing.
//!
//! A wandering "serpent" path perturbs a dense field of passive particles.
//! The engine owns all simulation state and draws through the [`Surface`]
//! trait; the frame loop is driven through [`FrameScheduler`] so the whole
//! thing runs headless in tests.

pub mod color;
pub mod constants;
pub mod contour;
pub mod engine;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod math;
pub mod palette;
pub mod path;
pub mod render;
pub mod ripple;
pub mod rng;
pub mod scheduler;
pub mod stars;
pub mod tween;

pub use color::*;
pub use contour::{ContourLine, ContourSet};
pub use engine::*;
pub use error::*;
pub use field::{BodyShape, FieldStep, Particle, ParticleField};
pub use lifecycle::*;
pub use palette::*;
pub use path::{PathGeometry, PathPlanner, Sample};
pub use render::{style_passes, Composite, DrawOp, LineCap, RecordingSurface, Surface};
pub use ripple::{RippleLine, RippleSet};
pub use scheduler::*;
pub use stars::*;
