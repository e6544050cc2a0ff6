// DOM layout and canvas sizing for the browser front-end.
// Simulation tuning lives in `serpent_core::constants`.

// Backing store resolution
pub const MAX_DPR: f64 = 1.5; // device pixel ratio cap; higher densities cost fill-rate for no visible gain

// Frame wrapper
pub const DEFAULT_FRAME_MARGIN_PX: f64 = 32.0; // inset of the bordered frame inside the container
pub const FRAME_BORDER_PX: f64 = 1.0;

// Class names so the host stylesheet can target the layers
pub const CONTAINER_CLASS: &str = "serpent-background";
pub const FRAME_CLASS: &str = "serpent-frame";
pub const CANVAS_CLASS: &str = "serpent-canvas";

// Seed used when the host does not pass one
pub const DEFAULT_SEED: u32 = 0x5E4_9E47;
