use crate::constants::MAX_DPR;

/// Logical and backing-store size of the canvas for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    /// CSS px, floored, at least 1.
    pub width: f64,
    pub height: f64,
    /// Effective device pixel ratio after the cap.
    pub dpr: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

/// Device pixel ratio capped at `MAX_DPR`; junk values fall back to 1.
pub fn effective_dpr(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_DPR)
    } else {
        1.0
    }
}

pub fn canvas_size(rect_width: f64, rect_height: f64, device_pixel_ratio: f64) -> CanvasSize {
    let width = logical(rect_width);
    let height = logical(rect_height);
    let dpr = effective_dpr(device_pixel_ratio);
    CanvasSize {
        width,
        height,
        dpr,
        backing_width: (width * dpr).floor() as u32,
        backing_height: (height * dpr).floor() as u32,
    }
}

fn logical(extent: f64) -> f64 {
    if extent.is_finite() {
        extent.floor().max(1.0)
    } else {
        1.0
    }
}

/// CSS `inset` value for the frame wrapper.
pub fn frame_inset(margin_px: f64) -> String {
    let margin = if margin_px.is_finite() { margin_px.max(0.0) } else { 0.0 };
    format!("{margin}px")
}
