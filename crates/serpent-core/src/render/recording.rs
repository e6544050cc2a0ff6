use super::{Composite, LineCap, Surface};
use crate::color::{Rgb, Rgba};
use glam::Vec2;

/// A draw call together with the context state it was issued under.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear {
        width: f32,
        height: f32,
    },
    Rect {
        color: Rgb,
        alpha: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
        composite: Composite,
    },
    Radial {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        alpha: f32,
        composite: Composite,
    },
    Polyline {
        points: usize,
        color: Rgb,
        alpha: f32,
        line_width: f32,
        cap: LineCap,
    },
    Quadratic {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        alpha: f32,
        line_width: f32,
        cap: LineCap,
    },
}

impl DrawOp {
    /// Global alpha in effect for the op (1 for a clear).
    pub fn alpha(&self) -> f32 {
        match self {
            DrawOp::Clear { .. } => 1.0,
            DrawOp::Rect { alpha, .. }
            | DrawOp::Circle { alpha, .. }
            | DrawOp::Radial { alpha, .. }
            | DrawOp::Polyline { alpha, .. }
            | DrawOp::Quadratic { alpha, .. } => *alpha,
        }
    }

    /// Whether the op puts paint on the surface.
    pub fn is_paint(&self) -> bool {
        !matches!(self, DrawOp::Clear { .. })
    }
}

/// In-memory [`Surface`] that logs every draw for headless assertions.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    alpha: f32,
    composite: Composite,
    fill: Rgb,
    stroke: Rgb,
    line_width: f32,
    line_cap: LineCap,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            alpha: 1.0,
            composite: Composite::SourceOver,
            fill: Rgb::new(0.0, 0.0, 0.0),
            stroke: Rgb::new(0.0, 0.0, 0.0),
            line_width: 1.0,
            line_cap: LineCap::Butt,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop the log, keeping the context state.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn paint_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_paint()).count()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn global_alpha(&self) -> f32 {
        self.alpha
    }

    pub fn composite(&self) -> Composite {
        self.composite
    }

    /// Drop the log and return the context to canvas defaults, as resizing a canvas does.
    pub fn reset_context(&mut self) {
        *self = Self::default();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn set_composite(&mut self, mode: Composite) {
        self.composite = mode;
    }

    fn set_fill(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn set_stroke(&mut self, color: Rgb) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {
        self.ops.push(DrawOp::Rect {
            color: self.fill,
            alpha: self.alpha,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color: self.fill,
            alpha: self.alpha,
            composite: self.composite,
        });
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, inner: Rgba) {
        self.ops.push(DrawOp::Radial {
            center,
            radius,
            inner,
            alpha: self.alpha,
            composite: self.composite,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        self.ops.push(DrawOp::Polyline {
            points: points.len(),
            color: self.stroke,
            alpha: self.alpha,
            line_width: self.line_width,
            cap: self.line_cap,
        });
    }

    fn stroke_quadratic(&mut self, from: Vec2, _control: Vec2, to: Vec2) {
        self.ops.push(DrawOp::Quadratic {
            from,
            to,
            color: self.stroke,
            alpha: self.alpha,
            line_width: self.line_width,
            cap: self.line_cap,
        });
    }
}
