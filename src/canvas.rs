use anyhow::{anyhow, Context};
use glam::Vec2;
use serpent_core::{Composite, LineCap, Rgb, Rgba, Surface, TRANSPARENT};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Grab the 2D context once at setup.
pub fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow!("getContext(2d): {e:?}"))?
        .context("2d context unsupported")?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|_| anyhow!("2d context has an unexpected type"))
}

/// [`Surface`] backed by a canvas 2D context drawing in logical px.
pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx, dpr: 1.0 }
    }

    pub fn set_dpr(&mut self, dpr: f64) {
        self.dpr = dpr;
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            TAU,
        );
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn set_composite(&mut self, mode: Composite) {
        let op = match mode {
            Composite::SourceOver => "source-over",
            Composite::DestinationOut => "destination-out",
            Composite::Lighter => "lighter",
        };
        _ = self.ctx.set_global_composite_operation(op);
    }

    fn set_fill(&mut self, color: Rgb) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
    }

    fn set_stroke(&mut self, color: Rgb) {
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_css()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(match cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, inner: Rgba) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius.max(0.0) as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, r * 0.1, x, y, r) {
            Ok(gradient) => gradient,
            Err(e) => {
                log::warn!("[canvas] radial gradient failed: {:?}", e);
                return;
            }
        };
        _ = gradient.add_color_stop(0.0, &inner.to_css());
        _ = gradient.add_color_stop(1.0, &TRANSPARENT.to_css());
        self.ctx.set_fill_style(&gradient);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.stroke();
    }

    fn stroke_quadratic(&mut self, from: Vec2, control: Vec2, to: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.quadratic_curve_to(
            control.x as f64,
            control.y as f64,
            to.x as f64,
            to.y as f64,
        );
        self.ctx.stroke();
    }
}
