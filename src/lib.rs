#![cfg(target_arch = "wasm32")]
use serpent_core::{
    AnimationLoop, EngineParams, PaletteDescriptor, SerpentEngine, StarWarpTrigger, WarpDirection,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod canvas;
mod constants;
mod dom;
mod frame;
mod sizing;

use canvas::CanvasSurface;
use constants::{DEFAULT_FRAME_MARGIN_PX, DEFAULT_SEED};
use dom::Layers;
use frame::{FrameCallback, RafScheduler};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("serpent-web starting");
    Ok(())
}

/// Current time on the same clock as `requestAnimationFrame`, in seconds.
fn now_sec() -> f64 {
    instant::now() * 0.001
}

fn parse_palette(json: &str) -> anyhow::Result<PaletteDescriptor> {
    Ok(serde_json::from_str(json)?)
}

/// Everything one mounted background owns, shared with its frame callback.
struct Background {
    window: web::Window,
    layers: Layers,
    engine: SerpentEngine,
    animation: AnimationLoop<RafScheduler>,
    surface: CanvasSurface,
}

impl Background {
    fn on_frame(&mut self, now: f64) {
        let Background {
            engine,
            animation,
            surface,
            layers,
            ..
        } = self;
        animation.tick(now, engine, surface);
        layers.apply_chrome(&engine.chrome());
    }

    fn fit_to_host(&mut self) {
        let size = self.layers.measure(&self.window);
        self.layers.apply_size(&size);
        self.surface.set_dpr(size.dpr);
        log::info!(
            "[dom] canvas {}x{} dpr={:.2} backing={}x{}",
            size.width,
            size.height,
            size.dpr,
            size.backing_width,
            size.backing_height
        );
        self.animation
            .resize(&mut self.engine, size.width as f32, size.height as f32, now_sec());
    }

    /// Restart a stopped loop.
    fn kick(&mut self) {
        self.animation.start(now_sec());
    }
}

/// Handle the page shell keeps for one mounted serpent background.
///
/// When the browser has no 2D canvas context the handle is inert: every
/// method is a no-op and nothing is ever drawn.
#[wasm_bindgen]
pub struct SerpentBackground {
    inner: Option<Rc<RefCell<Background>>>,
    frame_callback: FrameCallback,
    resize_listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl SerpentBackground {
    /// Mount into the element with id `host_id`. `palette_json` uses the
    /// camelCase palette shape; omitted, the dark palette is used.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host_id: &str,
        palette_json: Option<String>,
        seed: Option<u32>,
    ) -> Result<SerpentBackground, JsValue> {
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        match mount(host_id, palette_json.as_deref(), seed, &frame_callback) {
            Ok(Some(inner)) => {
                let resize_listener = wire_resize(&inner);
                inner.borrow_mut().fit_to_host();
                log::info!("[background] attached to #{}", host_id);
                Ok(SerpentBackground {
                    inner: Some(inner),
                    frame_callback,
                    resize_listener,
                })
            }
            Ok(None) => Ok(SerpentBackground {
                inner: None,
                frame_callback,
                resize_listener: None,
            }),
            Err(e) => {
                log::error!("[background] setup failed: {:#}", e);
                Err(JsValue::from_str(&format!("{e:#}")))
            }
        }
    }

    /// Crossfade to a new palette. Invalid input is logged and ignored.
    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&self, palette_json: &str) {
        self.with(|bg| {
            let desc = match parse_palette(palette_json) {
                Ok(desc) => desc,
                Err(e) => {
                    log::warn!("[palette] ignoring unparsable palette: {:#}", e);
                    return;
                }
            };
            if let Err(e) = bg.engine.set_palette(&desc, now_sec()) {
                log::warn!("[palette] keeping previous palette: {}", e);
                return;
            }
            bg.kick();
        });
    }

    #[wasm_bindgen(js_name = setFrameMargin)]
    pub fn set_frame_margin(&self, margin_px: f64) {
        self.with(|bg| {
            bg.layers.set_frame_margin(margin_px);
            bg.fit_to_host();
        });
    }

    #[wasm_bindgen(js_name = setSerpentVisibility)]
    pub fn set_serpent_visibility(&self, visibility: f32) {
        self.with(|bg| {
            bg.engine.set_serpent_visibility(visibility);
            if bg.engine.has_visible_signal() {
                bg.kick();
            }
        });
    }

    #[wasm_bindgen(js_name = setStarVisibility)]
    pub fn set_star_visibility(&self, visibility: f32) {
        self.with(|bg| {
            let fading = bg.engine.set_star_visibility(visibility, now_sec());
            if fading || bg.engine.has_visible_signal() {
                bg.kick();
            }
        });
    }

    #[wasm_bindgen(js_name = setBackgroundOpacity)]
    pub fn set_background_opacity(&self, opacity: f32) {
        self.with(|bg| {
            bg.engine.set_background_opacity(opacity);
            if bg.engine.has_visible_signal() {
                bg.kick();
            }
        });
    }

    /// Fire a warp; `counter` must change (and be non-zero) for each new warp.
    #[wasm_bindgen(js_name = triggerStarWarp)]
    pub fn trigger_star_warp(&self, counter: u32, direction: &str, entering: bool) {
        self.with(|bg| {
            let trigger = StarWarpTrigger {
                counter,
                direction: WarpDirection::from_name(direction),
                entering,
            };
            if bg.engine.trigger_star_warp(trigger, now_sec()) {
                bg.kick();
            }
        });
    }

    #[wasm_bindgen(js_name = setPaused)]
    pub fn set_paused(&self, paused: bool) {
        self.with(|bg| bg.animation.set_paused(paused, now_sec()));
    }

    /// Re-measure the host, e.g. after a layout change the window did not report.
    pub fn resize(&self) {
        self.with(Background::fit_to_host);
    }

    /// Stop the loop, unhook listeners, and remove the layers from the page.
    /// Dropping the handle does the same; this just does it early.
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

impl Drop for SerpentBackground {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl SerpentBackground {
    /// Idempotent: every piece is taken out of its slot before release, so the
    /// browser never holds a closure that has been freed.
    fn teardown(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            if let Some(window) = web::window() {
                _ = window.remove_event_listener_with_callback(
                    "resize",
                    listener.as_ref().unchecked_ref(),
                );
            }
        }
        if let Some(inner) = self.inner.take() {
            let mut bg = inner.borrow_mut();
            bg.animation.stop();
            bg.layers.detach();
            log::info!("[background] detached");
        }
        self.frame_callback.borrow_mut().take();
    }

    fn with(&self, f: impl FnOnce(&mut Background)) {
        if let Some(inner) = &self.inner {
            f(&mut inner.borrow_mut());
        }
    }
}

/// Build the layers, engine and loop. `Ok(None)` means no 2D context.
fn mount(
    host_id: &str,
    palette_json: Option<&str>,
    seed: Option<u32>,
    frame_callback: &FrameCallback,
) -> anyhow::Result<Option<Rc<RefCell<Background>>>> {
    let (window, document) = dom::window_document()?;
    let palette = match palette_json {
        Some(json) => parse_palette(json)?,
        None => PaletteDescriptor::dark(),
    };
    let layers = Layers::attach(&document, host_id, DEFAULT_FRAME_MARGIN_PX)?;
    let ctx = match canvas::context_2d(&layers.canvas) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::warn!("[background] {:#}; animation disabled", e);
            layers.detach();
            return Ok(None);
        }
    };
    let engine = SerpentEngine::new(EngineParams {
        seed: u64::from(seed.unwrap_or(DEFAULT_SEED)),
        palette,
        ..EngineParams::default()
    })?;
    let scheduler = RafScheduler::new(window.clone(), frame_callback.clone());
    let inner = Rc::new(RefCell::new(Background {
        window,
        layers,
        engine,
        animation: AnimationLoop::new(scheduler),
        surface: CanvasSurface::new(ctx),
    }));

    let weak: Weak<RefCell<Background>> = Rc::downgrade(&inner);
    frame::install(frame_callback, move |now| {
        if let Some(bg) = weak.upgrade() {
            bg.borrow_mut().on_frame(now);
        }
    });
    Ok(Some(inner))
}

fn wire_resize(inner: &Rc<RefCell<Background>>) -> Option<Closure<dyn FnMut()>> {
    let weak = Rc::downgrade(inner);
    let listener = Closure::wrap(Box::new(move || {
        if let Some(bg) = weak.upgrade() {
            bg.borrow_mut().fit_to_host();
        }
    }) as Box<dyn FnMut()>);
    let window = web::window()?;
    match window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref()) {
        Ok(()) => Some(listener),
        Err(e) => {
            log::warn!("[dom] resize listener not installed: {:?}", e);
            None
        }
    }
}
