use serpent_core::{FrameHandle, FrameScheduler};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Shared slot for the per-frame callback; filled once the owner exists.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`FrameScheduler`] over `requestAnimationFrame`.
pub struct RafScheduler {
    window: web::Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: web::Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let slot = self.callback.borrow();
        let closure = slot.as_ref()?;
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::warn!("[frame] requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        _ = self.window.cancel_animation_frame(handle.0);
    }
}

/// Install `on_frame` as the callback every requested frame runs.
///
/// The closure is owned by the shared slot, so it lives until the slot is
/// cleared at teardown.
pub fn install(callback: &FrameCallback, mut on_frame: impl FnMut(f64) + 'static) {
    let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
        on_frame(timestamp_ms * 0.001);
    }) as Box<dyn FnMut(f64)>);
    *callback.borrow_mut() = Some(closure);
}
