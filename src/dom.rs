use crate::constants::{CANVAS_CLASS, CONTAINER_CLASS, FRAME_BORDER_PX, FRAME_CLASS};
use crate::sizing::{canvas_size, frame_inset, CanvasSize};
use anyhow::{anyhow, Context};
use serpent_core::Chrome;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> anyhow::Result<(web::Window, web::Document)> {
    let window = web::window().context("no window")?;
    let document = window.document().context("no document")?;
    Ok((window, document))
}

/// The three stacked layers the background lives in:
/// container (palette background) > frame (bordered, inset) > canvas.
pub struct Layers {
    pub container: web::HtmlElement,
    pub frame: web::HtmlElement,
    pub canvas: web::HtmlCanvasElement,
}

fn create<T: JsCast>(document: &web::Document, tag: &str) -> anyhow::Result<T> {
    document
        .create_element(tag)
        .map_err(|e| anyhow!("create <{tag}>: {e:?}"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("<{tag}> has an unexpected element type"))
}

fn set_styles(el: &web::HtmlElement, styles: &[(&str, &str)]) {
    let style = el.style();
    for (name, value) in styles {
        _ = style.set_property(name, value);
    }
}

impl Layers {
    /// Build the layers and append them to the element with id `host_id`.
    pub fn attach(document: &web::Document, host_id: &str, margin_px: f64) -> anyhow::Result<Self> {
        let host = document
            .get_element_by_id(host_id)
            .with_context(|| format!("missing #{host_id}"))?;

        let container: web::HtmlElement = create(document, "div")?;
        container.set_class_name(CONTAINER_CLASS);
        _ = container.set_attribute("aria-hidden", "true");
        set_styles(
            &container,
            &[
                ("position", "absolute"),
                ("inset", "0"),
                ("pointer-events", "none"),
            ],
        );

        let frame: web::HtmlElement = create(document, "div")?;
        frame.set_class_name(FRAME_CLASS);
        let border = format!("{FRAME_BORDER_PX}px solid transparent");
        set_styles(
            &frame,
            &[
                ("position", "absolute"),
                ("border-radius", "0"),
                ("background", "transparent"),
                ("border", border.as_str()),
                ("box-shadow", "none"),
                ("overflow", "hidden"),
            ],
        );

        let canvas: web::HtmlCanvasElement = create(document, "canvas")?;
        canvas.set_class_name(CANVAS_CLASS);
        set_styles(
            &canvas,
            &[("width", "100%"), ("height", "100%"), ("display", "block")],
        );

        frame
            .append_child(&canvas)
            .map_err(|e| anyhow!("append canvas: {e:?}"))?;
        container
            .append_child(&frame)
            .map_err(|e| anyhow!("append frame: {e:?}"))?;
        host.append_child(&container)
            .map_err(|e| anyhow!("append container: {e:?}"))?;

        let layers = Self {
            container,
            frame,
            canvas,
        };
        layers.set_frame_margin(margin_px);
        Ok(layers)
    }

    pub fn set_frame_margin(&self, margin_px: f64) {
        _ = self.frame.style().set_property("inset", &frame_inset(margin_px));
    }

    /// Size of the canvas's parent (the frame) at the current device pixel ratio.
    pub fn measure(&self, window: &web::Window) -> CanvasSize {
        let rect = self.frame.get_bounding_client_rect();
        canvas_size(rect.width(), rect.height(), window.device_pixel_ratio())
    }

    /// Resize the backing store and pin the CSS size to the logical size.
    pub fn apply_size(&self, size: &CanvasSize) {
        self.canvas.set_width(size.backing_width);
        self.canvas.set_height(size.backing_height);
        let width = format!("{}px", size.width);
        let height = format!("{}px", size.height);
        set_styles(
            &self.canvas,
            &[("width", width.as_str()), ("height", height.as_str())],
        );
    }

    /// Keep the non-canvas chrome in step with the interpolated palette.
    pub fn apply_chrome(&self, chrome: &Chrome) {
        _ = self
            .container
            .style()
            .set_property("background", &chrome.container_background);
        _ = self
            .frame
            .style()
            .set_property("border-color", &chrome.frame_border);
    }

    pub fn detach(&self) {
        self.container.remove();
    }
}
