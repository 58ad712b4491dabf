/// bit3d Web - draws bit3d scenes onto an HTML canvas
///
/// The canvas origin is moved to its center, matching the coordinate
/// space primitives project into.
use std::sync::OnceLock;

use bit3d_core::{Bit3dError, Color, Demo, DragTracker, DrawOrder, Paint, Scene, Surface};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Route panics and log output to the browser console. Only the first call
/// installs anything; returns whether this call did.
pub fn init_logging_once() -> bool {
    static INIT: OnceLock<()> = OnceLock::new();
    let mut installed = false;
    INIT.get_or_init(|| {
        installed = true;
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            let _ = wasm_logger::init(wasm_logger::Config::default());
        }
    });
    installed
}

#[wasm_bindgen(start)]
pub fn start() {
    init_logging_once();
}

fn to_js(err: Bit3dError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn log_failure(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        warn!(op, error = ?err, "canvas call failed");
    }
}

/// [`Surface`] over a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_id(canvas_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{canvas_id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("`{canvas_id}` is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { canvas, context })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for CanvasSurface {
    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.context.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.context.line_to(x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        let result = self.context.arc(
            x as f64,
            y as f64,
            radius.max(0.0) as f64,
            start_angle as f64,
            end_angle as f64,
        );
        log_failure("arc", result);
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn set_fill(&mut self, paint: Paint) {
        match paint {
            Paint::Solid(color) => self.context.set_fill_style_str(&color.to_string()),
            Paint::Radial(gradient) => {
                let (x, y) = (gradient.x as f64, gradient.y as f64);
                let created = self
                    .context
                    .create_radial_gradient(x, y, 0.0, x, y, gradient.radius.max(0.0) as f64)
                    .and_then(|canvas_gradient| {
                        canvas_gradient.add_color_stop(0.0, &gradient.inner.to_string())?;
                        canvas_gradient.add_color_stop(1.0, &gradient.outer.to_string())?;
                        Ok(canvas_gradient)
                    });
                match created {
                    Ok(canvas_gradient) => self
                        .context
                        .set_fill_style_canvas_gradient(&canvas_gradient),
                    Err(err) => {
                        warn!(error = ?err, "radial gradient failed, using inner color");
                        self.context.set_fill_style_str(&gradient.inner.to_string());
                    }
                }
            }
        }
    }

    fn set_stroke(&mut self, color: Color) {
        self.context.set_stroke_style_str(&color.to_string());
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.context.set_global_alpha(alpha as f64);
    }

    fn clear(&mut self, color: Color) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        log_failure(
            "set_transform",
            self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
        );
        self.context.set_global_alpha(1.0);
        self.context.set_fill_style_str(&color.to_string());
        self.context.fill_rect(0.0, 0.0, width, height);
        log_failure("translate", self.context.translate(width / 2.0, height / 2.0));
    }
}

/// A scene bound to a canvas, driven from JavaScript.
#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
    surface: CanvasSurface,
    drag: DragTracker,
    degrees_per_pixel: f32,
}

#[wasm_bindgen]
impl WebScene {
    /// Bind a built-in demo (`faces`, `particles` or `cube`) to a canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, demo: &str) -> Result<WebScene, JsValue> {
        let demo: Demo = demo.parse().map_err(to_js)?;
        Self::bind(canvas_id, Scene::demo(demo))
    }

    /// Bind a scene parsed from description text to a canvas.
    pub fn from_description(canvas_id: &str, text: &str) -> Result<WebScene, JsValue> {
        let scene = Scene::from_description(text).map_err(to_js)?;
        Self::bind(canvas_id, scene)
    }

    fn bind(canvas_id: &str, scene: Scene) -> Result<WebScene, JsValue> {
        init_logging_once();
        let surface = CanvasSurface::from_id(canvas_id)?;
        debug!(canvas_id, primitives = scene.len(), "scene bound to canvas");
        Ok(WebScene {
            scene,
            surface,
            drag: DragTracker::new(),
            degrees_per_pixel: 0.5,
        })
    }

    /// Advance one tick and draw; call from `requestAnimationFrame`.
    pub fn frame(&mut self) {
        self.scene.frame(&mut self.surface);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag.press(x, y);
    }

    /// Rotates the camera while a drag is active and repaints.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self
            .drag
            .drag_camera(&mut self.scene.camera, x, y, self.degrees_per_pixel)
        {
            self.scene.redraw(&mut self.surface);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.release();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.scene.redraw(&mut self.surface);
    }

    pub fn set_depth_sort(&mut self, enabled: bool) {
        self.scene.options.draw_order = if enabled {
            DrawOrder::DepthSorted
        } else {
            DrawOrder::Insertion
        };
    }

    pub fn set_drag_sensitivity(&mut self, degrees_per_pixel: f32) {
        self.degrees_per_pixel = degrees_per_pixel;
    }

    pub fn tick(&self) -> u64 {
        self.scene.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_installs_once() {
        init_logging_once();
        assert!(!init_logging_once());
        start();
        assert!(!init_logging_once());
    }
}
