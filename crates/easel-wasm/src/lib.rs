//! WASM bridge for Easel: exposes the editor engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page forwards DOM
//! events with primitive arguments, drives the render loop from
//! `requestAnimationFrame` while [`EaselCanvas::render`] returns true, and
//! runs a ~500 ms interval calling [`EaselCanvas::blink_tick`] while
//! [`EaselCanvas::wants_blink_timer`] says so.

mod surface2d;

use easel_core::{HandleKind, ImageId, NodeId, NodeKind};
use easel_editor::plugins::{ColorPickerPlugin, TextEditPlugin};
use easel_editor::{Editor, KeyInput, Modifiers};
use kurbo::Point;
use surface2d::{Canvas2dSurface, ImageStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// Which background slot a still-decoding image is destined for.
enum LayerSlot {
    Background,
    Placeholder,
}

/// The main WASM-facing canvas controller.
///
/// Owns the editor, the 2D context, and the image store. All interaction
/// from the page goes through this struct.
#[wasm_bindgen]
pub struct EaselCanvas {
    editor: Editor,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: ImageStore,
    /// Backgrounds whose images were still decoding when set.
    pending_layers: Vec<(ImageId, LayerSlot)>,
}

#[wasm_bindgen]
impl EaselCanvas {
    /// Create a controller bound to a `<canvas>` element.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<EaselCanvas, JsValue> {
        console_error_panic_hook_setup();

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let editor = Editor::new(f64::from(canvas.width()), f64::from(canvas.height()));
        log::debug!("easel canvas {}x{}", canvas.width(), canvas.height());

        Ok(Self {
            editor,
            canvas,
            ctx,
            images: ImageStore::default(),
            pending_layers: Vec::new(),
        })
    }

    /// Compose the text-editing behavior onto the editor.
    /// Plugins run in installation order (first installed = first served).
    pub fn enable_text_editing(&mut self) {
        self.editor.install(Box::new(TextEditPlugin::new()));
    }

    /// Compose the color-picker behavior onto the editor.
    pub fn enable_color_picker(&mut self) {
        self.editor.install(Box::new(ColorPickerPlugin::new()));
    }

    // ─── Node management ─────────────────────────────────────────────────

    /// Add a text node centered on the canvas. Returns its id.
    pub fn add_text(&mut self, text: &str) -> String {
        self.editor.add_text(text).to_string()
    }

    /// Add an image node centered on the canvas. A still-decoding image is
    /// added immediately and picks up its size (and scale-to-fit) once the
    /// browser finishes decoding. Returns the node id.
    pub fn add_image(&mut self, image: &HtmlImageElement) -> String {
        let decoded = decoded_size(image);
        let id = self.images.register(image.clone());
        self.editor.add_image(id, decoded).to_string()
    }

    /// Remove a node by id. Unknown ids are a no-op.
    pub fn remove_node(&mut self, id: &str) {
        self.editor.remove_node(NodeId::intern(id));
    }

    /// Clear all nodes and the background.
    pub fn reset(&mut self) {
        self.editor.reset();
    }

    /// The node list as JSON (id, kind, transform), for host-side panels.
    pub fn nodes_json(&self) -> String {
        serde_json::to_string(self.editor.nodes()).unwrap_or_else(|_| "[]".into())
    }

    // ─── Background layer ────────────────────────────────────────────────

    pub fn set_background_image(&mut self, image: &HtmlImageElement) {
        let decoded = decoded_size(image);
        let id = self.images.register(image.clone());
        match decoded {
            Some((w, h)) => self.editor.set_background_image(id, w, h),
            None => self.pending_layers.push((id, LayerSlot::Background)),
        }
    }

    /// Placeholder artwork shown until the first node is added.
    pub fn set_placeholder_image(&mut self, image: &HtmlImageElement) {
        let decoded = decoded_size(image);
        let id = self.images.register(image.clone());
        match decoded {
            Some((w, h)) => self.editor.set_placeholder_image(id, w, h),
            None => self.pending_layers.push((id, LayerSlot::Placeholder)),
        }
    }

    // ─── Handle configuration ────────────────────────────────────────────

    /// Register an icon drawn inside a handle circle.
    /// `kind` is one of `translate`, `delete`, `resize`, `rotate`.
    pub fn set_handle_icon(&mut self, kind: &str, image: &HtmlImageElement) {
        if let Some(kind) = parse_handle_kind(kind) {
            let id = self.images.register(image.clone());
            self.editor.set_handle_icon(kind, id);
        }
    }

    /// Restrict the shown handles, comma-separated in priority order
    /// (e.g. `"translate,delete,resize"` to drop rotation).
    pub fn set_active_handles(&mut self, kinds: &str) {
        let handles: Vec<HandleKind> = kinds
            .split(',')
            .filter_map(|k| parse_handle_kind(k.trim()))
            .collect();
        self.editor.set_active_handles(handles);
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Pointer down, in canvas-local pixels. Returns true if a redraw is
    /// needed.
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.editor.on_pointer_down(Point::new(x, y), mods)
    }

    /// Pointer move. Applies cursor feedback to the canvas element; returns
    /// true if a redraw is needed.
    pub fn pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        let outcome = self.editor.on_pointer_move(Point::new(x, y), mods);
        if let Some(cursor) = outcome.cursor_change {
            let _ = self.canvas.style().set_property("cursor", cursor.as_css());
        }
        outcome.needs_render
    }

    pub fn pointer_up(&mut self) {
        self.editor.on_pointer_up();
    }

    /// Key down with the DOM `KeyboardEvent.key` value. Returns true if the
    /// key was handled (the page should `preventDefault`).
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let Some(key) = KeyInput::from_dom_key(key) else {
            return false;
        };
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.editor.on_key(key, mods)
    }

    /// Clipboard paste into the active edit session.
    pub fn paste(&mut self, text: &str) -> bool {
        self.editor.on_paste(text)
    }

    /// Caret blink tick; the page runs this on a fixed interval while
    /// [`EaselCanvas::wants_blink_timer`] is true. Returns true if a redraw
    /// is needed.
    pub fn blink_tick(&mut self) -> bool {
        self.editor.blink_tick()
    }

    /// Whether the blink interval should be running. Check after every
    /// event so the timer stops the moment editing ends.
    pub fn wants_blink_timer(&self) -> bool {
        self.editor.wants_blink_timer()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Draw one frame. Returns true while a node is selected, meaning the
    /// page should schedule another frame via `requestAnimationFrame`.
    pub fn render(&mut self) -> bool {
        self.sync_decoded_images();
        let mut surface = Canvas2dSurface::new(
            &self.ctx,
            &self.images,
            self.editor.width(),
            self.editor.height(),
        );
        self.editor.render(&mut surface)
    }

    /// Draw without selection chrome, for export. The page encodes the
    /// canvas afterwards (e.g. `toDataURL("image/png")`).
    pub fn render_for_export(&mut self) {
        self.sync_decoded_images();
        let mut surface = Canvas2dSurface::new(
            &self.ctx,
            &self.images,
            self.editor.width(),
            self.editor.height(),
        );
        self.editor.render_for_export(&mut surface);
    }

    /// Track a resized canvas element.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.editor.resize(width, height);
    }
}

impl EaselCanvas {
    /// Forward decode completions into the editor: image nodes that were
    /// added before their element finished decoding, plus pending
    /// background layers.
    fn sync_decoded_images(&mut self) {
        let mut decoded: Vec<(ImageId, f64, f64)> = Vec::new();
        for node in self.editor.nodes() {
            if let NodeKind::Image(content) = &node.kind
                && !content.loaded
                && let Some((w, h)) = self.images.get(content.image).and_then(decoded_size)
            {
                decoded.push((content.image, w, h));
            }
        }
        for (image, w, h) in decoded {
            self.editor.image_decoded(image, w, h);
        }

        let still_pending = std::mem::take(&mut self.pending_layers);
        for (image, slot) in still_pending {
            match self.images.get(image).and_then(decoded_size) {
                Some((w, h)) => match slot {
                    LayerSlot::Background => self.editor.set_background_image(image, w, h),
                    LayerSlot::Placeholder => self.editor.set_placeholder_image(image, w, h),
                },
                None => self.pending_layers.push((image, slot)),
            }
        }
    }
}

/// Natural size of a decoded element, `None` while decoding.
fn decoded_size(image: &HtmlImageElement) -> Option<(f64, f64)> {
    (image.complete() && image.natural_width() > 0)
        .then(|| (f64::from(image.natural_width()), f64::from(image.natural_height())))
}

fn parse_handle_kind(kind: &str) -> Option<HandleKind> {
    match kind {
        "translate" => Some(HandleKind::Translate),
        "delete" => Some(HandleKind::Delete),
        "resize" => Some(HandleKind::Resize),
        "rotate" => Some(HandleKind::Rotate),
        _ => None,
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Easel WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
