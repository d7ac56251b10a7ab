//! Node model: the placeable, transformable elements on the canvas.
//!
//! A `CanvasNode` owns position, rotation, and scale; the variant payload
//! (`NodeKind`) owns content. Bounds are always derived from position, scale,
//! and content size. The only cached value is a text node's measured width,
//! which the paint pass refreshes and `set_text` invalidates.

use crate::geom::Bounds;
use crate::id::NodeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);
    pub const GREEN: Self = Self::rgba(0.0, 0.5, 0.0, 1.0);

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let bytes = hex.strip_prefix('#').unwrap_or(hex).as_bytes();
        let channel = |hi: u8, lo: u8| -> Option<f32> {
            Some((hex_val(hi)? << 4 | hex_val(lo)?) as f32 / 255.0)
        };
        match bytes.len() {
            3 => {
                let short = |c: u8| -> Option<f32> { Some((hex_val(c)? * 17) as f32 / 255.0) };
                Some(Self::rgba(
                    short(bytes[0])?,
                    short(bytes[1])?,
                    short(bytes[2])?,
                    1.0,
                ))
            }
            6 => Some(Self::rgba(
                channel(bytes[0], bytes[1])?,
                channel(bytes[2], bytes[3])?,
                channel(bytes[4], bytes[5])?,
                1.0,
            )),
            8 => Some(Self::rgba(
                channel(bytes[0], bytes[1])?,
                channel(bytes[2], bytes[3])?,
                channel(bytes[4], bytes[5])?,
                channel(bytes[6], bytes[7])?,
            )),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Font ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16, // 100..900
    /// Unscaled size in pixels; the node's `scale_y` multiplies it.
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Poppins".into(),
            weight: 700,
            size: 20.0,
        }
    }
}

// ─── Cursor ──────────────────────────────────────────────────────────────

/// CSS cursor hint reported to the host while hovering handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorStyle {
    #[default]
    Default,
    Grab,
    Pointer,
    NwseResize,
    Crosshair,
}

impl CursorStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Pointer => "pointer",
            Self::NwseResize => "nwse-resize",
            Self::Crosshair => "crosshair",
        }
    }
}

// ─── Images ──────────────────────────────────────────────────────────────

/// Opaque handle into the host's decoded-image store. The core never touches
/// pixel data; the drawing surface resolves the id at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// Raster content wrapped by an image node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub image: ImageId,
    /// Natural pixel dimensions, valid once `loaded` is true.
    pub natural_width: f64,
    pub natural_height: f64,
    /// False while the host is still decoding. An unloaded image is skipped
    /// during draw and its scale-to-fit is deferred.
    pub loaded: bool,
}

// ─── Text ────────────────────────────────────────────────────────────────

/// Line storage for a text node. Most nodes hold one or two lines.
pub type TextLines = SmallVec<[String; 2]>;

/// Text content: an ordered sequence of lines. Splitting on `\n` is the only
/// line-break rule; there is no automatic wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub lines: TextLines,
    pub font: FontSpec,
    pub color: Color,
    /// Minimum width in unscaled pixels, reserved for placeholder content so
    /// an empty node keeps a grabbable selection box.
    pub min_width: f64,
    /// Line count used for bounds while the buffer is empty.
    pub min_lines: usize,
    /// Cached max measured line width at the current scale. The paint pass
    /// refreshes it; `set_text` zeroes it.
    pub measured_width: f64,
}

impl TextContent {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
            font: FontSpec::default(),
            color: Color::BLACK,
            min_width: 0.0,
            min_lines: 0,
            measured_width: 0.0,
        }
    }

    /// Replace the whole buffer, invalidating the measured-width cache.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        self.measured_width = 0.0;
    }

    /// The buffer joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(String::is_empty)
    }

    /// Line count that bounds are computed from: the reserved minimum while
    /// the buffer is empty, the real count otherwise.
    pub fn effective_line_count(&self) -> usize {
        if self.is_empty() {
            self.min_lines
        } else {
            self.lines.len()
        }
    }
}

impl Default for TextContent {
    fn default() -> Self {
        Self::new("")
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The node variants. A shared base plus two leaves is the whole hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Text(TextContent),
    Image(ImageContent),
}

/// Recorded state at the start of a rotate gesture. The whole gesture is a
/// delta from this anchor, so per-frame error never accumulates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateAnchor {
    pub start_bearing: f64,
    pub start_rotation: f64,
}

/// Recorded state at the start of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAnchor {
    pub start_dist: f64,
    pub start_scale_x: f64,
    pub start_scale_y: f64,
}

/// A placed, transformable element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    /// Top-left of the unrotated content box, in canvas pixels.
    pub x: f64,
    pub y: f64,
    /// Radians, about the content box's center.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub kind: NodeKind,
}

impl CanvasNode {
    /// Create a text node whose content box is centered on `(x, y)`.
    pub fn text(content: &str, x: f64, y: f64) -> Self {
        let mut node = Self {
            id: NodeId::generate("text"),
            x,
            y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            kind: NodeKind::Text(TextContent::new(content)),
        };
        node.center_on_anchor();
        node
    }

    /// Create an image node whose backing image is still decoding. It draws
    /// nothing and keeps zero bounds until [`CanvasNode::image_decoded`].
    pub fn image_pending(image: ImageId, x: f64, y: f64) -> Self {
        Self {
            id: NodeId::generate("image"),
            x,
            y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            kind: NodeKind::Image(ImageContent {
                image,
                natural_width: 0.0,
                natural_height: 0.0,
                loaded: false,
            }),
        }
    }

    /// Create an image node from an already-decoded image, scaled to fit the
    /// viewport and centered on `(x, y)`.
    pub fn image(
        image: ImageId,
        natural_width: f64,
        natural_height: f64,
        x: f64,
        y: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Self {
        let mut node = Self::image_pending(image, x, y);
        node.image_decoded(natural_width, natural_height, viewport_width, viewport_height);
        node
    }

    /// One-shot decode-completion signal: records the natural size, applies
    /// the deferred scale-to-fit, and re-centers on the original anchor.
    pub fn image_decoded(
        &mut self,
        natural_width: f64,
        natural_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) {
        if let NodeKind::Image(content) = &mut self.kind {
            content.natural_width = natural_width;
            content.natural_height = natural_height;
            content.loaded = true;
            log::debug!(
                "image {} decoded: {natural_width}x{natural_height}",
                self.id
            );
            self.scale_to_fit(viewport_width, viewport_height);
        }
    }

    /// Extra margin around content when computing the *selection* box, so
    /// handles sit clear of glyphs. Content bounds are unaffected.
    pub fn transformer_padding(&self) -> f64 {
        match self.kind {
            NodeKind::Text(_) => 16.0,
            NodeKind::Image(_) => 0.0,
        }
    }

    /// Content bounds expanded symmetrically by `padding` on all sides.
    pub fn bounds(&self, padding: f64) -> Bounds {
        let (width, height) = match &self.kind {
            NodeKind::Text(text) => {
                let scaled_font = text.font.size * self.scale_y;
                let width = text.measured_width.max(text.min_width * self.scale_y);
                let height = text.effective_line_count() as f64 * scaled_font;
                (width, height)
            }
            NodeKind::Image(image) => (
                image.natural_width * self.scale_x,
                image.natural_height * self.scale_y,
            ),
        };
        Bounds::new(self.x, self.y, width, height, self.rotation).expand(padding)
    }

    /// Unpadded content bounds.
    pub fn content_bounds(&self) -> Bounds {
        self.bounds(0.0)
    }

    /// Bounds of the selection box (content + transformer padding).
    pub fn selection_bounds(&self) -> Bounds {
        self.bounds(self.transformer_padding())
    }

    /// Center of the unpadded content box, the pivot for every rotation and
    /// gesture-anchor computation.
    pub fn center(&self) -> Point {
        self.content_bounds().center()
    }

    /// Screen-space hit test against the unpadded content box.
    pub fn contains(&self, p: Point) -> bool {
        self.content_bounds().contains(p)
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Shift the node so its content box is centered on the current `(x, y)`.
    pub fn center_on_anchor(&mut self) {
        let bounds = self.content_bounds();
        self.x -= bounds.width / 2.0;
        self.y -= bounds.height / 2.0;
    }

    // ─── Gesture anchors ─────────────────────────────────────────────────

    /// Record the rotate anchor: bearing from the content center to the
    /// pointer, plus the rotation at this instant.
    pub fn begin_rotate(&self, p: Point) -> RotateAnchor {
        let c = self.center();
        RotateAnchor {
            start_bearing: (p.y - c.y).atan2(p.x - c.x),
            start_rotation: self.rotation,
        }
    }

    /// Absolute-from-anchor update: only the bearing delta since gesture
    /// start matters, which is quadrant-safe under `atan2` without any angle
    /// normalization.
    pub fn update_rotate(&mut self, anchor: RotateAnchor, p: Point) {
        let c = self.center();
        let bearing = (p.y - c.y).atan2(p.x - c.x);
        self.rotation = anchor.start_rotation + (bearing - anchor.start_bearing);
    }

    /// Record the resize anchor: distance from the content center to the
    /// pointer, plus both scale factors at this instant.
    pub fn begin_resize(&self, p: Point) -> ResizeAnchor {
        let c = self.center();
        ResizeAnchor {
            start_dist: (p - c).hypot(),
            start_scale_x: self.scale_x,
            start_scale_y: self.scale_y,
        }
    }

    /// Uniform radial resize: one distance ratio drives both axes. A zero
    /// anchor distance freezes the scale instead of dividing by zero.
    pub fn update_resize(&mut self, anchor: ResizeAnchor, p: Point) {
        if anchor.start_dist == 0.0 {
            return;
        }
        let c = self.center();
        let factor = (p - c).hypot() / anchor.start_dist;
        self.scale_x = anchor.start_scale_x * factor;
        self.scale_y = anchor.start_scale_y * factor;
    }

    /// Shrink (never enlarge) so the image fits within the viewport,
    /// preserving aspect ratio, then re-center on the original anchor.
    pub fn scale_to_fit(&mut self, viewport_width: f64, viewport_height: f64) {
        if let NodeKind::Image(content) = &self.kind {
            if !content.loaded {
                return;
            }
            if content.natural_width > viewport_width || content.natural_height > viewport_height {
                let image_ratio = content.natural_width / content.natural_height;
                let viewport_ratio = viewport_width / viewport_height;
                let factor = if image_ratio > viewport_ratio {
                    viewport_width / content.natural_width
                } else {
                    viewport_height / content.natural_height
                };
                self.scale_x = factor;
                self.scale_y = factor;
            }
            self.center_on_anchor();
        }
    }

    // ─── Variant accessors ───────────────────────────────────────────────

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Image(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.kind {
            NodeKind::Image(i) => Some(i),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}
