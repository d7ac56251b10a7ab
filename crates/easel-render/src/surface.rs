//! The drawing-surface contract.
//!
//! The core draws through this trait and never touches a concrete backend.
//! It is shaped after an immediate-mode 2D context: a transform stack
//! (save/restore + translate/rotate/scale composition), rectangle and
//! circle primitives, image blits to an explicit destination rect, and
//! filled text with glyph-width measurement.
//!
//! `easel-wasm` implements it over `CanvasRenderingContext2d`; tests use a
//! recording mock with a deterministic text measurer.

use easel_core::{Color, FontSpec, ImageId};
use kurbo::{Point, Rect};

pub trait Surface {
    /// Canvas dimensions in pixels.
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    /// Clear a region to transparent.
    fn clear(&mut self, region: Rect);

    /// Push the current transform state.
    fn save(&mut self);
    /// Pop back to the most recently pushed transform state.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);
    /// Compose a rotation (radians) onto the current transform.
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, line_width: f64);

    /// Blit a decoded image into `dest` (current transform applies).
    /// Implementations silently skip ids they cannot resolve.
    fn draw_image(&mut self, image: ImageId, dest: Rect);

    /// Draw one line of text with its top-left corner at `origin`.
    /// `scaled_size` is the font pixel size after node scaling.
    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        scaled_size: f64,
        color: Color,
    );

    /// Measured advance width of `text` at `scaled_size`. Must agree with
    /// what [`Surface::fill_text`] would render.
    fn measure_text(&mut self, text: &str, font: &FontSpec, scaled_size: f64) -> f64;
}
