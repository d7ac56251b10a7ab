//! Canvas2D implementation of the drawing-surface contract.
//!
//! Borrows the `CanvasRenderingContext2d` and the image store per frame;
//! the controller owns both. Colors travel as hex strings, fonts as CSS
//! shorthand, exactly what the 2D context consumes.

use easel_core::{Color, FontSpec, ImageId};
use easel_render::Surface;
use kurbo::{Point, Rect};
use std::f64::consts::TAU;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Maps [`ImageId`]s to decoded `HtmlImageElement`s. Registration order is
/// the id; images are never unregistered.
#[derive(Default)]
pub struct ImageStore {
    images: Vec<HtmlImageElement>,
}

impl ImageStore {
    pub fn register(&mut self, image: HtmlImageElement) -> ImageId {
        let id = ImageId(self.images.len() as u32);
        self.images.push(image);
        id
    }

    pub fn get(&self, id: ImageId) -> Option<&HtmlImageElement> {
        self.images.get(id.0 as usize)
    }
}

pub struct Canvas2dSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    images: &'a ImageStore,
    width: f64,
    height: f64,
}

impl<'a> Canvas2dSurface<'a> {
    pub fn new(
        ctx: &'a CanvasRenderingContext2d,
        images: &'a ImageStore,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            ctx,
            images,
            width,
            height,
        }
    }

    fn set_font(&self, font: &FontSpec, scaled_size: f64) {
        self.ctx
            .set_font(&format!("{} {scaled_size}px {}", font.weight, font.family));
    }
}

impl Surface for Canvas2dSurface<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self, region: Rect) {
        self.ctx
            .clear_rect(region.x0, region.y0, region.width(), region.height());
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let _ = self.ctx.translate(dx, dy);
    }

    fn rotate(&mut self, angle: f64) {
        let _ = self.ctx.rotate(angle);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let _ = self.ctx.scale(sx, sy);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(line_width);
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, line_width: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn draw_image(&mut self, image: ImageId, dest: Rect) {
        // Unknown ids and still-decoding elements are skipped silently.
        if let Some(element) = self.images.get(image)
            && element.complete()
        {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                element,
                dest.x0,
                dest.y0,
                dest.width(),
                dest.height(),
            );
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        scaled_size: f64,
        color: Color,
    ) {
        self.set_font(font, scaled_size);
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("top");
        self.ctx.set_fill_style_str(&color.to_hex());
        let _ = self.ctx.fill_text(text, origin.x, origin.y);
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec, scaled_size: f64) -> f64 {
        self.set_font(font, scaled_size);
        self.ctx
            .measure_text(text)
            .map_or(0.0, |metrics| metrics.width())
    }
}
