//! Node painting through the [`Surface`] contract.
//!
//! Text and image nodes both render about their content-box center:
//! translate to the center, rotate, then draw in the unrotated local frame.
//! This matches the pivot used by hit testing, so what you see is what you
//! grab.

use crate::surface::Surface;
use easel_core::{CanvasNode, ImageId, NodeKind};
use kurbo::{Point, Rect};

/// Paint every node, back to front (insertion order).
pub fn draw_nodes(surface: &mut dyn Surface, nodes: &mut [CanvasNode]) {
    for node in nodes {
        draw_node(surface, node);
    }
}

/// Paint one node. Text nodes refresh their measured-width cache here:
/// measurement needs the surface, and paint is the one place that always
/// has it.
pub fn draw_node(surface: &mut dyn Surface, node: &mut CanvasNode) {
    let (x, y, rotation, scale_x, scale_y) =
        (node.x, node.y, node.rotation, node.scale_x, node.scale_y);
    match &mut node.kind {
        NodeKind::Text(text) => {
            let scaled_size = text.font.size * scale_y;

            // Widest line (or the reserved minimum) at the current scale.
            let mut width = text.min_width * scale_y;
            for line in &text.lines {
                width = width.max(surface.measure_text(line, &text.font, scaled_size));
            }
            text.measured_width = width;

            let block_height = scaled_size * text.lines.len() as f64;
            let cx = x + width / 2.0;
            let cy = y + block_height / 2.0;

            surface.save();
            surface.translate(cx, cy);
            surface.rotate(rotation);
            surface.translate(-width / 2.0, -block_height / 2.0);

            for (i, line) in text.lines.iter().enumerate() {
                let line_width = surface.measure_text(line, &text.font, scaled_size);
                let offset_x = (width - line_width) / 2.0; // center each line
                surface.fill_text(
                    line,
                    Point::new(offset_x, i as f64 * scaled_size),
                    &text.font,
                    scaled_size,
                    text.color,
                );
            }

            surface.restore();
        }
        NodeKind::Image(image) => {
            // Still decoding: draw nothing, no placeholder.
            if !image.loaded {
                log::trace!("image {} not decoded yet, skipped", node.id);
                return;
            }

            let bounds =
                Rect::new(x, y, x + image.natural_width * scale_x, y + image.natural_height * scale_y);
            let center = bounds.center();

            surface.save();
            surface.translate(center.x, center.y);
            surface.rotate(rotation);
            surface.scale(scale_x, scale_y);
            surface.draw_image(
                image.image,
                Rect::new(
                    -image.natural_width / 2.0,
                    -image.natural_height / 2.0,
                    image.natural_width / 2.0,
                    image.natural_height / 2.0,
                ),
            );
            surface.restore();
        }
    }
}

// ─── Background cover fit ────────────────────────────────────────────────

/// Destination rect for an aspect-fill ("cover") blit of a
/// `natural_width` × `natural_height` image into a viewport: the image
/// covers the whole viewport, centered, overflow cropped by the canvas edge.
pub fn cover_rect(
    natural_width: f64,
    natural_height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> Rect {
    let image_ratio = natural_width / natural_height;
    let viewport_ratio = viewport_width / viewport_height;

    let (draw_width, draw_height) = if image_ratio > viewport_ratio {
        (viewport_height * image_ratio, viewport_height)
    } else {
        (viewport_width, viewport_width / image_ratio)
    };
    let offset_x = (viewport_width - draw_width) / 2.0;
    let offset_y = (viewport_height - draw_height) / 2.0;
    Rect::new(offset_x, offset_y, offset_x + draw_width, offset_y + draw_height)
}

/// Draw a background image cover-fit across the whole surface.
pub fn draw_cover_image(
    surface: &mut dyn Surface,
    image: ImageId,
    natural_width: f64,
    natural_height: f64,
) {
    let dest = cover_rect(natural_width, natural_height, surface.width(), surface.height());
    surface.draw_image(image, dest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cover_fit_wide_image_matches_height() {
        // 2:1 image into a 1:1 viewport: height matches, width overflows.
        let rect = cover_rect(200.0, 100.0, 100.0, 100.0);
        assert_eq!(rect.height(), 100.0);
        assert_eq!(rect.width(), 200.0);
        assert_eq!(rect.x0, -50.0);
        assert_eq!(rect.y0, 0.0);
    }

    #[test]
    fn cover_fit_tall_image_matches_width() {
        let rect = cover_rect(100.0, 200.0, 100.0, 100.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 200.0);
        assert_eq!(rect.x0, 0.0);
        assert_eq!(rect.y0, -50.0);
    }

    #[test]
    fn cover_fit_exact_ratio_fills_exactly() {
        let rect = cover_rect(1600.0, 1200.0, 800.0, 600.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, 800.0, 600.0));
    }
}
