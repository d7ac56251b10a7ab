//! Selection chrome: the transformer box and its corner handles.
//!
//! Drawn for the active node only, after all content and plugin overlays.
//! The box is the node's *padded* selection bounds; every handle is placed
//! on that box's unit-square anchor and rotated with the node.

use crate::surface::Surface;
use easel_core::{CanvasNode, Color, HandleKind, ImageId};
use kurbo::{Point, Rect};

const BOX_STROKE: Color = Color::rgba(0.5, 0.0, 0.5, 1.0);
const BOX_LINE_WIDTH: f64 = 2.0;
const HANDLE_FILL: Color = Color::rgba(1.0, 1.0, 1.0, 0.9);
const HANDLE_RING: Color = Color::rgba(0.6, 0.6, 0.6, 1.0);

/// Optional icon images drawn inside handle circles, registered by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandleIcons {
    icons: [Option<ImageId>; 4],
}

impl HandleIcons {
    pub fn set(&mut self, kind: HandleKind, image: ImageId) {
        self.icons[slot(kind)] = Some(image);
    }

    pub fn get(&self, kind: HandleKind) -> Option<ImageId> {
        self.icons[slot(kind)]
    }
}

fn slot(kind: HandleKind) -> usize {
    match kind {
        HandleKind::Translate => 0,
        HandleKind::Delete => 1,
        HandleKind::Resize => 2,
        HandleKind::Rotate => 3,
    }
}

/// Draw the bounding box + handles for the active node.
pub fn draw_transformer(
    surface: &mut dyn Surface,
    node: &CanvasNode,
    active: &[HandleKind],
    icons: &HandleIcons,
) {
    let bounds = node.selection_bounds();
    let center = bounds.center();

    surface.save();
    surface.translate(center.x, center.y);
    surface.rotate(bounds.rotation);
    surface.translate(-center.x, -center.y);
    surface.stroke_rect(
        Rect::new(bounds.x, bounds.y, bounds.x + bounds.width, bounds.y + bounds.height),
        BOX_STROKE,
        BOX_LINE_WIDTH,
    );
    surface.restore();

    for &kind in active {
        draw_handle(
            surface,
            kind.anchor_on(&bounds),
            kind.config().radius,
            icons.get(kind),
            center,
            bounds.rotation,
        );
    }
}

/// One handle: a filled circle with a ring, plus an optional centered icon,
/// rotated into place about the selection box's center.
fn draw_handle(
    surface: &mut dyn Surface,
    at: Point,
    radius: f64,
    icon: Option<ImageId>,
    pivot: Point,
    angle: f64,
) {
    surface.save();
    surface.translate(pivot.x, pivot.y);
    surface.rotate(angle);
    surface.translate(-pivot.x, -pivot.y);

    surface.fill_circle(at, radius, HANDLE_FILL);
    surface.stroke_circle(at, radius, HANDLE_RING, 1.0);

    if let Some(icon) = icon {
        let icon_size = radius * 1.5;
        surface.draw_image(
            icon,
            Rect::new(
                at.x - icon_size / 2.0,
                at.y - icon_size / 2.0,
                at.x + icon_size / 2.0,
                at.y + icon_size / 2.0,
            ),
        );
    }

    surface.restore();
}
