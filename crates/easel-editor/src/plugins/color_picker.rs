//! Swatch-row recoloring for the active text node.
//!
//! Renders a row of color circles just below the node's padded selection
//! box, rotated with it, and intercepts pointer-downs on a swatch in the
//! capture phase, so a pick never falls through to hit-testing.

use crate::editor::Editor;
use crate::input::Modifiers;
use crate::plugin::{EditorAction, EditorPlugin, PointerReply};
use easel_core::{Bounds, CanvasNode, Color, to_local};
use easel_render::Surface;
use kurbo::Point;

const HIGHLIGHT_RING: Color = Color::WHITE;

pub struct ColorPickerPlugin {
    colors: Vec<Color>,
    circle_radius: f64,
    spacing: f64,
    x_offset: f64,
    y_offset: f64,
}

impl ColorPickerPlugin {
    pub fn new() -> Self {
        Self::with_colors(vec![
            Color::BLACK,
            Color::WHITE,
            Color::RED,
            Color::BLUE,
            Color::GREEN,
        ])
    }

    pub fn with_colors(colors: Vec<Color>) -> Self {
        Self {
            colors,
            circle_radius: 8.0,
            spacing: 12.0,
            x_offset: 8.0,
            y_offset: 16.0,
        }
    }

    /// Local-frame center of swatch `index`, laid out in a row below the
    /// padded selection box.
    fn swatch_center(&self, index: usize, bounds: &Bounds) -> Point {
        Point::new(
            bounds.x + self.x_offset + index as f64 * (self.circle_radius * 2.0 + self.spacing),
            bounds.y + bounds.height + self.y_offset,
        )
    }

    fn active_text_node<'a>(&self, editor: &'a Editor) -> Option<&'a CanvasNode> {
        editor.active_node().filter(|node| node.is_text())
    }
}

impl Default for ColorPickerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorPlugin for ColorPickerPlugin {
    fn name(&self) -> &'static str {
        "color-picker"
    }

    fn on_pointer_down(&mut self, p: Point, _mods: Modifiers, editor: &Editor) -> PointerReply {
        let Some(node) = self.active_text_node(editor) else {
            return PointerReply::pass();
        };
        let bounds = node.selection_bounds();
        let local = to_local(p, bounds.center(), bounds.rotation);

        for (index, &color) in self.colors.iter().enumerate() {
            if local.distance(self.swatch_center(index, &bounds)) <= self.circle_radius {
                return PointerReply::consume(vec![EditorAction::SetTextColor {
                    id: node.id,
                    color,
                }]);
            }
        }
        PointerReply::pass()
    }

    fn on_render(&mut self, surface: &mut dyn Surface, editor: &Editor) -> Vec<EditorAction> {
        let Some(node) = self.active_text_node(editor) else {
            return Vec::new();
        };
        let current = node.as_text().map(|t| t.color);
        let bounds = node.selection_bounds();
        let center = bounds.center();

        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(bounds.rotation);
        surface.translate(-center.x, -center.y);

        for (index, &color) in self.colors.iter().enumerate() {
            let at = self.swatch_center(index, &bounds);
            if current == Some(color) {
                surface.stroke_circle(at, self.circle_radius + 3.0, HIGHLIGHT_RING, 2.0);
            }
            surface.fill_circle(at, self.circle_radius, color);
        }

        surface.restore();
        Vec::new()
    }
}
