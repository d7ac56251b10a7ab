//! Handle registry: the interactive affordances on a selection box.
//!
//! Each handle kind has a fixed anchor expressed in the unit square of the
//! node's *padded* selection bounds, a hit radius, and a cursor hint. Hit
//! testing localizes the pointer into the box's unrotated frame once, then
//! scans kinds in declared priority order, so overlapping hit circles resolve
//! deterministically to the earlier-declared kind.

use crate::geom::{self, Bounds};
use crate::model::CursorStyle;
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Translate,
    Delete,
    Resize,
    Rotate,
}

/// Geometry and affordance for one handle kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleConfig {
    /// Anchor offset in the unit square of the padded selection box:
    /// (0,0) = top-left, (1,1) = bottom-right.
    pub anchor_x: f64,
    pub anchor_y: f64,
    /// Hit radius in canvas pixels (also the drawn circle radius).
    pub radius: f64,
    pub cursor: CursorStyle,
}

impl HandleKind {
    /// Declared priority order. Hit scans and chrome drawing both iterate
    /// this list.
    pub const ALL: [Self; 4] = [Self::Translate, Self::Delete, Self::Resize, Self::Rotate];

    pub fn config(self) -> HandleConfig {
        match self {
            // The translate handle gets a larger grab target.
            Self::Translate => HandleConfig {
                anchor_x: 0.0,
                anchor_y: 0.0,
                radius: 20.0,
                cursor: CursorStyle::Grab,
            },
            Self::Delete => HandleConfig {
                anchor_x: 1.0,
                anchor_y: 0.0,
                radius: 12.0,
                cursor: CursorStyle::Pointer,
            },
            Self::Resize => HandleConfig {
                anchor_x: 1.0,
                anchor_y: 1.0,
                radius: 12.0,
                cursor: CursorStyle::NwseResize,
            },
            Self::Rotate => HandleConfig {
                anchor_x: 0.0,
                anchor_y: 1.0,
                radius: 12.0,
                cursor: CursorStyle::Crosshair,
            },
        }
    }

    /// Absolute anchor position in the box's unrotated local frame.
    pub fn anchor_on(self, bounds: &Bounds) -> Point {
        let config = self.config();
        Point::new(
            bounds.x + bounds.width * config.anchor_x,
            bounds.y + bounds.height * config.anchor_y,
        )
    }
}

/// Which of `active`, if any, is under the screen-space point `p` for a node
/// whose padded selection bounds are `bounds`. First kind within its radius
/// wins.
pub fn handle_at(bounds: &Bounds, p: Point, active: &[HandleKind]) -> Option<HandleKind> {
    let local = geom::to_local(p, bounds.center(), bounds.rotation);
    active.iter().copied().find(|kind| {
        let config = kind.config();
        local.distance(kind.anchor_on(bounds)) <= config.radius
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::f64::consts::FRAC_PI_2;

    fn bounds() -> Bounds {
        Bounds::new(100.0, 100.0, 200.0, 100.0, 0.0)
    }

    #[test]
    fn anchors_sit_on_the_four_corners() {
        let b = bounds();
        assert_eq!(HandleKind::Translate.anchor_on(&b), Point::new(100.0, 100.0));
        assert_eq!(HandleKind::Delete.anchor_on(&b), Point::new(300.0, 100.0));
        assert_eq!(HandleKind::Resize.anchor_on(&b), Point::new(300.0, 200.0));
        assert_eq!(HandleKind::Rotate.anchor_on(&b), Point::new(100.0, 200.0));
    }

    #[test]
    fn hit_inside_radius_only() {
        let b = bounds();
        let hit = handle_at(&b, Point::new(305.0, 195.0), &HandleKind::ALL);
        assert_eq!(hit, Some(HandleKind::Resize));

        let miss = handle_at(&b, Point::new(320.0, 180.0), &HandleKind::ALL);
        assert_eq!(miss, None);
    }

    #[test]
    fn overlapping_handles_resolve_in_priority_order() {
        // A box small enough that the translate and delete circles overlap:
        // a point covered by both must resolve to the earlier-declared kind.
        let b = Bounds::new(0.0, 0.0, 14.0, 14.0, 0.0);
        let midpoint_top = Point::new(7.0, 0.0);
        let translate_cfg = HandleKind::Translate.config();
        let delete_cfg = HandleKind::Delete.config();
        assert!(midpoint_top.distance(HandleKind::Translate.anchor_on(&b)) <= translate_cfg.radius);
        assert!(midpoint_top.distance(HandleKind::Delete.anchor_on(&b)) <= delete_cfg.radius);

        assert_eq!(
            handle_at(&b, midpoint_top, &HandleKind::ALL),
            Some(HandleKind::Translate)
        );
        // Scanning a reordered slice flips the winner.
        assert_eq!(
            handle_at(&b, midpoint_top, &[HandleKind::Delete, HandleKind::Translate]),
            Some(HandleKind::Delete)
        );
    }

    #[test]
    fn hit_test_follows_rotation() {
        // Quarter-turn about the center moves the top-right (delete) corner
        // to the bottom-right in screen space.
        let b = Bounds::new(100.0, 100.0, 200.0, 100.0, FRAC_PI_2);
        let world = geom::rotate_about(HandleKind::Delete.anchor_on(&b), b.center(), FRAC_PI_2);
        assert_eq!(handle_at(&b, world, &HandleKind::ALL), Some(HandleKind::Delete));

        // The unrotated corner position no longer hits.
        assert_eq!(
            handle_at(&b, Point::new(300.0, 100.0), &HandleKind::ALL),
            None
        );
    }

    #[test]
    fn restricted_active_set_ignores_disabled_kinds() {
        let b = bounds();
        let rotate_corner = Point::new(100.0, 200.0);
        let without_rotate = [HandleKind::Translate, HandleKind::Delete, HandleKind::Resize];
        assert_eq!(handle_at(&b, rotate_corner, &without_rotate), None);
    }
}
