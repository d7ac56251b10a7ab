//! Pure 2D transform helpers shared by hit testing and chrome drawing.
//!
//! All rotation in the editor happens about a bounding box's own center,
//! never the canvas origin. Hit testing is "localize then AABB-test": a
//! screen-space point is rotated by the negative node rotation about that
//! center, then compared against the unrotated rectangle. Handle placement
//! uses the same pivot with the positive rotation, so the two directions
//! always agree.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Rotate `p` about `pivot` by `angle` radians (counter-clockwise in a
/// y-down canvas frame).
pub fn rotate_about(p: Point, pivot: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(pivot.x + cos * dx - sin * dy, pivot.y + sin * dx + cos * dy)
}

/// Map a screen-space point into a box's unrotated local frame.
pub fn to_local(p: Point, center: Point, rotation: f64) -> Point {
    rotate_about(p, center, -rotation)
}

/// An axis-aligned box in canvas pixels, plus the rotation applied about its
/// center when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Radians, about `center()`.
    pub rotation: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow symmetrically by `padding` on all four sides. Rotation passes
    /// through unchanged.
    pub fn expand(&self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
            rotation: self.rotation,
        }
    }

    /// AABB test in the box's own unrotated frame.
    pub fn contains_local(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Screen-space containment: localize about the center, then AABB-test.
    pub fn contains(&self, p: Point) -> bool {
        self.contains_local(to_local(p, self.center(), self.rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    const EPS: f64 = 1e-9;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn rotate_quarter_turn() {
        let pivot = Point::new(10.0, 10.0);
        let p = Point::new(20.0, 10.0);
        let r = rotate_about(p, pivot, FRAC_PI_2);
        assert!(approx(r, Point::new(10.0, 20.0)), "got {r:?}");
    }

    #[test]
    fn rotate_about_self_is_identity() {
        let pivot = Point::new(3.0, -4.0);
        assert!(approx(rotate_about(pivot, pivot, 1.234), pivot));
    }

    #[test]
    fn localize_inverts_rotation_across_full_circle() {
        // A boundary point rotated into screen space must localize back to
        // itself, for rotations sampled across [0, 2π).
        let bounds = Bounds::new(40.0, 60.0, 120.0, 80.0, 0.0);
        let center = bounds.center();
        let corner = Point::new(bounds.x + bounds.width, bounds.y);

        let mut angle = 0.0;
        while angle < TAU {
            let world = rotate_about(corner, center, angle);
            let local = to_local(world, center, angle);
            assert!(
                approx(local, corner),
                "angle {angle}: {local:?} != {corner:?}"
            );
            angle += TAU / 48.0;
        }
    }

    #[test]
    fn contains_center_regardless_of_rotation() {
        let mut angle = 0.0;
        while angle < TAU {
            let bounds = Bounds::new(5.0, 5.0, 30.0, 12.0, angle);
            assert!(bounds.contains(bounds.center()), "angle {angle}");
            angle += TAU / 16.0;
        }
    }

    #[test]
    fn contains_rejects_far_points() {
        let bounds = Bounds::new(0.0, 0.0, 50.0, 20.0, PI / 3.0);
        let far = Point::new(
            bounds.x + bounds.width + bounds.height + 50.0,
            bounds.y + bounds.width + bounds.height + 50.0,
        );
        assert!(!bounds.contains(far));
    }

    #[test]
    fn expand_is_symmetric_and_keeps_rotation() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 40.0, 0.7);
        let padded = bounds.expand(16.0);
        assert_eq!(padded.x, -6.0);
        assert_eq!(padded.y, 4.0);
        assert_eq!(padded.width, 132.0);
        assert_eq!(padded.height, 72.0);
        assert_eq!(padded.rotation, 0.7);
        // Padding must not move the center.
        assert!(approx(padded.center(), bounds.center()));
    }
}
