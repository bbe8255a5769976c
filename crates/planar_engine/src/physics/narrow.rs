//! Narrow-phase collision predicates
//!
//! Exact overlap tests between pairs of world-space shapes, producing
//! contact normals. Normal convention: `normal_a` points away from the
//! first shape toward the second's side of contact, and vice versa.
//! Degenerate configurations (coincident centers, circle center inside
//! the rectangle) resolve to defined fallback normals instead of NaN.

use crate::foundation::math::{normalize_or, Vec2};
use crate::physics::shape::{Circle, Rect, Shape};

/// Contact normals for an overlapping shape pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing away from the first shape
    pub normal_a: Vec2,
    /// Unit normal pointing away from the second shape
    pub normal_b: Vec2,
}

impl Contact {
    /// Contact with the participants' roles swapped
    pub fn swapped(self) -> Self {
        Self {
            normal_a: self.normal_b,
            normal_b: self.normal_a,
        }
    }
}

/// Test two circles for overlap
///
/// Overlap iff the squared center distance is at most the squared sum of
/// radii. Coincident centers fall back to a (1, 0) normal.
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<Contact> {
    let ab = b.center - a.center;
    let radii_sum = a.radius + b.radius;
    if ab.magnitude_squared() > radii_sum * radii_sum {
        return None;
    }
    let normal_a = normalize_or(ab, Vec2::new(1.0, 0.0));
    Some(Contact {
        normal_a,
        normal_b: -normal_a,
    })
}

/// Test an axis-aligned rectangle against a circle
///
/// Clamped-coordinate method from Ericson, Real-Time Collision
/// Detection, 5.2.5. `normal_a` belongs to the rectangle and is derived
/// from the active clamp axes (corner contacts yield a normalized
/// diagonal); `normal_b` is the unit vector from the closest point on
/// the rectangle to the circle center, falling back to the negated
/// rectangle normal when the center lies on or inside the rectangle.
pub fn rect_circle(rect: &Rect, circle: &Circle) -> Option<Contact> {
    let mut side = Vec2::zeros();
    let mut closest = circle.center;
    if circle.center.x < rect.min.x {
        closest.x = rect.min.x;
        side.x = -1.0;
    }
    if circle.center.x > rect.max.x {
        closest.x = rect.max.x;
        side.x = 1.0;
    }
    if circle.center.y < rect.min.y {
        closest.y = rect.min.y;
        side.y = -1.0;
    }
    if circle.center.y > rect.max.y {
        closest.y = rect.max.y;
        side.y = 1.0;
    }

    let to_circle = closest - circle.center;
    if to_circle.magnitude_squared() > circle.radius * circle.radius {
        return None;
    }

    let normal_a = normalize_or(side, Vec2::new(1.0, 0.0));
    let normal_b = normalize_or(to_circle, -normal_a);
    Some(Contact { normal_a, normal_b })
}

/// Dispatch the appropriate predicate for a shape pair
///
/// Argument order is normalized internally: callers get consistent
/// results for (rect, circle) and (circle, rect), with the returned
/// normals always matching the argument order given.
///
/// The rect-rect test is not implemented; it deterministically reports
/// no collision and surfaces the gap to diagnostics.
pub fn collide(a: &Shape, b: &Shape) -> Option<Contact> {
    match (a, b) {
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(ca, cb),
        (Shape::AARect(rect), Shape::Circle(circle)) => rect_circle(rect, circle),
        (Shape::Circle(circle), Shape::AARect(rect)) => {
            rect_circle(rect, circle).map(Contact::swapped)
        }
        (Shape::AARect(_), Shape::AARect(_)) => {
            log::debug!("aarect-aarect narrow phase is not implemented; reporting no collision");
            None
        }
    }
}
