//! Directed line segments and segment-segment intersection.

use super::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable directed segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    a: Point2,
    b: Point2,
}

impl Segment {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> Point2 {
        self.a
    }

    pub fn b(&self) -> Point2 {
        self.b
    }

    pub fn direction(&self) -> Vector2 {
        self.b - self.a
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Line parameters `(t, u)` where the supporting lines cross:
    /// `self.a + t * (self.b - self.a) == other.a + u * (other.b - other.a)`.
    ///
    /// Returns `None` when the determinant is exactly zero (parallel or
    /// collinear lines). The last step divides by `self`'s x-direction, so a
    /// perfectly vertical `self` yields non-finite `t` and never intersects.
    fn crossing_parameters(&self, other: &Segment) -> Option<(f64, f64)> {
        let v1 = self.direction();
        let v2 = other.direction();

        let denom = v1.y * v2.x - v1.x * v2.y;
        if denom == 0.0 {
            return None;
        }

        let numer = v1.x * (other.a.y - self.a.y) - v1.y * (other.a.x - self.a.x);
        let u = numer / denom;
        let t = (u * v2.x + other.a.x - self.a.x) / v1.x;
        Some((t, u))
    }

    /// True if both segments cross strictly inside their open intervals.
    /// Touching at an endpoint is not an intersection.
    pub fn intersects_with(&self, other: &Segment) -> bool {
        self.intersection(other).is_some()
    }

    pub fn intersection(&self, other: &Segment) -> Option<Point2> {
        let (t, u) = self.crossing_parameters(other)?;
        let inside = |p: f64| p > 0.0 && p < 1.0;
        if inside(t) && inside(u) {
            Some(other.a + other.direction() * u)
        } else {
            None
        }
    }

    pub fn translated(&self, offset: &Vector2) -> Self {
        Self::new(self.a + offset, self.b + offset)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.a * factor, self.b * factor)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})->({}, {})", self.a.x, self.a.y, self.b.x, self.b.y)
    }
}
