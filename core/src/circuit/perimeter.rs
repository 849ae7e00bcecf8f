//! Closed boundary polygon derived from a circuit centerline.

use crate::geometry::{Bounds2, GeometryError, GeometryResult, Point2, Segment, Vector2};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Cyclic sequence of segments forming one closed loop: each segment ends
/// where the next one (wrapping around) begins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircuitPerimeter {
    segments: Vec<Segment>,
}

impl CircuitPerimeter {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Close a ring of vertices into segments, including the edge from the
    /// last vertex back to the first.
    pub fn from_ring(points: &[Point2]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::new(points[i], points[(i + 1) % n]))
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Cyclic access: any index is taken modulo the segment count.
    pub fn segment(&self, index: isize) -> Option<&Segment> {
        if self.segments.is_empty() {
            return None;
        }
        let n = self.segments.len() as isize;
        self.segments.get(index.rem_euclid(n) as usize)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Start vertex of every segment, in order.
    pub fn points(&self) -> Vec<Point2> {
        self.segments.iter().map(Segment::a).collect()
    }

    pub fn is_closed(&self) -> bool {
        let n = self.segments.len();
        n > 0 && (0..n).all(|i| self.segments[i].b() == self.segments[(i + 1) % n].a())
    }

    pub fn perimeter_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    pub fn bounds(&self) -> Bounds2 {
        let mut bounds = Bounds2::empty();
        for s in &self.segments {
            bounds.extend(&s.a());
            bounds.extend(&s.b());
        }
        bounds
    }

    pub fn translate(&self, offset: &Vector2) -> Self {
        Self::new(self.segments.iter().map(|s| s.translated(offset)).collect())
    }

    /// Multiply every vertex by `factor`. Zero collapses the loop onto the origin.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.segments.iter().map(|s| s.scaled(factor)).collect())
    }

    pub fn divide(&self, divisor: f64) -> GeometryResult<Self> {
        if divisor == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Ok(Self::new(
            self.segments
                .iter()
                .map(|s| Segment::new(s.a() / divisor, s.b() / divisor))
                .collect(),
        ))
    }

    /// Index pairs `(i, j)`, `i < j`, of non-adjacent segments that cross.
    ///
    /// Neighbouring segments share a vertex and are skipped; touching at a
    /// vertex never counts as a crossing anyway.
    pub fn self_intersections(&self) -> Vec<(usize, usize)> {
        let n = self.segments.len();
        let mut crossings = Vec::new();
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if self.segments[i].intersects_with(&self.segments[j]) {
                    crossings.push((i, j));
                }
            }
        }
        crossings
    }
}

impl<'a> IntoIterator for &'a CircuitPerimeter {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl Add<Vector2> for &CircuitPerimeter {
    type Output = CircuitPerimeter;

    fn add(self, offset: Vector2) -> CircuitPerimeter {
        self.translate(&offset)
    }
}

impl Add<Vector2> for CircuitPerimeter {
    type Output = CircuitPerimeter;

    fn add(self, offset: Vector2) -> CircuitPerimeter {
        self.translate(&offset)
    }
}

impl Sub<Vector2> for CircuitPerimeter {
    type Output = CircuitPerimeter;

    fn sub(self, offset: Vector2) -> CircuitPerimeter {
        self.translate(&-offset)
    }
}

impl Mul<f64> for CircuitPerimeter {
    type Output = CircuitPerimeter;

    fn mul(self, factor: f64) -> CircuitPerimeter {
        self.scale(factor)
    }
}

impl Mul<CircuitPerimeter> for f64 {
    type Output = CircuitPerimeter;

    fn mul(self, perimeter: CircuitPerimeter) -> CircuitPerimeter {
        perimeter.scale(self)
    }
}
