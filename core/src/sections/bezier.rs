//! Quadratic and cubic Bézier turns.
//!
//! Turns are evaluated with the Bernstein basis. Their length is only ever
//! approximated by summing chords of a sampled polyline.

use crate::geometry::{linspace, GeometryError, GeometryResult, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Number of samples used when a turn's length is needed without an explicit resolution.
pub const DEFAULT_LENGTH_SAMPLES: usize = 20;

/// Binomial coefficients for degrees 0..=3, the only ones a turn can have.
const BINOMIALS: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 0.0],
    [1.0, 2.0, 1.0, 0.0],
    [1.0, 3.0, 3.0, 1.0],
];

fn binomial(n: usize, k: usize) -> f64 {
    BINOMIALS[n][k]
}

/// Curved piece of the centerline with one (quadratic) or two (cubic) control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierTurn {
    pub start: Point2,
    control_points: Vec<Point2>,
    pub end: Point2,
}

impl BezierTurn {
    pub fn new(start: Point2, control_points: Vec<Point2>, end: Point2) -> GeometryResult<Self> {
        if control_points.is_empty() || control_points.len() > 2 {
            return Err(GeometryError::InvalidControlPoints(control_points.len()));
        }
        Ok(Self { start, control_points, end })
    }

    pub fn quadratic(start: Point2, control: Point2, end: Point2) -> Self {
        Self { start, control_points: vec![control], end }
    }

    pub fn cubic(start: Point2, first: Point2, second: Point2, end: Point2) -> Self {
        Self { start, control_points: vec![first, second], end }
    }

    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    /// Control points can be moved but never added or removed, so the degree is fixed.
    pub fn control_points_mut(&mut self) -> &mut [Point2] {
        &mut self.control_points
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() + 1
    }

    /// Evaluate the curve at parameter `t` in [0, 1].
    pub fn curve(&self, t: f64) -> Point2 {
        let d = self.degree();
        let s = 1.0 - t;

        let mut acc = self.start.coords * s.powi(d as i32);
        for (i, c) in self.control_points.iter().enumerate() {
            let i = i + 1;
            let weight = binomial(d, i) * s.powi((d - i) as i32) * t.powi(i as i32);
            acc += c.coords * weight;
        }
        acc += self.end.coords * t.powi(d as i32);
        Point2::from(acc)
    }

    /// `count` evaluations at evenly spaced parameters over [0, 1].
    pub fn sample(&self, count: usize) -> GeometryResult<Vec<Point2>> {
        if count < 2 {
            return Err(GeometryError::TooFewSamples { requested: count, minimum: 2 });
        }
        Ok(linspace(count).map(|t| self.curve(t)).collect())
    }

    /// Length of the polyline through `samples` points on the curve.
    /// Never shorter than the start-end chord.
    pub fn length(&self, samples: usize) -> GeometryResult<f64> {
        let points = self.sample(samples)?;
        Ok(points.windows(2).map(|w| (w[1] - w[0]).norm()).sum())
    }

    /// Entry tangent proxy: start towards the first control point.
    pub fn first_direction(&self) -> Vector2 {
        self.control_points[0] - self.start
    }

    /// Exit tangent proxy: last control point towards the end.
    pub fn last_direction(&self) -> Vector2 {
        self.end - self.control_points[self.control_points.len() - 1]
    }
}
