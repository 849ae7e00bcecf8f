use crate::geometry::{linspace, GeometryError, GeometryResult, Point2};
use serde::{Deserialize, Serialize};

/// Linear piece of the centerline. Endpoints stay mutable so the generator
/// can trim them when neighbouring turns are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Straight {
    pub start: Point2,
    pub end: Point2,
}

impl Straight {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Point at `ratio` along the straight. Not clamped: values outside
    /// [0, 1] extrapolate past the endpoints.
    pub fn interpolate(&self, ratio: f64) -> Point2 {
        Point2::new(
            (1.0 - ratio) * self.start.x + ratio * self.end.x,
            (1.0 - ratio) * self.start.y + ratio * self.end.y,
        )
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// `count` evenly spaced points from start to end inclusive.
    pub fn sample(&self, count: usize) -> GeometryResult<Vec<Point2>> {
        if count < 1 {
            return Err(GeometryError::TooFewSamples { requested: count, minimum: 1 });
        }
        Ok(linspace(count).map(|t| self.interpolate(t)).collect())
    }
}
