use nalgebra as na;
use thiserror::Error;

pub type Point2 = na::Point2<f64>;
pub type Vector2 = na::Vector2<f64>;

pub const EPSILON: f64 = 1e-6;

/// Errors raised when a geometric precondition is violated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Too few samples: requested {requested}, need at least {minimum}")]
    TooFewSamples { requested: usize, minimum: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("A turn needs one or two control points, got {0}")]
    InvalidControlPoints(usize),
}

pub type GeometryResult<T> = Result<T, GeometryError>;

pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }
}

impl ApproxEq for Point2 {
    fn approx_eq(&self, other: &Self) -> bool {
        na::distance_squared(self, other) < EPSILON * EPSILON
    }
}

impl ApproxEq for Vector2 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).norm_squared() < EPSILON * EPSILON
    }
}

pub mod segment;
pub use segment::Segment;

pub mod bounds;
pub use bounds::Bounds2;

/// Build a vector from polar coordinates (angle in radians).
pub fn from_polar(radius: f64, angle: f64) -> Vector2 {
    Vector2::new(radius * angle.cos(), radius * angle.sin())
}

/// Polar angle of a vector about the origin, in (-π, π].
pub fn polar_angle(v: &Vector2) -> f64 {
    v.y.atan2(v.x)
}

pub fn distance(p1: &Point2, p2: &Point2) -> f64 {
    na::distance(p1, p2)
}

/// Evenly spaced parameters over [0, 1], both ends included.
/// A single sample sits at 0.
pub(crate) fn linspace(count: usize) -> impl Iterator<Item = f64> {
    let steps = count.saturating_sub(1);
    (0..count).map(move |i| if steps == 0 { 0.0 } else { i as f64 / steps as f64 })
}
