pub mod straight;
pub mod bezier;


pub use bezier::{BezierTurn, DEFAULT_LENGTH_SAMPLES};
pub use straight::Straight;

use crate::geometry::{GeometryResult, Point2};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Straight,
    BezierTurn,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Straight => "Straight",
            Self::BezierTurn => "BezierTurn",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of a circuit centerline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Section {
    Straight(Straight),
    Turn(BezierTurn),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Straight(_) => SectionKind::Straight,
            Self::Turn(_) => SectionKind::BezierTurn,
        }
    }

    pub fn start(&self) -> Point2 {
        match self {
            Self::Straight(s) => s.start,
            Self::Turn(t) => t.start,
        }
    }

    pub fn end(&self) -> Point2 {
        match self {
            Self::Straight(s) => s.end,
            Self::Turn(t) => t.end,
        }
    }

    /// Exact for straights; turns use `samples` points along the curve.
    pub fn length(&self, samples: usize) -> GeometryResult<f64> {
        match self {
            Self::Straight(s) => Ok(s.length()),
            Self::Turn(t) => t.length(samples),
        }
    }

    pub fn sample(&self, count: usize) -> GeometryResult<Vec<Point2>> {
        match self {
            Self::Straight(s) => s.sample(count),
            Self::Turn(t) => t.sample(count),
        }
    }

    /// Start, control points and end, in order.
    pub fn points(&self) -> Vec<Point2> {
        match self {
            Self::Straight(s) => vec![s.start, s.end],
            Self::Turn(t) => {
                let mut pts = Vec::with_capacity(t.control_points().len() + 2);
                pts.push(t.start);
                pts.extend_from_slice(t.control_points());
                pts.push(t.end);
                pts
            }
        }
    }
}

impl From<Straight> for Section {
    fn from(s: Straight) -> Self {
        Self::Straight(s)
    }
}

impl From<BezierTurn> for Section {
    fn from(t: BezierTurn) -> Self {
        Self::Turn(t)
    }
}
