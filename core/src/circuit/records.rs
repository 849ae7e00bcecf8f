//! Flat record form of a circuit, used for saving and loading layouts.
//!
//! Each section becomes `{ "kind": "Straight" | "BezierTurn", "points": [[x, y], ...] }`
//! with the start, any control points and the end, in order.

use super::{CircuitError, CircuitResult};
use crate::geometry::Point2;
use crate::sections::{BezierTurn, Section, SectionKind, Straight};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub kind: String,
    pub points: Vec<[f64; 2]>,
}

impl From<&Section> for SectionRecord {
    fn from(section: &Section) -> Self {
        Self {
            kind: section.kind().as_str().to_string(),
            points: section.points().iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

impl TryFrom<&SectionRecord> for Section {
    type Error = CircuitError;

    fn try_from(record: &SectionRecord) -> CircuitResult<Self> {
        let points: Vec<Point2> = record.points.iter().map(|p| Point2::new(p[0], p[1])).collect();

        match record.kind.as_str() {
            "Straight" => {
                if points.len() != 2 {
                    return Err(CircuitError::WrongPointCount {
                        kind: SectionKind::Straight,
                        expected: "2",
                        found: points.len(),
                    });
                }
                Ok(Section::Straight(Straight::new(points[0], points[1])))
            }
            "BezierTurn" => {
                if !(3..=4).contains(&points.len()) {
                    return Err(CircuitError::WrongPointCount {
                        kind: SectionKind::BezierTurn,
                        expected: "3 or 4",
                        found: points.len(),
                    });
                }
                let last = points.len() - 1;
                let turn = BezierTurn::new(points[0], points[1..last].to_vec(), points[last])?;
                Ok(Section::Turn(turn))
            }
            other => Err(CircuitError::UnknownSectionKind(other.to_string())),
        }
    }
}
