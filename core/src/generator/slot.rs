use crate::geometry::Point2;
use crate::sections::{BezierTurn, Section, Straight};

/// Working element of the generation pipeline: either a waypoint that has
/// not been decided yet, or a finished section.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Waypoint(Point2),
    Straight(Straight),
    Turn(BezierTurn),
}

impl Slot {
    /// Where the slot begins. For a waypoint this is the point itself.
    pub fn start(&self) -> Point2 {
        match self {
            Self::Waypoint(p) => *p,
            Self::Straight(s) => s.start,
            Self::Turn(t) => t.start,
        }
    }

    pub fn set_start(&mut self, point: Point2) {
        match self {
            Self::Waypoint(p) => *p = point,
            Self::Straight(s) => s.start = point,
            Self::Turn(t) => t.start = point,
        }
    }

    pub fn is_straight(&self) -> bool {
        matches!(self, Self::Straight(_))
    }

    pub fn is_waypoint(&self) -> bool {
        matches!(self, Self::Waypoint(_))
    }

    /// The finished section, or `None` while the slot is still a waypoint.
    pub fn into_section(self) -> Option<Section> {
        match self {
            Self::Waypoint(_) => None,
            Self::Straight(s) => Some(Section::Straight(s)),
            Self::Turn(t) => Some(Section::Turn(t)),
        }
    }
}

impl From<Section> for Slot {
    fn from(section: Section) -> Self {
        match section {
            Section::Straight(s) => Self::Straight(s),
            Section::Turn(t) => Self::Turn(t),
        }
    }
}
