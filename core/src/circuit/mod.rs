//! Closed circuit centerlines and the perimeters sampled from them.

pub mod perimeter;
pub mod records;


pub use perimeter::CircuitPerimeter;
pub use records::SectionRecord;

use crate::geometry::{Bounds2, GeometryError, Point2};
use crate::sections::{Section, SectionKind, DEFAULT_LENGTH_SAMPLES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Unknown section kind: {0}")]
    UnknownSectionKind(String),

    #[error("{kind} needs {expected} points, got {found}")]
    WrongPointCount { kind: SectionKind, expected: &'static str, found: usize },

    #[error("Sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f64),

    #[error("Invalid circuit JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CircuitResult<T> = Result<T, CircuitError>;

/// Cyclic sequence of sections forming a track centerline.
///
/// A circuit produced by the generator is closed: every section ends exactly
/// where the next one (wrapping around) starts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Circuit {
    sections: Vec<Section>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Cyclic access: any index is taken modulo the section count.
    pub fn section(&self, index: isize) -> Option<&Section> {
        if self.sections.is_empty() {
            return None;
        }
        let n = self.sections.len() as isize;
        self.sections.get(index.rem_euclid(n) as usize)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn is_closed(&self) -> bool {
        let n = self.sections.len();
        n > 0 && (0..n).all(|i| self.sections[i].end() == self.sections[(i + 1) % n].start())
    }

    /// Total centerline length. Straights are exact; turns are approximated
    /// with `samples` points each.
    pub fn length(&self, samples: usize) -> CircuitResult<f64> {
        let mut total = 0.0;
        for section in &self.sections {
            total += section.length(samples)?;
        }
        Ok(total)
    }

    /// Bounding box of the sampled centerline.
    pub fn bounds(&self, samples: usize) -> CircuitResult<Bounds2> {
        let mut bounds = Bounds2::empty();
        for section in &self.sections {
            for p in section.sample(samples)? {
                bounds.extend(&p);
            }
        }
        Ok(bounds)
    }

    /// Sample every section into a closed polygon.
    ///
    /// Each section gets `max(floor(length / sample_rate), 2)` points. The last
    /// point of each section is dropped since the next section starts there,
    /// and the final edge wraps back to the first vertex.
    pub fn to_perimeter(&self, sample_rate: f64) -> CircuitResult<CircuitPerimeter> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(CircuitError::InvalidSampleRate(sample_rate));
        }

        let mut ring: Vec<Point2> = Vec::new();
        for section in &self.sections {
            let section_length = section.length(DEFAULT_LENGTH_SAMPLES)?;
            let count = ((section_length / sample_rate).floor() as usize).max(2);
            let mut samples = section.sample(count)?;
            samples.pop();
            ring.extend(samples);
        }

        tracing::debug!(
            "Sampled {} sections into {} perimeter vertices (rate {})",
            self.sections.len(),
            ring.len(),
            sample_rate
        );
        Ok(CircuitPerimeter::from_ring(&ring))
    }

    pub fn to_records(&self) -> Vec<SectionRecord> {
        self.sections.iter().map(SectionRecord::from).collect()
    }

    pub fn from_records(records: &[SectionRecord]) -> CircuitResult<Self> {
        let sections = records
            .iter()
            .map(Section::try_from)
            .collect::<CircuitResult<Vec<_>>>()?;
        Ok(Self { sections })
    }

    pub fn to_json(&self) -> CircuitResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }

    pub fn from_json(json: &str) -> CircuitResult<Self> {
        let records: Vec<SectionRecord> = serde_json::from_str(json)?;
        Self::from_records(&records)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl std::ops::Index<usize> for Circuit {
    type Output = Section;

    fn index(&self, index: usize) -> &Section {
        &self.sections[index]
    }
}
