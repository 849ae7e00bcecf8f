//! Procedural circuit generation.
//!
//! A layout starts as a handful of random waypoints and is refined in eight
//! strictly ordered stages (see [`stages`]) into a closed loop of straights
//! and Bézier turns. All randomness comes from the caller's generator, so a
//! seeded RNG reproduces the same circuit.

pub mod config;
pub mod slot;
pub mod stages;

#[cfg(test)]
mod tests_stages;

pub use config::{CoordinateRange, CountRange, GeneratorConfig, RatioRange, MIN_POINTS};
pub use slot::Slot;

use crate::circuit::Circuit;
use crate::sections::DEFAULT_LENGTH_SAMPLES;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("Only {remaining} waypoints left after small-angle correction, need at least {minimum}")]
    TooFewPoints { remaining: usize, minimum: usize },

    #[error("Consecutive-turn limiting did not settle after {iterations} steps")]
    TurnLimitDiverged { iterations: usize },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Produces independent random circuits from a fixed configuration.
///
/// The generator keeps only the most recent layout; nothing else carries
/// over between calls.
#[derive(Debug, Clone, Default)]
pub struct CircuitGenerator {
    config: GeneratorConfig,
    last_layout: Option<Circuit>,
}

impl CircuitGenerator {
    pub fn new(config: GeneratorConfig) -> GeneratorResult<Self> {
        config.validate()?;
        Ok(Self { config, last_layout: None })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn track_width(&self) -> f64 {
        self.config.track_width
    }

    pub fn min_point_distance(&self) -> f64 {
        self.config.min_point_distance
    }

    pub fn last_layout(&self) -> Option<&Circuit> {
        self.last_layout.as_ref()
    }

    /// Run the full pipeline with randomness drawn from `rng`.
    ///
    /// On error no layout is produced and the previous one is kept.
    pub fn generate_layout<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GeneratorResult<Circuit> {
        let config = &self.config;

        let points = stages::sample_points(config, rng);
        let points = stages::order_by_angle(points);
        let points = stages::correct_small_angles(&points, config.small_angle_threshold);
        if points.len() < MIN_POINTS {
            return Err(GeneratorError::TooFewPoints { remaining: points.len(), minimum: MIN_POINTS });
        }

        let slots = stages::detect_straights(&points, config, rng);
        let slots = stages::limit_consecutive_turns(slots, config.max_consecutive_turns)?;
        let slots = stages::insert_turns_after_straights(slots, config, rng);
        let sections = stages::synthesize_turns(slots, config, rng);
        let sections = stages::correct_flow(sections, config, rng);

        let circuit = Circuit::from_sections(sections);
        debug!("Circuit closed: {}", circuit.is_closed());
        info!(
            "Generated circuit with {} sections, approx length {:.1}",
            circuit.len(),
            circuit.length(DEFAULT_LENGTH_SAMPLES).unwrap_or(f64::NAN)
        );

        self.last_layout = Some(circuit.clone());
        Ok(circuit)
    }

    /// Convenience wrapper seeding a [`StdRng`] from `seed`.
    pub fn generate_layout_seeded(&mut self, seed: u64) -> GeneratorResult<Circuit> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_layout(&mut rng)
    }
}
