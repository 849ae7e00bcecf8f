use super::{GeneratorError, GeneratorResult};
use serde::{Deserialize, Serialize};

/// Rectangle, inclusive on every side, that the initial waypoints are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateRange {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Default for CoordinateRange {
    fn default() -> Self {
        Self { x_min: -500, x_max: 500, y_min: -500, y_max: 500 }
    }
}

/// Inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

/// Inclusive ratio range used for uniform draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRange {
    pub min: f64,
    pub max: f64,
}

impl RatioRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Squares both bounds. Order is preserved because validated ranges are non-negative.
    pub fn squared(&self) -> Self {
        Self::new(self.min * self.min, self.max * self.max)
    }

    fn check(&self, name: &str) -> GeneratorResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max {
            return Err(GeneratorError::InvalidConfig(format!(
                "{} must be a finite range with 0 <= min <= max, got {}..{}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Tuning knobs for [`CircuitGenerator`](super::CircuitGenerator).
///
/// Every field has a default, so a JSON document only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub coordinate_range: CoordinateRange,
    pub point_count: CountRange,
    /// Carried for consumers; the pipeline does not enforce it.
    pub min_point_distance: f64,
    /// Pairs of waypoints closer than this always become a straight.
    pub chicane_threshold: f64,
    /// Above this distance a pair may become a straight (see `short_straight_probability`).
    pub short_straight_threshold: f64,
    /// Above this distance a pair always becomes a straight.
    pub long_straight_threshold: f64,
    pub short_straight_probability: f64,
    /// Radians. Waypoint angles below this are considered too sharp.
    pub small_angle_threshold: f64,
    pub max_consecutive_turns: usize,
    /// Where along a straight the following turn begins.
    pub turn_start_ratio: RatioRange,
    /// Where along the next leg the inserted turn ends.
    pub turn_end_ratio: RatioRange,
    pub cubic_turn_probability: f64,
    /// Control point displacement relative to the turn chord length.
    pub turn_displacement_ratio: RatioRange,
    /// Lower bound of the tangent scale used when chaining turns.
    pub min_control_point_ratio: f64,
    /// Distance from the outer to the inner track limit. Not used by the centerline math.
    pub track_width: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            coordinate_range: CoordinateRange::default(),
            point_count: CountRange { min: 9, max: 12 },
            min_point_distance: 60.0,
            chicane_threshold: 60.0,
            short_straight_threshold: 200.0,
            long_straight_threshold: 500.0,
            short_straight_probability: 0.15,
            small_angle_threshold: 0.436,
            max_consecutive_turns: 3,
            turn_start_ratio: RatioRange::new(0.8, 0.9),
            turn_end_ratio: RatioRange::new(0.1, 0.25),
            cubic_turn_probability: 0.4,
            turn_displacement_ratio: RatioRange::new(0.3, 0.4),
            min_control_point_ratio: 0.5,
            track_width: 15.0,
        }
    }
}

/// Fewest waypoints that can still form a closed loop.
pub const MIN_POINTS: usize = 3;

impl GeneratorConfig {
    pub fn from_json(json: &str) -> GeneratorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> GeneratorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> GeneratorResult<()> {
        let invalid = |msg: String| Err(GeneratorError::InvalidConfig(msg));

        let r = &self.coordinate_range;
        if r.x_min > r.x_max || r.y_min > r.y_max {
            return invalid(format!(
                "coordinate_range is inverted: x {}..{}, y {}..{}",
                r.x_min, r.x_max, r.y_min, r.y_max
            ));
        }

        let c = &self.point_count;
        if c.min < MIN_POINTS || c.min > c.max {
            return invalid(format!(
                "point_count must satisfy {} <= min <= max, got {}..{}",
                MIN_POINTS, c.min, c.max
            ));
        }

        for (name, value) in [
            ("min_point_distance", self.min_point_distance),
            ("chicane_threshold", self.chicane_threshold),
            ("short_straight_threshold", self.short_straight_threshold),
            ("long_straight_threshold", self.long_straight_threshold),
            ("small_angle_threshold", self.small_angle_threshold),
            ("track_width", self.track_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{} must be finite and non-negative, got {}", name, value));
            }
        }

        if self.short_straight_threshold > self.long_straight_threshold {
            return invalid(format!(
                "short_straight_threshold ({}) exceeds long_straight_threshold ({})",
                self.short_straight_threshold, self.long_straight_threshold
            ));
        }

        for (name, p) in [
            ("short_straight_probability", self.short_straight_probability),
            ("cubic_turn_probability", self.cubic_turn_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{} must be within [0, 1], got {}", name, p));
            }
        }

        self.turn_start_ratio.check("turn_start_ratio")?;
        self.turn_end_ratio.check("turn_end_ratio")?;
        self.turn_displacement_ratio.check("turn_displacement_ratio")?;

        if !(self.min_control_point_ratio > 0.0 && self.min_control_point_ratio <= 1.0) {
            return invalid(format!(
                "min_control_point_ratio must be within (0, 1], got {}",
                self.min_control_point_ratio
            ));
        }

        Ok(())
    }
}
