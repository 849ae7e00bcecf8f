//! The eight stages of circuit generation.
//!
//! Each stage consumes the exact output of the previous one. Stages 6 to 8
//! trim sections that were created earlier in the same pass, so they mutate
//! the working list in place and splice new turns in afterwards.

use super::config::{GeneratorConfig, RatioRange};
use super::slot::Slot;
use super::{GeneratorError, GeneratorResult};
use crate::geometry::{distance, from_polar, polar_angle, Point2};
use crate::sections::{BezierTurn, Section, Straight};
use rand::Rng;
use std::f64::consts::TAU;
use tracing::{debug, warn};

fn uniform<R: Rng + ?Sized>(rng: &mut R, range: RatioRange) -> f64 {
    rng.gen_range(range.min..=range.max)
}

/// Stage 1: draw a random number of integer waypoints inside the coordinate range.
pub fn sample_points<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Vec<Point2> {
    let count = rng.gen_range(config.point_count.min..=config.point_count.max);
    let r = &config.coordinate_range;
    let points: Vec<Point2> = (0..count)
        .map(|_| {
            let x = rng.gen_range(r.x_min..=r.x_max);
            let y = rng.gen_range(r.y_min..=r.y_max);
            Point2::new(x as f64, y as f64)
        })
        .collect();
    debug!("Sampled {} waypoints", points.len());
    points
}

/// Stage 2: sort by polar angle about the origin. The sort is stable, so
/// points sharing an angle keep their sampling order.
pub fn order_by_angle(mut points: Vec<Point2>) -> Vec<Point2> {
    points.sort_by(|a, b| polar_angle(&a.coords).total_cmp(&polar_angle(&b.coords)));
    points
}

/// Swap neighbours pairwise: 0<->1, 2<->3, ... An odd trailing point stays put.
fn swap_pairs(points: &mut [Point2]) {
    for pair in points.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

/// Stage 3: untangle runs of waypoints whose corner angle is below the threshold.
///
/// Every point joins the current run. A point at or above the threshold closes
/// the run, which is swapped pairwise together with that closing point. A run
/// of one wide point passes through unchanged. A run still open when the walk
/// wraps around is dropped, not re-examined.
pub fn correct_small_angles(points: &[Point2], threshold: f64) -> Vec<Point2> {
    let n = points.len();
    let mut corrected = Vec::with_capacity(n);
    let mut run: Vec<Point2> = Vec::new();

    for i in 0..n {
        let previous = points[(i + n - 1) % n];
        let point = points[i];
        let next = points[(i + 1) % n];

        let angle = (previous - point).angle(&(next - point));
        run.push(point);
        if angle < threshold {
            continue;
        }

        swap_pairs(&mut run);
        corrected.append(&mut run);
    }

    if !run.is_empty() {
        warn!("Dropped {} sharp waypoints left open at wraparound", run.len());
    }
    debug!("Small-angle correction kept {} of {} waypoints", corrected.len(), n);
    corrected
}

/// Stage 4: turn each leg between neighbouring waypoints into a straight when
/// it is long enough (or, with some probability, moderately long), or too
/// short to curve. Everything else stays a waypoint.
pub fn detect_straights<R: Rng + ?Sized>(
    points: &[Point2],
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<Slot> {
    let n = points.len();
    let slots: Vec<Slot> = (0..n)
        .map(|i| {
            let point = points[i];
            let next = points[(i + 1) % n];
            let d = distance(&point, &next);

            let is_straight = d > config.long_straight_threshold
                || (d > config.short_straight_threshold && rng.gen_bool(config.short_straight_probability))
                || d < config.chicane_threshold;

            if is_straight {
                Slot::Straight(Straight::new(point, next))
            } else {
                Slot::Waypoint(point)
            }
        })
        .collect();

    debug!(
        "Detected {} straights among {} legs",
        slots.iter().filter(|s| s.is_straight()).count(),
        n
    );
    slots
}

/// Stage 5: break up runs of more than `max_turns` waypoints by turning the
/// offending waypoint into a straight to the next slot.
///
/// Scanning continues past one full lap until the run counter is back to zero.
pub fn limit_consecutive_turns(slots: Vec<Slot>, max_turns: usize) -> GeneratorResult<Vec<Slot>> {
    let step_limit = slots.len().saturating_mul(2).saturating_add(max_turns).saturating_add(2);
    limit_consecutive_turns_within(slots, max_turns, step_limit)
}

/// [`limit_consecutive_turns`] with an explicit cap on scan steps.
///
/// Fails with [`GeneratorError::TurnLimitDiverged`] once `step_limit` steps
/// have run without the scan settling.
pub fn limit_consecutive_turns_within(
    mut slots: Vec<Slot>,
    max_turns: usize,
    step_limit: usize,
) -> GeneratorResult<Vec<Slot>> {
    let n = slots.len();
    if n == 0 {
        return Ok(slots);
    }

    let mut pointer = 0;
    let mut run = 0;
    let mut converted = 0;
    loop {
        if pointer >= step_limit {
            return Err(GeneratorError::TurnLimitDiverged { iterations: pointer });
        }

        let index = pointer % n;
        if slots[index].is_straight() {
            run = 0;
        } else {
            run += 1;
        }

        if run > max_turns {
            let here = slots[index].start();
            let next_start = slots[(pointer + 1) % n].start();
            slots[index] = Slot::Straight(Straight::new(here, next_start));
            converted += 1;
            run = 0;
        }

        pointer += 1;
        if pointer > n && run == 0 {
            break;
        }
    }

    debug!("Converted {} waypoints into straights after {} steps", converted, pointer);
    Ok(slots)
}

/// Stage 6: round off the end of every straight with a quadratic turn whose
/// control point is the original corner.
pub fn insert_turns_after_straights<R: Rng + ?Sized>(
    mut slots: Vec<Slot>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<Slot> {
    let n = slots.len();
    let mut inserted: Vec<Option<BezierTurn>> = vec![None; n];

    for i in 0..n {
        let previous_index = (i + n - 1) % n;
        let turn_start = match &slots[previous_index] {
            Slot::Straight(previous) => previous.interpolate(uniform(rng, config.turn_start_ratio)),
            _ => continue,
        };

        let corner = slots[i].start();
        let next_start = slots[(i + 1) % n].start();
        let turn_end = Straight::new(corner, next_start).interpolate(uniform(rng, config.turn_end_ratio));

        if let Slot::Straight(previous) = &mut slots[previous_index] {
            previous.end = turn_start;
        }
        slots[i].set_start(turn_end);
        inserted[i] = Some(BezierTurn::quadratic(turn_start, corner, turn_end));
    }

    let turns = inserted.iter().filter(|t| t.is_some()).count();
    let mut result = Vec::with_capacity(n + turns);
    for (slot, turn) in slots.into_iter().zip(inserted) {
        if let Some(turn) = turn {
            result.push(Slot::Turn(turn));
        }
        result.push(slot);
    }

    debug!("Inserted {} turns after straights", turns);
    result
}

fn displace<R: Rng + ?Sized>(point: Point2, radius: f64, rng: &mut R) -> Point2 {
    point + from_polar(radius, rng.gen_range(0.0..TAU))
}

fn synthesize_turn<R: Rng + ?Sized>(
    start: Point2,
    end: Point2,
    config: &GeneratorConfig,
    rng: &mut R,
) -> BezierTurn {
    let chord = Straight::new(start, end);
    let chord_length = chord.length();

    if rng.gen_bool(config.cubic_turn_probability) {
        let first_radius = chord_length * uniform(rng, config.turn_displacement_ratio);
        let first = displace(chord.interpolate(1.0 / 3.0), first_radius, rng);
        let second_radius = chord_length * uniform(rng, config.turn_displacement_ratio);
        let second = displace(chord.interpolate(2.0 / 3.0), second_radius, rng);
        BezierTurn::cubic(start, first, second, end)
    } else {
        let radius = chord_length * uniform(rng, config.turn_displacement_ratio);
        let control = displace(chord.interpolate(0.5), radius, rng);
        BezierTurn::quadratic(start, control, end)
    }
}

/// Stage 7: every remaining waypoint becomes a turn running to the next
/// slot's start, with control points scattered around the chord.
pub fn synthesize_turns<R: Rng + ?Sized>(
    slots: Vec<Slot>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<Section> {
    let n = slots.len();
    let next_starts: Vec<Point2> = (0..n).map(|i| slots[(i + 1) % n].start()).collect();

    let mut synthesized = 0;
    let sections: Vec<Section> = slots
        .into_iter()
        .zip(next_starts)
        .map(|(slot, next_start)| match slot {
            Slot::Waypoint(point) => {
                synthesized += 1;
                Section::Turn(synthesize_turn(point, next_start, config, rng))
            }
            Slot::Straight(s) => Section::Straight(s),
            Slot::Turn(t) => Section::Turn(t),
        })
        .collect();

    debug!("Synthesized {} turns from waypoints", synthesized);
    sections
}

/// Stage 8: smooth the joins between sections.
///
/// A turn following a turn gets its entry tangent aligned with the previous
/// exit. A long straight following a turn gets a short transition turn.
pub fn correct_flow<R: Rng + ?Sized>(
    mut sections: Vec<Section>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<Section> {
    let n = sections.len();
    let mut inserted: Vec<Option<BezierTurn>> = vec![None; n];
    let mut aligned = 0;

    for i in 0..n {
        let previous_index = (i + n - 1) % n;
        let (exit_direction, last_control, previous_end) = match &sections[previous_index] {
            Section::Turn(previous) => {
                let controls = previous.control_points();
                (previous.last_direction(), controls[controls.len() - 1], previous.end)
            }
            Section::Straight(_) => continue,
        };

        let transition_start = match &mut sections[i] {
            Section::Turn(turn) => {
                let ratio = rng.gen_range(config.min_control_point_ratio..=1.0);
                let start = turn.start;
                turn.control_points_mut()[0] = start + exit_direction * ratio;
                aligned += 1;
                None
            }
            Section::Straight(straight) if straight.length() > config.short_straight_threshold => {
                let turn_start = Straight::new(last_control, previous_end)
                    .interpolate(uniform(rng, config.turn_start_ratio.squared()));
                let turn_end = straight.interpolate(uniform(rng, config.turn_end_ratio));
                inserted[i] = Some(BezierTurn::quadratic(turn_start, straight.start, turn_end));
                straight.start = turn_end;
                Some(turn_start)
            }
            Section::Straight(_) => None,
        };

        if let (Some(turn_start), Section::Turn(previous)) = (transition_start, &mut sections[previous_index]) {
            previous.end = turn_start;
        }
    }

    let transitions = inserted.iter().filter(|t| t.is_some()).count();
    let mut result = Vec::with_capacity(n + transitions);
    for (section, turn) in sections.into_iter().zip(inserted) {
        if let Some(turn) = turn {
            result.push(Section::Turn(turn));
        }
        result.push(section);
    }

    debug!("Aligned {} turn pairs and added {} transition turns", aligned, transitions);
    result
}
