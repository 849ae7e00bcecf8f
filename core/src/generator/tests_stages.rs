use crate::generator::config::{CountRange, GeneratorConfig, RatioRange};
use crate::generator::slot::Slot;
use crate::generator::stages;
use crate::generator::GeneratorError;
use crate::geometry::{from_polar, ApproxEq, Point2};
use crate::sections::{BezierTurn, Section, Straight};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// Config whose ratio draws collapse to fixed values.
fn fixed_config() -> GeneratorConfig {
    GeneratorConfig {
        turn_start_ratio: RatioRange::new(0.5, 0.5),
        turn_end_ratio: RatioRange::new(0.25, 0.25),
        turn_displacement_ratio: RatioRange::new(0.0, 0.0),
        min_control_point_ratio: 1.0,
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_sample_points_within_bounds() {
    let config = GeneratorConfig::default();
    let mut rng = rng();
    for _ in 0..20 {
        let points = stages::sample_points(&config, &mut rng);
        assert!((9..=12).contains(&points.len()));
        for pt in &points {
            assert!(pt.x >= -500.0 && pt.x <= 500.0);
            assert!(pt.y >= -500.0 && pt.y <= 500.0);
            assert_eq!(pt.x.fract(), 0.0, "Coordinates are drawn as integers");
        }
    }
}

#[test]
fn test_sample_points_degenerate_range() {
    let mut config = GeneratorConfig::default();
    config.point_count = CountRange { min: 5, max: 5 };
    config.coordinate_range.x_min = 7;
    config.coordinate_range.x_max = 7;
    let points = stages::sample_points(&config, &mut rng());
    assert_eq!(points.len(), 5);
    assert!(points.iter().all(|pt| pt.x == 7.0));
}

#[test]
fn test_order_by_angle() {
    let points = vec![p(0.0, -10.0), p(-10.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)];
    let ordered = stages::order_by_angle(points);
    assert_eq!(ordered, vec![p(0.0, -10.0), p(10.0, 0.0), p(0.0, 10.0), p(-10.0, 0.0)]);
}

#[test]
fn test_order_by_angle_is_stable() {
    let points = vec![p(4.0, 4.0), p(-3.0, 1.0), p(1.0, 1.0)];
    let ordered = stages::order_by_angle(points);
    assert_eq!(ordered, vec![p(4.0, 4.0), p(1.0, 1.0), p(-3.0, 1.0)]);
}

#[test]
fn test_small_angles_untouched_when_wide() {
    let square = vec![p(100.0, 0.0), p(0.0, 100.0), p(-100.0, 0.0), p(0.0, -100.0)];
    assert_eq!(stages::correct_small_angles(&square, 0.436), square);
}

#[test]
fn test_small_angle_run_is_swapped_pairwise() {
    // Corners at B, C, D are sharp; E is wide and closes the run
    let points = vec![p(0.0, 0.0), p(400.0, 0.0), p(0.0, 40.0), p(400.0, 80.0), p(0.0, 120.0), p(-200.0, 60.0)];
    let corrected = stages::correct_small_angles(&points, 0.436);
    assert_eq!(
        corrected,
        vec![p(0.0, 0.0), p(0.0, 40.0), p(400.0, 0.0), p(0.0, 120.0), p(400.0, 80.0), p(-200.0, 60.0)]
    );
}

#[test]
fn test_small_angle_odd_run_keeps_last() {
    // B and C are sharp; D closes a run of three and stays last
    let points = vec![p(0.0, 0.0), p(400.0, 0.0), p(0.0, 40.0), p(400.0, 80.0), p(400.0, 300.0)];
    let corrected = stages::correct_small_angles(&points, 0.436);
    assert_eq!(
        corrected,
        vec![p(0.0, 0.0), p(0.0, 40.0), p(400.0, 0.0), p(400.0, 80.0), p(400.0, 300.0)]
    );
}

#[test]
fn test_small_angle_lone_corner_swapped_and_trailing_run_dropped() {
    // B is a lone sharp corner, swapped with C which closes it.
    // D is sharp and still open when the walk ends.
    let points = vec![p(0.0, 0.0), p(400.0, 0.0), p(0.0, 40.0), p(-200.0, 60.0)];
    let corrected = stages::correct_small_angles(&points, 0.436);
    assert_eq!(corrected, vec![p(0.0, 0.0), p(0.0, 40.0), p(400.0, 0.0)]);
}

#[test]
fn test_small_angle_all_sharp_drops_everything() {
    let same = vec![p(0.0, 0.0); 4];
    assert!(stages::correct_small_angles(&same, 0.436).is_empty());
}

#[test]
fn test_detect_straights_by_distance() {
    let mut config = GeneratorConfig::default();
    config.short_straight_probability = 0.0;

    // Legs: 600 (long), 100 (curvable), 30 (chicane), then closing leg of ~636
    let points = vec![p(0.0, 0.0), p(600.0, 0.0), p(600.0, 100.0), p(600.0, 130.0)];
    let slots = stages::detect_straights(&points, &config, &mut rng());

    assert_eq!(slots[0], Slot::Straight(Straight::new(p(0.0, 0.0), p(600.0, 0.0))));
    assert_eq!(slots[1], Slot::Waypoint(p(600.0, 0.0)));
    assert_eq!(slots[2], Slot::Straight(Straight::new(p(600.0, 100.0), p(600.0, 130.0))));
    assert!(slots[3].is_straight());
}

#[test]
fn test_detect_short_straights_follow_probability() {
    let points = vec![p(0.0, 0.0), p(300.0, 0.0), p(300.0, 300.0), p(0.0, 300.0)];

    let mut config = GeneratorConfig::default();
    config.short_straight_probability = 1.0;
    let slots = stages::detect_straights(&points, &config, &mut rng());
    assert!(slots.iter().all(Slot::is_straight));

    config.short_straight_probability = 0.0;
    let slots = stages::detect_straights(&points, &config, &mut rng());
    assert!(slots.iter().all(Slot::is_waypoint));
}

#[test]
fn test_limit_consecutive_turns() {
    let waypoints: Vec<Slot> = (0..6).map(|i| Slot::Waypoint(p(i as f64, 0.0))).collect();
    let limited = stages::limit_consecutive_turns(waypoints, 2).unwrap();

    let straights: Vec<usize> = (0..6).filter(|&i| limited[i].is_straight()).collect();
    assert_eq!(straights, vec![2, 5]);
    assert_eq!(limited[2], Slot::Straight(Straight::new(p(2.0, 0.0), p(3.0, 0.0))));
    assert_eq!(limited[5], Slot::Straight(Straight::new(p(5.0, 0.0), p(0.0, 0.0))));
}

#[test]
fn test_limit_consecutive_turns_zero_max() {
    let waypoints: Vec<Slot> = (0..4).map(|i| Slot::Waypoint(p(0.0, i as f64))).collect();
    let limited = stages::limit_consecutive_turns(waypoints, 0).unwrap();
    assert!(limited.iter().all(Slot::is_straight));
}

#[test]
fn test_limit_consecutive_turns_resets_on_straight() {
    let slots = vec![
        Slot::Waypoint(p(0.0, 0.0)),
        Slot::Waypoint(p(1.0, 0.0)),
        Slot::Straight(Straight::new(p(2.0, 0.0), p(3.0, 0.0))),
        Slot::Waypoint(p(3.0, 0.0)),
        Slot::Waypoint(p(4.0, 0.0)),
        Slot::Straight(Straight::new(p(5.0, 0.0), p(0.0, 0.0))),
    ];
    let limited = stages::limit_consecutive_turns(slots.clone(), 2).unwrap();
    assert_eq!(limited, slots);
}

#[test]
fn test_limit_consecutive_turns_step_bound() {
    let waypoints: Vec<Slot> = (0..6).map(|i| Slot::Waypoint(p(i as f64, 0.0))).collect();
    match stages::limit_consecutive_turns_within(waypoints, 2, 4) {
        Err(GeneratorError::TurnLimitDiverged { iterations }) => assert_eq!(iterations, 4),
        other => panic!("Expected TurnLimitDiverged, got {:?}", other),
    }
}

#[test]
fn test_limit_consecutive_turns_default_bound_covers_large_max() {
    let waypoints: Vec<Slot> = (0..3).map(|i| Slot::Waypoint(p(i as f64, 0.0))).collect();
    let limited = stages::limit_consecutive_turns(waypoints, 50).unwrap();
    assert!(limited[0].is_waypoint() && limited[1].is_waypoint());
    assert_eq!(limited[2], Slot::Straight(Straight::new(p(2.0, 0.0), p(0.0, 0.0))));
}

#[test]
fn test_insert_turns_after_straights() {
    let config = fixed_config();
    let slots = vec![
        Slot::Straight(Straight::new(p(0.0, 0.0), p(400.0, 0.0))),
        Slot::Waypoint(p(400.0, 0.0)),
        Slot::Waypoint(p(400.0, 200.0)),
    ];
    let result = stages::insert_turns_after_straights(slots, &config, &mut rng());

    assert_eq!(
        result,
        vec![
            Slot::Straight(Straight::new(p(0.0, 0.0), p(200.0, 0.0))),
            Slot::Turn(BezierTurn::quadratic(p(200.0, 0.0), p(400.0, 0.0), p(400.0, 50.0))),
            Slot::Waypoint(p(400.0, 50.0)),
            Slot::Waypoint(p(400.0, 200.0)),
        ]
    );
}

#[test]
fn test_insert_turns_between_consecutive_straights() {
    let config = fixed_config();
    let slots = vec![
        Slot::Straight(Straight::new(p(0.0, 0.0), p(400.0, 0.0))),
        Slot::Straight(Straight::new(p(400.0, 0.0), p(400.0, 400.0))),
        Slot::Waypoint(p(400.0, 400.0)),
    ];
    let result = stages::insert_turns_after_straights(slots, &config, &mut rng());

    assert_eq!(result.len(), 5);
    match (&result[0], &result[1], &result[2], &result[3]) {
        (Slot::Straight(a), Slot::Turn(t), Slot::Straight(b), Slot::Turn(u)) => {
            assert_eq!(a.end, t.start);
            assert_eq!(t.control_points(), &[p(400.0, 0.0)]);
            assert_eq!(t.end, b.start);
            assert_eq!(b.start, p(400.0, 100.0));
            // Second straight was trimmed at its already-moved start
            assert_eq!(b.end, p(400.0, 250.0));
            assert_eq!(u.start, b.end);
            assert_eq!(u.control_points(), &[p(400.0, 400.0)]);
            assert_eq!(result[4], Slot::Waypoint(u.end));
        }
        other => panic!("Unexpected slot layout: {:?}", other),
    }
}

#[test]
fn test_synthesize_turns_quadratic() {
    let mut config = fixed_config();
    config.cubic_turn_probability = 0.0;
    let slots = vec![
        Slot::Waypoint(p(0.0, 0.0)),
        Slot::Straight(Straight::new(p(100.0, 0.0), p(100.0, 100.0))),
        Slot::Waypoint(p(100.0, 100.0)),
    ];
    let sections = stages::synthesize_turns(slots, &config, &mut rng());

    assert_eq!(sections[0], Section::Turn(BezierTurn::quadratic(p(0.0, 0.0), p(50.0, 0.0), p(100.0, 0.0))));
    assert_eq!(sections[1], Section::Straight(Straight::new(p(100.0, 0.0), p(100.0, 100.0))));
    match &sections[2] {
        Section::Turn(t) => {
            assert_eq!(t.start, p(100.0, 100.0));
            assert_eq!(t.end, p(0.0, 0.0));
            assert!(t.control_points()[0].approx_eq(&p(50.0, 50.0)));
        }
        other => panic!("Expected a turn, got {:?}", other),
    }
}

#[test]
fn test_synthesize_turns_cubic_displacement_bounded() {
    let mut config = GeneratorConfig::default();
    config.cubic_turn_probability = 1.0;
    let start = p(0.0, 0.0);
    let end = p(300.0, 0.0);
    let mut rng = rng();

    for _ in 0..20 {
        let slots = vec![Slot::Waypoint(start), Slot::Waypoint(end)];
        let sections = stages::synthesize_turns(slots, &config, &mut rng);
        let Section::Turn(turn) = &sections[0] else { panic!("Expected a turn") };
        assert_eq!(turn.degree(), 3);
        assert_eq!((turn.start, turn.end), (start, end));

        let max_radius = 300.0 * config.turn_displacement_ratio.max + 1e-9;
        let min_radius = 300.0 * config.turn_displacement_ratio.min - 1e-9;
        for (cp, anchor) in turn.control_points().iter().zip([p(100.0, 0.0), p(200.0, 0.0)]) {
            let offset = (cp - anchor).norm();
            assert!(offset <= max_radius && offset >= min_radius, "Offset {} out of range", offset);
        }
    }
}

#[test]
fn test_correct_flow_aligns_consecutive_turns() {
    let config = fixed_config();
    let first = BezierTurn::quadratic(p(0.0, 0.0), p(100.0, 0.0), p(200.0, 50.0));
    let second = BezierTurn::quadratic(p(200.0, 50.0), p(0.0, 300.0), p(0.0, 0.0));
    let sections = vec![Section::Turn(first), Section::Turn(second)];

    let corrected = stages::correct_flow(sections, &config, &mut rng());
    assert_eq!(corrected.len(), 2);

    let (Section::Turn(first), Section::Turn(second)) = (&corrected[0], &corrected[1]) else {
        panic!("Expected two turns, got {:?}", corrected);
    };
    // The first turn is aligned to the wrap-around exit of the second one first
    assert_eq!(first.control_points()[0], p(0.0, -300.0));
    // Ratio range collapses to 1.0, so the entry tangent equals the previous exit
    assert_eq!(second.first_direction(), first.last_direction());
    assert_eq!(second.control_points()[0], p(400.0, 400.0));
}

#[test]
fn test_correct_flow_inserts_transition_before_long_straight() {
    let config = fixed_config();
    let turn = BezierTurn::quadratic(p(0.0, 400.0), p(0.0, 0.0), p(100.0, 0.0));
    let straight = Straight::new(p(100.0, 0.0), p(500.0, 0.0));
    let closing = Straight::new(p(500.0, 0.0), p(0.0, 400.0));
    let sections = vec![Section::Turn(turn), Section::Straight(straight), Section::Straight(closing)];

    let corrected = stages::correct_flow(sections, &config, &mut rng());
    assert_eq!(corrected.len(), 4);

    let (Section::Turn(trimmed), Section::Turn(transition), Section::Straight(s)) =
        (&corrected[0], &corrected[1], &corrected[2])
    else {
        panic!("Unexpected layout: {:?}", corrected);
    };
    // Previous turn end moved to 0.25 of the way from its control point to its end
    assert_eq!(trimmed.end, p(25.0, 0.0));
    assert_eq!(transition.start, trimmed.end);
    assert_eq!(transition.control_points(), &[p(100.0, 0.0)]);
    assert_eq!(transition.end, p(200.0, 0.0));
    assert_eq!(s.start, transition.end);
    assert_eq!(s.end, p(500.0, 0.0));
}

#[test]
fn test_correct_flow_leaves_short_straights() {
    let config = fixed_config();
    let turn = BezierTurn::quadratic(p(0.0, 100.0), p(0.0, 0.0), p(50.0, 0.0));
    let straight = Straight::new(p(50.0, 0.0), p(0.0, 100.0));
    let sections = vec![Section::Turn(turn.clone()), Section::Straight(straight)];

    let corrected = stages::correct_flow(sections, &config, &mut rng());
    assert_eq!(corrected, vec![Section::Turn(turn), Section::Straight(straight)]);
}

#[test]
fn test_displacement_uses_full_circle() {
    // Sanity check on the polar helper used for control point displacement
    let v = from_polar(10.0, std::f64::consts::PI);
    assert!(v.x.approx_eq(&-10.0));
    assert!(v.y.abs() < 1e-9);
}
