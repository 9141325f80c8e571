#![allow(clippy::float_cmp)]

use super::*;
use crate::params::{BezierParams, StraightParams};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn straight(h: f64, angle_deg: f64, speed: f64, duration: f64) -> PathParameters {
    PathParameters::Straight(StraightParams { h, angle_deg, speed, duration })
}

fn parabola(a: f64, h: f64, speed: f64, duration: f64) -> PathParameters {
    PathParameters::Parabola(ParabolaParams { a, h, speed, duration })
}

fn all_finite(points: &[Point]) -> bool {
    points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
}

// =============================================================
// Counts
// =============================================================

#[test]
fn every_family_yields_fixed_count() {
    for kind in crate::params::PathKind::ALL {
        let points = sample(&PathParameters::default_for(kind));
        assert_eq!(points.len(), 100, "{kind}");
    }
}

#[test]
fn sample_n_zero_and_one() {
    let params = straight(10.0, 0.0, 20.0, 5.0);
    assert!(sample_n(&params, 0).is_empty());
    // A single sample sits at the closest approach.
    assert_eq!(sample_n(&params, 1), vec![Point::new(0.0, 10.0)]);
}

#[test]
fn sampling_is_deterministic() {
    let params = parabola(0.2, 3.0, 12.0, 4.0);
    assert_eq!(sample(&params), sample(&params));
}

// =============================================================
// Straight
// =============================================================

#[test]
fn straight_horizontal_reference_path() {
    let points = sample(&straight(10.0, 0.0, 20.0, 5.0));
    assert_eq!(points.len(), 100);
    assert!(approx_eq(points[0].x, -50.0));
    assert!(approx_eq(points[99].x, 50.0));
    for p in &points {
        assert!(approx_eq(p.y, 10.0), "y drifted: {p:?}");
    }
}

#[test]
fn straight_x_increases_monotonically() {
    let points = sample(&straight(10.0, 0.0, 20.0, 5.0));
    assert!(points.windows(2).all(|w| w[1].x > w[0].x));
}

#[test]
fn straight_midpoint_is_closest_approach() {
    let points = sample_n(&straight(10.0, 0.0, 20.0, 5.0), 101);
    assert!(approx_eq(points[50].x, 0.0));
    assert!(approx_eq(points[50].y, 10.0));
}

#[test]
fn straight_tilted_follows_direction() {
    let points = sample(&straight(10.0, 30.0, 20.0, 5.0));
    let last = points[99];
    let (sin, cos) = 30f64.to_radians().sin_cos();
    assert!(approx_eq(last.x, 50.0 * cos));
    assert!(approx_eq(last.y, 10.0 + 50.0 * sin));
}

// =============================================================
// Parabola
// =============================================================

#[test]
fn parabola_reference_path() {
    let points = sample_n(&parabola(0.1, 10.0, 20.0, 5.0), 101);
    assert!(approx_eq(points[50].x, 0.0));
    assert!(approx_eq(points[50].y, 10.0));
    assert!(approx_eq(points[100].x, 50.0));
    assert!((points[100].y - 260.0).abs() < 1e-6);
}

#[test]
fn parabola_window_extremes() {
    let points = sample(&parabola(0.1, 10.0, 20.0, 5.0));
    assert!(approx_eq(points[0].x, -50.0));
    assert!(approx_eq(points[99].x, 50.0));
    assert!(approx_eq(points[0].y, points[99].y));
}

#[test]
fn parabola_flat_when_curvature_zero() {
    let points = sample(&parabola(0.0, 7.5, 20.0, 5.0));
    assert!(points.iter().all(|p| p.y == 7.5));
}

// =============================================================
// Bezier
// =============================================================

#[test]
fn bezier_endpoints_are_exact() {
    let params = BezierParams::default();
    let points = sample(&PathParameters::Bezier(params));
    assert_eq!(points[0], params.p0);
    assert_eq!(points[99], params.p3);
}

#[test]
fn bezier_ignores_speed_and_duration() {
    let slow = BezierParams { speed: 1.0, duration: 1.0, ..BezierParams::default() };
    let fast = BezierParams { speed: 90.0, duration: 30.0, ..BezierParams::default() };
    assert_eq!(sample(&PathParameters::Bezier(slow)), sample(&PathParameters::Bezier(fast)));
}

#[test]
fn bezier_default_is_symmetric() {
    let points = sample(&PathParameters::Bezier(BezierParams::default()));
    for i in 0..50 {
        let (a, b) = (points[i], points[99 - i]);
        assert!(approx_eq(a.x, -b.x), "x asymmetry at {i}");
        assert!(approx_eq(a.y, b.y), "y asymmetry at {i}");
    }
}

// =============================================================
// Degenerate input
// =============================================================

#[test]
fn zero_speed_collapses_to_one_point() {
    let points = sample(&straight(10.0, 20.0, 0.0, 5.0));
    assert!(all_finite(&points));
    let closest = StraightParams { h: 10.0, angle_deg: 20.0, speed: 0.0, duration: 5.0 }.position_at(0.0);
    assert!(points.iter().all(|p| *p == closest));
}

#[test]
fn zero_duration_collapses_to_one_point() {
    let points = sample(&parabola(0.3, 4.0, 20.0, 0.0));
    assert!(all_finite(&points));
    assert!(points.iter().all(|p| approx_eq(p.x, 0.0) && approx_eq(p.y, 4.0)));
}

#[test]
fn coincident_bezier_points_collapse() {
    let p = Point::new(3.0, -2.0);
    let params = BezierParams { p0: p, p1: p, p2: p, p3: p, ..BezierParams::default() };
    let points = sample(&PathParameters::Bezier(params));
    assert!(points.iter().all(|q| approx_eq(q.x, 3.0) && approx_eq(q.y, -2.0)));
}

// =============================================================
// Editor parabola
// =============================================================

#[test]
fn editor_parabola_spans_fixed_range() {
    let params = ParabolaParams { a: 0.1, h: 10.0, speed: 20.0, duration: 5.0 };
    let points = editor_parabola(&params);
    assert_eq!(points.len(), 160);
    assert!(approx_eq(points[0].x, -40.0));
    assert!(approx_eq(points[159].x, 40.0));
    assert!((points[159].y - 170.0).abs() < 1e-6);
}

#[test]
fn editor_parabola_independent_of_speed() {
    let a = ParabolaParams { a: 0.1, h: 10.0, speed: 20.0, duration: 5.0 };
    let b = ParabolaParams { speed: 3.0, duration: 29.0, ..a };
    assert_eq!(editor_parabola(&a), editor_parabola(&b));
}
