#![allow(clippy::float_cmp)]

use super::*;
use crate::params::{BezierParams, ParabolaParams, PathKind, PathParameters, StraightParams};
use crate::sample::sample;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn reference_straight() -> Vec<Point> {
    sample(&PathParameters::Straight(StraightParams { h: 10.0, angle_deg: 0.0, speed: 20.0, duration: 5.0 }))
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_always_include_origin() {
    let b = Bounds::around(&[Point::new(5.0, 6.0), Point::new(7.0, 9.0)]);
    assert_eq!(b.min_x, 0.0);
    assert_eq!(b.min_y, 0.0);
    assert_eq!(b.max_x, 7.0);
    assert_eq!(b.max_y, 9.0);
}

#[test]
fn bounds_empty_is_origin_with_floor() {
    let b = Bounds::around(&[]);
    assert_eq!(b, Bounds::new());
    assert_eq!(b.width(), 1.0);
    assert_eq!(b.height(), 1.0);
    assert_eq!(b.center(), Point::default());
}

#[test]
fn bounds_floor_only_applies_to_small_extent() {
    let b = Bounds::around(&[Point::new(-20.0, 0.25)]);
    assert_eq!(b.width(), 20.0);
    assert_eq!(b.height(), 1.0);
}

// =============================================================
// project
// =============================================================

#[test]
fn project_reference_straight() {
    let proj = project(&reference_straight(), Viewport::new(400.0, 300.0));
    // Box is 100 x 10 m; usable area is 320 x 220 px.
    assert!(approx_eq(proj.scale, 3.2));
    assert!(approx_eq(proj.observer.x, 200.0));
    assert!(approx_eq(proj.observer.y, 166.0));
    assert_eq!(proj.canvas_points.len(), 100);

    let first = proj.canvas_points[0];
    let last = proj.canvas_points[99];
    assert!(approx_eq(first.x, 40.0));
    assert!(approx_eq(last.x, 360.0));
    assert!(approx_eq(first.y, 134.0));
}

#[test]
fn project_caps_scale() {
    let points = [Point::new(-0.5, 0.2), Point::new(0.5, 0.2)];
    let proj = project(&points, Viewport::new(400.0, 300.0));
    assert_eq!(proj.scale, 4.0);
}

#[test]
fn project_maps_box_midpoint_to_canvas_center() {
    let points = [Point::new(10.0, 10.0), Point::new(30.0, 50.0)];
    let proj = project(&points, Viewport::new(500.0, 500.0));
    // Box is [0, 30] x [0, 50]; its midpoint (15, 25) lands on (250, 250).
    let mid_x = (proj.observer.x + proj.canvas_points[1].x) / 2.0;
    let mid_y = (proj.observer.y + proj.canvas_points[1].y) / 2.0;
    assert!(approx_eq(mid_x, 250.0));
    assert!(approx_eq(mid_y, 250.0));
}

#[test]
fn project_flips_y() {
    let points = [Point::new(0.0, 10.0)];
    let proj = project(&points, Viewport::new(300.0, 300.0));
    assert!(proj.canvas_points[0].y < proj.observer.y);
}

#[test]
fn project_empty_input() {
    let proj = project(&[], Viewport::new(300.0, 200.0));
    assert!(proj.canvas_points.is_empty());
    assert_eq!(proj.scale, 4.0);
    assert!(approx_eq(proj.observer.x, 150.0));
    assert!(approx_eq(proj.observer.y, 100.0));
    assert_eq!(proj.closest_index(), None);
}

#[test]
fn project_tiny_viewport_keeps_positive_scale() {
    let proj = project(&reference_straight(), Viewport::new(50.0, 50.0));
    assert!(proj.scale > 0.0);
    assert!(proj.canvas_points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn observer_stays_inside_fitted_view() {
    let viewports = [Viewport::new(400.0, 300.0), Viewport::new(200.0, 600.0), Viewport::new(1200.0, 90.0)];
    for kind in PathKind::ALL {
        let points = sample(&PathParameters::default_for(kind));
        for vp in viewports {
            let proj = project(&points, vp);
            let pad = crate::consts::PREVIEW_PADDING_PX;
            assert!(proj.observer.x >= pad - EPSILON && proj.observer.x <= vp.width - pad + EPSILON, "{kind} {vp:?}");
            assert!(proj.observer.y >= pad - EPSILON && proj.observer.y <= vp.height - pad + EPSILON, "{kind} {vp:?}");
            for p in &proj.canvas_points {
                assert!(p.x >= pad - 1e-6 && p.x <= vp.width - pad + 1e-6);
                assert!(p.y >= pad - 1e-6 && p.y <= vp.height - pad + 1e-6);
            }
        }
    }
}

#[test]
fn projection_serializes_fields() {
    let proj = project(&[Point::new(1.0, 1.0)], Viewport::new(200.0, 200.0));
    let json = serde_json::to_value(&proj).unwrap();
    assert!(json.get("canvas_points").unwrap().is_array());
    assert!(json.get("observer").unwrap().get("x").is_some());
    assert!(json.get("scale").unwrap().is_number());
}

// =============================================================
// closest_approach_index
// =============================================================

#[test]
fn closest_index_empty_is_none() {
    assert_eq!(closest_approach_index(&[], Point::default()), None);
}

#[test]
fn closest_index_picks_minimum() {
    let points = [Point::new(5.0, 5.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
    assert_eq!(closest_approach_index(&points, Point::default()), Some(1));
}

#[test]
fn closest_index_first_tie_wins() {
    let points = [Point::new(3.0, 0.0), Point::new(-3.0, 0.0), Point::new(0.0, 3.0)];
    assert_eq!(closest_approach_index(&points, Point::default()), Some(0));
}

#[test]
fn closest_index_reference_straight_is_middle() {
    let proj = project(&reference_straight(), Viewport::new(400.0, 300.0));
    let idx = proj.closest_index().unwrap();
    assert!(idx == 49 || idx == 50, "got {idx}");
}

// =============================================================
// Overflowing input
// =============================================================

fn assert_finite_projection(proj: &Projection) {
    assert!(proj.scale.is_finite() && proj.scale > 0.0, "scale {}", proj.scale);
    assert!(proj.observer.x.is_finite() && proj.observer.y.is_finite(), "observer {:?}", proj.observer);
    for p in &proj.canvas_points {
        assert!(p.x.is_finite() && p.y.is_finite(), "point {p:?}");
    }
}

#[test]
fn huge_parabola_speed_projects_finite() {
    let params = PathParameters::Parabola(ParabolaParams { a: 0.5, h: 10.0, speed: 1e160, duration: 5.0 });
    let proj = project(&sample(&params), Viewport::new(400.0, 300.0));
    assert_finite_projection(&proj);
    assert!(proj.closest_index().is_some());
}

#[test]
fn extreme_bezier_points_project_finite() {
    let params = PathParameters::Bezier(BezierParams {
        p0: Point::new(-1.7e308, 0.0),
        p3: Point::new(1.7e308, 0.0),
        ..BezierParams::default()
    });
    assert_finite_projection(&project(&sample(&params), Viewport::new(400.0, 300.0)));
}

#[test]
fn unbounded_box_falls_back_to_max_scale() {
    let bounds = Bounds {
        min_x: f64::NEG_INFINITY,
        max_x: f64::INFINITY,
        min_y: 0.0,
        max_y: f64::INFINITY,
    };
    let camera = fit_camera(&bounds, Viewport::new(400.0, 300.0));
    assert_eq!(camera.scale, PREVIEW_MAX_SCALE);
    assert_eq!(camera.center, Point::new(200.0, 150.0));
}
