#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::Viewport;
use crate::params::{BezierParams, ControlPoint, ParabolaParams, StraightParams};

fn camera() -> Camera {
    Camera::for_viewport(Viewport::new(400.0, 400.0), 5.0)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn straight_scene_is_segment_with_guide() {
    let params = PathParameters::Straight(StraightParams { h: 10.0, angle_deg: 0.0, speed: 20.0, duration: 5.0 });
    let scene = EditorScene::build(&params, &camera());
    assert_eq!(scene.kind, PathKind::Straight);
    assert_eq!(scene.observer, Point::new(200.0, 200.0));
    assert_eq!(scene.path.len(), 2);
    assert!(approx_eq(scene.path[0].x, -50.0));
    assert!(approx_eq(scene.path[1].x, 450.0));
    assert!(scene.control_polygon.is_empty());
    assert_eq!(scene.guide, Some((Point::new(200.0, 200.0), Point::new(200.0, 150.0))));
    assert_eq!(scene.handles.len(), 2);
    assert_eq!(scene.scale, 5.0);
}

#[test]
fn parabola_scene_uses_fixed_span() {
    let params = PathParameters::Parabola(ParabolaParams::default());
    let scene = EditorScene::build(&params, &camera());
    assert_eq!(scene.path.len(), 160);
    assert!(approx_eq(scene.path[0].x, 0.0));
    assert!(approx_eq(scene.path[159].x, 400.0));
    assert_eq!(scene.guide, None);
    assert_eq!(scene.handles, vec![(Handle::Vertex, Point::new(200.0, 150.0))]);
}

#[test]
fn bezier_scene_has_control_polygon() {
    let params = PathParameters::Bezier(BezierParams::default());
    let scene = EditorScene::build(&params, &camera());
    assert_eq!(scene.path.len(), 100);
    assert_eq!(scene.control_polygon.len(), 4);
    assert_eq!(scene.control_polygon[0], scene.path[0]);
    assert_eq!(scene.control_polygon[3], scene.path[99]);
    assert_eq!(scene.handles[2].0, Handle::Control(ControlPoint::P2));
    assert_eq!(scene.handles[2].1, scene.control_polygon[2]);
}

#[test]
fn scene_follows_zoom() {
    let params = PathParameters::Parabola(ParabolaParams::default());
    let near = EditorScene::build(&params, &Camera::for_viewport(Viewport::new(400.0, 400.0), 10.0));
    assert_eq!(near.handles[0].1, Point::new(200.0, 100.0));
}
