#![allow(clippy::float_cmp)]

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("doppler").chain(args.iter().copied())).unwrap()
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn simulate_parses_path_flags() {
    let cli = parse(&["simulate", "--vehicle", "car", "--path", "straight", "--h", "25", "--angle", "-30", "--no-wait"]);
    let Command::Simulate { vehicle, path, no_wait } = cli.command else { panic!("expected simulate") };
    assert_eq!(vehicle, "car");
    assert!(no_wait);
    assert_eq!(path.kind, PathKind::Straight);
    assert_eq!(path.h, Some(25.0));
    assert_eq!(path.angle, Some(-30.0));
}

#[test]
fn unknown_path_kind_is_rejected() {
    let argv = ["doppler", "preview", "--path", "spiral"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn base_url_flag_overrides() {
    assert_eq!(parse(&["--base-url", "http://x", "info"]).base_url.as_deref(), Some("http://x"));
}

// =============================================================================
// Path record
// =============================================================================

#[test]
fn record_contains_only_set_flags() {
    let args = PathArgs { h: Some(5.0), audio_duration: Some(8.0), ..PathArgs::default() };
    let record = args.record();
    let map = record.as_object().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["h"], Value::from(5.0));
    assert_eq!(map["audio_duration"], Value::from(8.0));
}

#[test]
fn params_fill_defaults_and_clamp() {
    let args = PathArgs { kind: PathKind::Straight, angle: Some(80.0), ..PathArgs::default() };
    let PathParameters::Straight(p) = args.params() else { panic!("expected straight") };
    assert_eq!(p.angle_deg, 45.0);
    assert_eq!(p, doppler_canvas::params::StraightParams { angle_deg: 45.0, ..Default::default() });
}

#[test]
fn params_for_bezier_points() {
    let args = PathArgs { kind: PathKind::Bezier, x0: Some(-50.0), y3: Some(12.0), ..PathArgs::default() };
    let PathParameters::Bezier(p) = args.params() else { panic!("expected bezier") };
    assert_eq!(p.p0.x, -50.0);
    assert_eq!(p.p3.y, 12.0);
}

// =============================================================================
// Preview
// =============================================================================

#[test]
fn preview_without_progress_marks_closest_approach() {
    let preview = preview_for(&PathArgs::default(), 400.0, 300.0, None);
    assert_eq!(preview.projection.canvas_points.len(), 100);
    let marker = preview.marker.unwrap();
    assert_eq!(Some(marker.index), preview.closest_index);
    assert!(marker.heading.is_none());
}

#[test]
fn preview_progress_places_marker() {
    let preview = preview_for(&PathArgs::default(), 400.0, 300.0, Some(1.0));
    let marker = preview.marker.unwrap();
    assert_eq!(marker.index, 99);
}

#[test]
fn preview_progress_is_clamped() {
    let preview = preview_for(&PathArgs::default(), 400.0, 300.0, Some(-3.0));
    assert_eq!(preview.marker.unwrap().index, 0);
}

#[tokio::test]
async fn preview_runs_without_service() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
    let command = parse(&["preview", "--path", "parabola", "--progress", "0.5"]).command;
    assert!(run(command, &config).await.is_ok());
}
