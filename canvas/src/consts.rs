//! Shared numeric constants for the canvas crate.

// ── Sampling ────────────────────────────────────────────────────

/// Samples per trajectory, identical for every path family.
pub const TRAJECTORY_SAMPLES: usize = 100;

/// Samples used to draw the parabola in the zoomable editor.
pub const EDITOR_PARABOLA_SAMPLES: usize = 160;

/// Half-width of the x range covered by the editor parabola, in meters.
pub const EDITOR_PARABOLA_HALF_SPAN: f64 = 40.0;

// ── Parameter bounds ────────────────────────────────────────────

/// Minimum closest-approach distance for a straight path, in meters.
pub const STRAIGHT_H_MIN: f64 = 0.1;

/// Maximum closest-approach distance for a straight path, in meters.
pub const STRAIGHT_H_MAX: f64 = 1000.0;

/// Symmetric limit on the straight path angle, in degrees.
pub const ANGLE_LIMIT_DEG: f64 = 45.0;

/// Upper bound of the parabola curvature slider.
pub const CURVATURE_MAX: f64 = 0.5;

/// Bound on speed, duration and Bézier coordinates. Keeps every sampled
/// position finite.
pub const WORLD_LIMIT: f64 = 1e6;

/// Decimal places kept on dragged values.
pub const DRAG_DECIMALS: i32 = 2;

/// Decimal places kept on curvature slider values.
pub const CURVATURE_DECIMALS: i32 = 3;

// ── Defaults ────────────────────────────────────────────────────

pub const DEFAULT_SPEED: f64 = 20.0;
pub const DEFAULT_DURATION: f64 = 5.0;
pub const DEFAULT_H: f64 = 10.0;
pub const DEFAULT_ANGLE_DEG: f64 = 0.0;
pub const DEFAULT_CURVATURE: f64 = 0.1;

/// Default Bézier control points `P0..P3` as `(x, y)` in meters.
pub const DEFAULT_BEZIER: [(f64, f64); 4] = [(-30.0, 20.0), (-10.0, -10.0), (10.0, -10.0), (30.0, 20.0)];

// ── Zoom ────────────────────────────────────────────────────────

/// Initial editor zoom in pixels per meter.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Smallest zoom the editor accepts.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest zoom the editor accepts.
pub const ZOOM_MAX: f64 = 15.0;

/// Zoom slider step.
pub const ZOOM_STEP: f64 = 0.1;

// ── Preview ─────────────────────────────────────────────────────

/// Padding between the fitted trajectory and the preview canvas edge, in pixels.
pub const PREVIEW_PADDING_PX: f64 = 40.0;

/// Upper bound on the autoscaled preview zoom, in pixels per meter.
pub const PREVIEW_MAX_SCALE: f64 = 4.0;

/// Floor applied to a degenerate bounding-box extent, in meters.
pub const MIN_BOX_EXTENT: f64 = 1.0;

/// Multiplier applied to the next-sample vector when drawing the heading arrow.
pub const HEADING_GAIN: f64 = 3.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit radius of a drag handle in pixels (the handle's outer halo).
pub const HANDLE_RADIUS_PX: f64 = 20.0;

/// Drawn radius of the solid handle dot in pixels.
pub const HANDLE_DOT_PX: f64 = 12.0;
