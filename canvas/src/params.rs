//! Path parameter model: path families, their parameters, and sparse patches.
//!
//! This module defines what a motion path *is* (`PathParameters`, one variant
//! per `PathKind`), the sparse-update type produced by drag handles and sliders
//! (`ParamPatch`), and a lenient accessor for the loosely typed form record the
//! host keeps (`Fields`).
//!
//! Every value that enters a `PathParameters` passes through the clamp rules
//! here, so the rest of the crate can assume finite, in-range parameters.
//! Nothing in this module fails: missing or malformed input resolves to the
//! documented default and out-of-range input is clamped.

#[cfg(test)]
#[path = "params_test.rs"]
mod params_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{
    ANGLE_LIMIT_DEG, CURVATURE_MAX, DEFAULT_ANGLE_DEG, DEFAULT_BEZIER, DEFAULT_CURVATURE, DEFAULT_DURATION, DEFAULT_H,
    DEFAULT_SPEED, STRAIGHT_H_MAX, STRAIGHT_H_MIN, WORLD_LIMIT,
};

/// The path family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Straight line passing the observer at closest distance `h`.
    #[default]
    Straight,
    /// Parabola `y = a·x² + h` centered on the Y axis.
    Parabola,
    /// Cubic Bézier curve through four free points.
    Bezier,
}

impl PathKind {
    pub const ALL: [PathKind; 3] = [Self::Straight, Self::Parabola, Self::Bezier];

    /// Path id as used by the simulation service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Parabola => "parabola",
            Self::Bezier => "bezier",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a path id is not one of the known families.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown path kind `{0}` (expected straight, parabola or bezier)")]
pub struct UnknownPathKind(pub String);

impl FromStr for PathKind {
    type Err = UnknownPathKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == wanted).ok_or_else(|| UnknownPathKind(s.to_owned()))
    }
}

/// One of the four Bézier points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlPoint {
    /// Start of the path.
    P0,
    /// First control point.
    P1,
    /// Second control point.
    P2,
    /// End of the path.
    P3,
}

impl ControlPoint {
    pub const ALL: [ControlPoint; 4] = [Self::P0, Self::P1, Self::P2, Self::P3];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::P0 => 0,
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
        }
    }

    /// Form keys holding this point's coordinates.
    #[must_use]
    pub fn field_keys(self) -> (&'static str, &'static str) {
        match self {
            Self::P0 => ("x0", "y0"),
            Self::P1 => ("x1", "y1"),
            Self::P2 => ("x2", "y2"),
            Self::P3 => ("x3", "y3"),
        }
    }
}

// =============================================================
// Family parameters
// =============================================================

/// Straight line passing the observer.
///
/// `h` is the closest-approach distance and `angle_deg` tilts the line away from
/// horizontal. The closest point sits on the outward normal `(sinθ, cosθ)`, so
/// at 0° the path is the horizontal line `y = h`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StraightParams {
    pub h: f64,
    pub angle_deg: f64,
    pub speed: f64,
    pub duration: f64,
}

impl StraightParams {
    #[must_use]
    pub fn angle_rad(&self) -> f64 {
        self.angle_deg.to_radians()
    }

    /// Outward unit normal from the observer to the path.
    #[must_use]
    pub fn normal(&self) -> Point {
        let (sin, cos) = self.angle_rad().sin_cos();
        Point::new(sin, cos)
    }

    /// Unit direction of travel.
    #[must_use]
    pub fn direction(&self) -> Point {
        let (sin, cos) = self.angle_rad().sin_cos();
        Point::new(cos, sin)
    }

    /// Point of closest approach to the observer.
    #[must_use]
    pub fn closest_point(&self) -> Point {
        self.normal().scaled(self.h)
    }

    /// Distance travelled on each side of the closest point.
    #[must_use]
    pub fn half_length(&self) -> f64 {
        self.speed * self.duration / 2.0
    }

    /// Start and end of the path, symmetric about the closest point.
    #[must_use]
    pub fn endpoints(&self) -> (Point, Point) {
        let closest = self.closest_point();
        let offset = self.direction().scaled(self.half_length());
        (closest - offset, closest + offset)
    }

    /// Source position `t` seconds after closest approach.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point {
        let travelled = self.speed * t;
        let (sin, cos) = self.angle_rad().sin_cos();
        Point::new(travelled * cos, travelled.mul_add(sin, self.h))
    }

    fn clamped(self) -> Self {
        Self {
            h: clamp_straight_h(finite_or(self.h, DEFAULT_H)),
            angle_deg: clamp_angle(finite_or(self.angle_deg, DEFAULT_ANGLE_DEG)),
            speed: clamp_world(finite_or(self.speed, DEFAULT_SPEED)),
            duration: clamp_world(finite_or(self.duration, DEFAULT_DURATION)),
        }
    }
}

impl Default for StraightParams {
    fn default() -> Self {
        Self { h: DEFAULT_H, angle_deg: DEFAULT_ANGLE_DEG, speed: DEFAULT_SPEED, duration: DEFAULT_DURATION }
    }
}

/// Parabola `y = a·x² + h` traversed at constant horizontal speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParabolaParams {
    pub a: f64,
    pub h: f64,
    pub speed: f64,
    pub duration: f64,
}

impl ParabolaParams {
    /// The vertex, always on the Y axis.
    #[must_use]
    pub fn vertex(&self) -> Point {
        Point::new(0.0, self.h)
    }

    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.a.mul_add(x * x, self.h)
    }

    /// Source position `t` seconds after passing the vertex.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point {
        let x = self.speed * t;
        Point::new(x, self.y_at(x))
    }

    fn clamped(self) -> Self {
        Self {
            a: clamp_curvature(finite_or(self.a, DEFAULT_CURVATURE)),
            h: floor_parabola_h(finite_or(self.h, DEFAULT_H)),
            speed: clamp_world(finite_or(self.speed, DEFAULT_SPEED)),
            duration: clamp_world(finite_or(self.duration, DEFAULT_DURATION)),
        }
    }
}

impl Default for ParabolaParams {
    fn default() -> Self {
        Self { a: DEFAULT_CURVATURE, h: DEFAULT_H, speed: DEFAULT_SPEED, duration: DEFAULT_DURATION }
    }
}

/// Cubic Bézier path. `speed` and `duration` are carried for the simulation
/// request only; they do not change the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierParams {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub speed: f64,
    pub duration: f64,
}

impl BezierParams {
    #[must_use]
    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    #[must_use]
    pub fn point(&self, which: ControlPoint) -> Point {
        self.points()[which.index()]
    }

    pub fn set_point(&mut self, which: ControlPoint, point: Point) {
        match which {
            ControlPoint::P0 => self.p0 = point,
            ControlPoint::P1 => self.p1 = point,
            ControlPoint::P2 => self.p2 = point,
            ControlPoint::P3 => self.p3 = point,
        }
    }

    /// Evaluate the curve at `u ∈ [0, 1]` with the cubic Bernstein basis.
    #[must_use]
    pub fn point_at(&self, u: f64) -> Point {
        let v = 1.0 - u;
        let b0 = v * v * v;
        let b1 = 3.0 * v * v * u;
        let b2 = 3.0 * v * u * u;
        let b3 = u * u * u;
        Point::new(
            b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x + b3 * self.p3.x,
            b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y + b3 * self.p3.y,
        )
    }

    fn clamped(self) -> Self {
        let [d0, d1, d2, d3] = default_bezier_points();
        Self {
            p0: finite_point_or(self.p0, d0),
            p1: finite_point_or(self.p1, d1),
            p2: finite_point_or(self.p2, d2),
            p3: finite_point_or(self.p3, d3),
            speed: clamp_world(finite_or(self.speed, DEFAULT_SPEED)),
            duration: clamp_world(finite_or(self.duration, DEFAULT_DURATION)),
        }
    }
}

impl Default for BezierParams {
    fn default() -> Self {
        let [p0, p1, p2, p3] = default_bezier_points();
        Self { p0, p1, p2, p3, speed: DEFAULT_SPEED, duration: DEFAULT_DURATION }
    }
}

fn default_bezier_points() -> [Point; 4] {
    DEFAULT_BEZIER.map(|(x, y)| Point::new(x, y))
}

// =============================================================
// PathParameters
// =============================================================

/// A complete, validated path description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "lowercase")]
pub enum PathParameters {
    Straight(StraightParams),
    Parabola(ParabolaParams),
    Bezier(BezierParams),
}

impl Default for PathParameters {
    fn default() -> Self {
        Self::Straight(StraightParams::default())
    }
}

impl PathParameters {
    /// Default parameters for a path family.
    #[must_use]
    pub fn default_for(kind: PathKind) -> Self {
        match kind {
            PathKind::Straight => Self::Straight(StraightParams::default()),
            PathKind::Parabola => Self::Parabola(ParabolaParams::default()),
            PathKind::Bezier => Self::Bezier(BezierParams::default()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PathKind {
        match self {
            Self::Straight(_) => PathKind::Straight,
            Self::Parabola(_) => PathKind::Parabola,
            Self::Bezier(_) => PathKind::Bezier,
        }
    }

    /// Source speed in m/s.
    #[must_use]
    pub fn speed(&self) -> f64 {
        match self {
            Self::Straight(p) => p.speed,
            Self::Parabola(p) => p.speed,
            Self::Bezier(p) => p.speed,
        }
    }

    /// Audio duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        match self {
            Self::Straight(p) => p.duration,
            Self::Parabola(p) => p.duration,
            Self::Bezier(p) => p.duration,
        }
    }

    /// Re-apply every clamp and default rule.
    #[must_use]
    pub fn clamped(self) -> Self {
        match self {
            Self::Straight(p) => Self::Straight(p.clamped()),
            Self::Parabola(p) => Self::Parabola(p.clamped()),
            Self::Bezier(p) => Self::Bezier(p.clamped()),
        }
    }

    /// Resolve parameters for `kind` from a loosely typed form record.
    ///
    /// Each field falls back to its default when missing, unparsable or
    /// non-finite, and the result is clamped.
    #[must_use]
    pub fn from_fields(kind: PathKind, record: &serde_json::Value) -> Self {
        let fields = Fields::new(record);
        let speed = fields.number("speed", DEFAULT_SPEED);
        let duration = fields.number("audio_duration", DEFAULT_DURATION);

        let params = match kind {
            PathKind::Straight => Self::Straight(StraightParams {
                h: fields.number("h", DEFAULT_H),
                angle_deg: fields.number("angle", DEFAULT_ANGLE_DEG),
                speed,
                duration,
            }),
            PathKind::Parabola => Self::Parabola(ParabolaParams {
                a: fields.number("a", DEFAULT_CURVATURE),
                h: fields.number("h", DEFAULT_H),
                speed,
                duration,
            }),
            PathKind::Bezier => {
                let defaults = default_bezier_points();
                let mut bezier = BezierParams { speed, duration, ..BezierParams::default() };
                for which in ControlPoint::ALL {
                    let (kx, ky) = which.field_keys();
                    let fallback = defaults[which.index()];
                    let point = Point::new(fields.number(kx, fallback.x), fields.number(ky, fallback.y));
                    bezier.set_point(which, point);
                }
                Self::Bezier(bezier)
            }
        };
        params.clamped()
    }

    /// The form record for these parameters, using the service's field names.
    #[must_use]
    pub fn to_fields(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in self.path_fields() {
            map.insert(key.to_owned(), serde_json::Value::from(value));
        }
        map.insert("speed".to_owned(), serde_json::Value::from(self.speed()));
        map.insert("audio_duration".to_owned(), serde_json::Value::from(self.duration()));
        serde_json::Value::Object(map)
    }

    /// Family-specific fields as `(service key, value)` pairs.
    #[must_use]
    pub fn path_fields(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::Straight(p) => vec![("h", p.h), ("angle", p.angle_deg)],
            Self::Parabola(p) => vec![("a", p.a), ("h", p.h)],
            Self::Bezier(p) => ControlPoint::ALL
                .iter()
                .flat_map(|&which| {
                    let (kx, ky) = which.field_keys();
                    let point = p.point(which);
                    [(kx, point.x), (ky, point.y)]
                })
                .collect(),
        }
    }

    /// Merge a sparse patch into these parameters.
    ///
    /// Only fields that exist on the current family are applied; the rest are
    /// ignored. Applied values go through the clamp rules and non-finite values
    /// are dropped. Returns `true` if at least one field was applied.
    pub fn apply_patch(&mut self, patch: &ParamPatch) -> bool {
        let mut applied = false;
        let mut take = |slot: &mut f64, value: Option<f64>, rule: fn(f64) -> f64| {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *slot = rule(v);
                applied = true;
            }
        };

        match self {
            Self::Straight(p) => {
                take(&mut p.h, patch.h, clamp_straight_h);
                take(&mut p.angle_deg, patch.angle_deg, clamp_angle);
                take(&mut p.speed, patch.speed, clamp_world);
                take(&mut p.duration, patch.duration, clamp_world);
            }
            Self::Parabola(p) => {
                take(&mut p.a, patch.a, clamp_curvature);
                take(&mut p.h, patch.h, floor_parabola_h);
                take(&mut p.speed, patch.speed, clamp_world);
                take(&mut p.duration, patch.duration, clamp_world);
            }
            Self::Bezier(p) => {
                take(&mut p.speed, patch.speed, clamp_world);
                take(&mut p.duration, patch.duration, clamp_world);
                for which in ControlPoint::ALL {
                    if let Some(point) = patch.point(which).filter(|q| q.x.is_finite() && q.y.is_finite()) {
                        p.set_point(which, clamp_world_point(point));
                        applied = true;
                    }
                }
            }
        }

        if !applied && !patch.is_empty() {
            tracing::trace!(kind = %self.kind(), ?patch, "patch carried no fields for this path family");
        }
        applied
    }
}

// =============================================================
// ParamPatch
// =============================================================

/// Sparse update for path parameters. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamPatch {
    /// Closest distance (straight) or vertex height (parabola).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Straight path angle in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_deg: Option<f64>,
    /// Parabola curvature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p0: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p1: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p2: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p3: Option<Point>,
}

impl ParamPatch {
    /// Patch that moves one Bézier point.
    #[must_use]
    pub fn control(which: ControlPoint, point: Point) -> Self {
        let mut patch = Self::default();
        match which {
            ControlPoint::P0 => patch.p0 = Some(point),
            ControlPoint::P1 => patch.p1 = Some(point),
            ControlPoint::P2 => patch.p2 = Some(point),
            ControlPoint::P3 => patch.p3 = Some(point),
        }
        patch
    }

    #[must_use]
    pub fn point(&self, which: ControlPoint) -> Option<Point> {
        match which {
            ControlPoint::P0 => self.p0,
            ControlPoint::P1 => self.p1,
            ControlPoint::P2 => self.p2,
            ControlPoint::P3 => self.p3,
        }
    }

    /// Returns `true` if the patch carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================
// Fields
// =============================================================

/// Typed, lenient access to a loosely typed form record.
///
/// The host's manual-entry form keeps values as strings while handles write
/// numbers back into the same record, so both are accepted.
pub struct Fields<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Fields<'a> {
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Numeric value of `key`, or `default` when missing, unparsable or non-finite.
    #[must_use]
    pub fn number(&self, key: &str, default: f64) -> f64 {
        let parsed = match self.value.get(key) {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => None,
            },
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(default)
    }
}

// =============================================================
// Clamp rules
// =============================================================

/// Clamp a straight path distance into `[0.1, 1000]`.
#[must_use]
pub fn clamp_straight_h(h: f64) -> f64 {
    h.clamp(STRAIGHT_H_MIN, STRAIGHT_H_MAX)
}

/// Clamp an angle into `[-45, 45]` degrees.
#[must_use]
pub fn clamp_angle(angle_deg: f64) -> f64 {
    angle_deg.clamp(-ANGLE_LIMIT_DEG, ANGLE_LIMIT_DEG)
}

/// Floor a parabola vertex height at 0.
#[must_use]
pub fn floor_parabola_h(h: f64) -> f64 {
    h.max(0.0)
}

/// Clamp a parabola curvature into `[0, 0.5]`.
#[must_use]
pub fn clamp_curvature(a: f64) -> f64 {
    a.clamp(0.0, CURVATURE_MAX)
}

/// Round to a fixed number of decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// Bound a speed, duration or Bézier coordinate to `[-1e6, 1e6]`.
#[must_use]
pub fn clamp_world(value: f64) -> f64 {
    value.clamp(-WORLD_LIMIT, WORLD_LIMIT)
}

fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() { value } else { default }
}

fn finite_point_or(point: Point, default: Point) -> Point {
    clamp_world_point(Point::new(finite_or(point.x, default.x), finite_or(point.y, default.y)))
}

fn clamp_world_point(point: Point) -> Point {
    Point::new(clamp_world(point.x), clamp_world(point.y))
}
