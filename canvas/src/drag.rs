//! Drag handles and the drag-to-parameter mappers.
//!
//! Each path family exposes a fixed set of [`Handle`]s. A drag on a handle is
//! mapped to a [`ParamPatch`] by a pure function of the parameters captured when
//! the gesture was granted and the *cumulative* world-space delta since then.
//! Deltas are never accumulated onto the latest value.
//!
//! Mappers only emit the fields their handle owns, rounded to two decimals.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::camera::Point;
use crate::consts::DRAG_DECIMALS;
use crate::params::{
    BezierParams, ControlPoint, ParabolaParams, ParamPatch, PathKind, PathParameters, StraightParams, clamp_angle,
    clamp_straight_h, floor_parabola_h, round_to,
};

/// A draggable control bound to one or more path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Straight path: closest-approach point, drives `h`.
    Distance,
    /// Straight path: far endpoint, drives `angle_deg`.
    Angle,
    /// Parabola: vertex, drives `h`.
    Vertex,
    /// Bézier: one of the four points.
    Control(ControlPoint),
}

impl Handle {
    /// Handles available for a path family, in hit-test priority order.
    #[must_use]
    pub fn for_kind(kind: PathKind) -> &'static [Handle] {
        match kind {
            PathKind::Straight => &[Handle::Distance, Handle::Angle],
            PathKind::Parabola => &[Handle::Vertex],
            PathKind::Bezier => &[
                Handle::Control(ControlPoint::P0),
                Handle::Control(ControlPoint::P1),
                Handle::Control(ControlPoint::P2),
                Handle::Control(ControlPoint::P3),
            ],
        }
    }

    /// Whether this handle exists on the given path family.
    #[must_use]
    pub fn belongs_to(self, kind: PathKind) -> bool {
        Self::for_kind(kind).contains(&self)
    }
}

/// World-space position of `handle` for the given parameters, if the handle
/// belongs to the parameters' family.
#[must_use]
pub fn handle_position(params: &PathParameters, handle: Handle) -> Option<Point> {
    match (params, handle) {
        (PathParameters::Straight(p), Handle::Distance) => Some(p.closest_point()),
        (PathParameters::Straight(p), Handle::Angle) => Some(p.endpoints().1),
        (PathParameters::Parabola(p), Handle::Vertex) => Some(p.vertex()),
        (PathParameters::Bezier(p), Handle::Control(which)) => Some(p.point(which)),
        _ => None,
    }
}

// =============================================================
// DragSession
// =============================================================

/// An active drag on one handle.
///
/// Created on grant with a copy of the parameters at that moment and dropped
/// when the gesture ends. Every move is mapped from this snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    handle: Handle,
    start: PathParameters,
}

impl DragSession {
    /// Start a drag on `handle`. Returns `None` if the handle does not belong to
    /// the current path family.
    #[must_use]
    pub fn grant(handle: Handle, params: &PathParameters) -> Option<Self> {
        if !handle.belongs_to(params.kind()) {
            tracing::debug!(?handle, kind = %params.kind(), "rejected drag on foreign handle");
            return None;
        }
        tracing::debug!(?handle, kind = %params.kind(), "drag granted");
        Some(Self { handle, start: *params })
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Map the cumulative world-space delta since grant to a patch.
    #[must_use]
    pub fn update(&self, total_delta_world: Point) -> ParamPatch {
        let patch = map_drag(&self.start, self.handle, total_delta_world);
        tracing::trace!(handle = ?self.handle, ?total_delta_world, ?patch, "drag mapped");
        patch
    }
}

// =============================================================
// Mappers
// =============================================================

/// Map a drag of `handle` by `delta_world` (cumulative, meters, Y up) starting
/// from `start` to a patch. Returns an empty patch for a foreign handle.
#[must_use]
pub fn map_drag(start: &PathParameters, handle: Handle, delta_world: Point) -> ParamPatch {
    match (start, handle) {
        (PathParameters::Straight(p), Handle::Distance) => {
            ParamPatch { h: Some(map_distance(p, delta_world)), ..ParamPatch::default() }
        }
        (PathParameters::Straight(p), Handle::Angle) => {
            ParamPatch { angle_deg: Some(map_angle(p, delta_world)), ..ParamPatch::default() }
        }
        (PathParameters::Parabola(p), Handle::Vertex) => {
            ParamPatch { h: Some(map_vertex(p, delta_world)), ..ParamPatch::default() }
        }
        (PathParameters::Bezier(p), Handle::Control(which)) => {
            ParamPatch::control(which, map_control(p, which, delta_world))
        }
        _ => ParamPatch::default(),
    }
}

/// Distance handle: project the delta on the outward normal and add it to `h`.
#[must_use]
pub fn map_distance(start: &StraightParams, delta_world: Point) -> f64 {
    let radial = delta_world.dot(start.normal());
    round_to(clamp_straight_h(start.h + radial), DRAG_DECIMALS)
}

/// Angle handle: rotate the far endpoint about the closest point.
///
/// The candidate endpoint is the grant-time endpoint moved by the delta; the new
/// angle is its bearing from the grant-time closest point, clamped to ±45°.
#[must_use]
pub fn map_angle(start: &StraightParams, delta_world: Point) -> f64 {
    let pivot = start.closest_point();
    let candidate = start.endpoints().1 + delta_world;
    let v = candidate - pivot;
    if v == Point::default() {
        return round_to(start.angle_deg, DRAG_DECIMALS);
    }
    let mut angle = v.y.atan2(v.x).to_degrees();
    if angle <= -180.0 {
        angle += 360.0;
    }
    if angle > 180.0 {
        angle -= 360.0;
    }
    round_to(clamp_angle(angle), DRAG_DECIMALS)
}

/// Vertex handle: only the vertical component moves the vertex; floored at 0.
#[must_use]
pub fn map_vertex(start: &ParabolaParams, delta_world: Point) -> f64 {
    round_to(floor_parabola_h(start.h + delta_world.y), DRAG_DECIMALS)
}

/// Bézier point: translate by the delta, unconstrained.
#[must_use]
pub fn map_control(start: &BezierParams, which: ControlPoint, delta_world: Point) -> Point {
    let moved = start.point(which) + delta_world;
    Point::new(round_to(moved.x, DRAG_DECIMALS), round_to(moved.y, DRAG_DECIMALS))
}
