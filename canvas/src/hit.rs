#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::drag::{Handle, handle_position};
use crate::params::PathParameters;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub handle: Handle,
    /// Handle center in canvas pixels.
    pub canvas_position: Point,
    /// Distance from the pointer to the handle center in pixels.
    pub distance_px: f64,
}

/// Canvas positions of every handle on the current path, in priority order.
#[must_use]
pub fn handle_canvas_positions(params: &PathParameters, camera: &Camera) -> Vec<(Handle, Point)> {
    Handle::for_kind(params.kind())
        .iter()
        .filter_map(|&handle| handle_position(params, handle).map(|world| (handle, camera.to_canvas(world))))
        .collect()
}

/// Find the handle under `canvas_pt`.
///
/// A handle is hit within [`HANDLE_RADIUS_PX`] of its center. When several
/// overlap the nearest wins; exact ties go to the earlier handle.
#[must_use]
pub fn hit_test(canvas_pt: Point, params: &PathParameters, camera: &Camera) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for (handle, canvas_position) in handle_canvas_positions(params, camera) {
        let distance_px = canvas_pt.distance_to(canvas_position);
        if distance_px > HANDLE_RADIUS_PX {
            continue;
        }
        if best.is_none_or(|b| distance_px < b.distance_px) {
            best = Some(Hit { handle, canvas_position, distance_px });
        }
    }
    best
}
