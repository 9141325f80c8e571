//! Trajectory sampling.
//!
//! Every path family is sampled at [`TRAJECTORY_SAMPLES`] points. Straight and
//! parabolic paths are parameterized by time over a window centered on the
//! closest approach; Bézier paths by the curve parameter `u ∈ [0, 1]`.

#[cfg(test)]
#[path = "sample_test.rs"]
mod sample_test;

use crate::camera::Point;
use crate::consts::{EDITOR_PARABOLA_HALF_SPAN, EDITOR_PARABOLA_SAMPLES, TRAJECTORY_SAMPLES};
use crate::params::{ParabolaParams, PathParameters};

/// Sample the trajectory at [`TRAJECTORY_SAMPLES`] points.
#[must_use]
pub fn sample(params: &PathParameters) -> Vec<Point> {
    sample_n(params, TRAJECTORY_SAMPLES)
}

/// Sample the trajectory at `count` points, first to last in travel order.
///
/// Parameters are clamped first, so hand-built values outside the working
/// range still sample to finite points.
#[must_use]
pub fn sample_n(params: &PathParameters, count: usize) -> Vec<Point> {
    match params.clamped() {
        PathParameters::Straight(p) => {
            let half = p.duration / 2.0;
            spread(count).map(|f| p.position_at(f.mul_add(p.duration, -half))).collect()
        }
        PathParameters::Parabola(p) => {
            let half = p.duration / 2.0;
            spread(count).map(|f| p.position_at(f.mul_add(p.duration, -half))).collect()
        }
        PathParameters::Bezier(p) => spread(count).map(|u| p.point_at(u)).collect(),
    }
}

/// The parabola as drawn in the zoomable editor: a fixed x span around the
/// vertex, independent of speed and duration.
#[must_use]
pub fn editor_parabola(params: &ParabolaParams) -> Vec<Point> {
    spread(EDITOR_PARABOLA_SAMPLES)
        .map(|f| {
            let x = f.mul_add(2.0 * EDITOR_PARABOLA_HALF_SPAN, -EDITOR_PARABOLA_HALF_SPAN);
            Point::new(x, params.y_at(x))
        })
        .collect()
}

/// `count` evenly spaced fractions from 0 to 1 inclusive. A single sample sits
/// at the midpoint.
#[allow(clippy::cast_precision_loss)]
fn spread(count: usize) -> impl Iterator<Item = f64> {
    let last = count.saturating_sub(1);
    (0..count).map(move |i| if last == 0 { 0.5 } else { i as f64 / last as f64 })
}
