//! Playback progress and the animated preview marker.
//!
//! The host reports audio status ticks; [`PlaybackState`] turns them into a
//! progress fraction, and [`sample_index`] maps that fraction to a trajectory
//! sample. While audio is stopped the marker rests at the closest approach.

#[cfg(test)]
#[path = "playback_test.rs"]
mod playback_test;

use serde::Serialize;

use crate::camera::{Point, Viewport};
use crate::consts::HEADING_GAIN;
use crate::params::PathParameters;
use crate::project::{Projection, project};
use crate::sample::sample;

/// Sample index for a playback fraction: `floor(p · (n − 1))`, clamped.
///
/// `progress` is clamped into `[0, 1]` and NaN reads as 0. Returns 0 for
/// `n == 0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn sample_index(progress: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let last = n - 1;
    let index = (p * last as f64).floor() as usize;
    index.min(last)
}

/// Audio playback as seen by the preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Fraction of the clip played, in `[0, 1]`.
    pub progress: f64,
}

impl PlaybackState {
    /// Apply one status tick from the audio player.
    pub fn on_status(&mut self, position_ms: f64, duration_ms: f64, is_playing: bool, just_finished: bool) {
        if just_finished {
            tracing::debug!("playback finished");
            self.stop();
            return;
        }
        self.is_playing = is_playing;
        if duration_ms > 0.0 && position_ms.is_finite() {
            self.progress = (position_ms / duration_ms).clamp(0.0, 1.0);
        }
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.progress = 0.0;
    }

    /// Back to the start without changing the playing flag.
    pub fn rewind(&mut self) {
        self.progress = 0.0;
    }

    /// Sample shown for `n` samples: the playback index while playing,
    /// otherwise `closest`.
    #[must_use]
    pub fn display_index(&self, closest: Option<usize>, n: usize) -> Option<usize> {
        if self.is_playing && n > 0 { Some(sample_index(self.progress, n)) } else { closest }
    }
}

/// The moving source marker drawn on the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub index: usize,
    pub canvas_position: Point,
    /// Distance from the observer in meters.
    pub distance_m: f64,
    /// Canvas vector toward the next sample, scaled by [`HEADING_GAIN`].
    /// Only present while playing and not at the last sample.
    pub heading: Option<Point>,
}

impl Marker {
    /// Marker at `index` of `projection`, or `None` when the index is out of range.
    #[must_use]
    pub fn at(projection: &Projection, index: usize, playing: bool) -> Option<Self> {
        let points = &projection.canvas_points;
        let canvas_position = *points.get(index)?;
        let distance_m = canvas_position.distance_to(projection.observer) / projection.scale;
        let heading = if playing {
            points.get(index + 1).map(|next| (*next - canvas_position).scaled(HEADING_GAIN))
        } else {
            None
        };
        Some(Self { index, canvas_position, distance_m, heading })
    }
}

/// Everything the static/animated preview draws for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub projection: Projection,
    pub closest_index: Option<usize>,
    pub marker: Option<Marker>,
    /// Distance travelled over the clip, `speed · duration`.
    pub path_length_m: f64,
}

impl Preview {
    #[must_use]
    pub fn build(params: &PathParameters, viewport: Viewport, playback: &PlaybackState) -> Self {
        let projection = project(&sample(params), viewport);
        let closest_index = projection.closest_index();
        let n = projection.canvas_points.len();
        let marker = playback
            .display_index(closest_index, n)
            .and_then(|index| Marker::at(&projection, index, playback.is_playing));
        Self { projection, closest_index, marker, path_length_m: params.speed() * params.duration() }
    }
}
