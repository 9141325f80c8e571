//! Render-ready view of the zoomable editor.
//!
//! Everything here is in canvas pixels for one [`Camera`]; the renderer only
//! strokes and fills what it is given.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::camera::{Camera, Point};
use crate::drag::Handle;
use crate::hit::handle_canvas_positions;
use crate::params::{PathKind, PathParameters};
use crate::sample::{editor_parabola, sample};

/// What the zoomable editor draws for the current parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorScene {
    pub kind: PathKind,
    /// The world origin on the canvas.
    pub observer: Point,
    /// Path polyline.
    pub path: Vec<Point>,
    /// Bézier control polygon `P0 → P1 → P2 → P3`; empty for other families.
    pub control_polygon: Vec<Point>,
    /// Straight paths: dashed line from the observer to the closest point.
    pub guide: Option<(Point, Point)>,
    /// Handle centers in hit-test priority order.
    #[serde(skip)]
    pub handles: Vec<(Handle, Point)>,
    /// Pixels per meter.
    pub scale: f64,
}

impl EditorScene {
    #[must_use]
    pub fn build(params: &PathParameters, camera: &Camera) -> Self {
        let observer = camera.to_canvas(Point::default());
        let to_canvas = |points: Vec<Point>| points.into_iter().map(|p| camera.to_canvas(p)).collect::<Vec<_>>();

        let (path, control_polygon, guide) = match params {
            PathParameters::Straight(p) => {
                let (start, end) = p.endpoints();
                let closest = camera.to_canvas(p.closest_point());
                (to_canvas(vec![start, end]), Vec::new(), Some((observer, closest)))
            }
            PathParameters::Parabola(p) => (to_canvas(editor_parabola(p)), Vec::new(), None),
            PathParameters::Bezier(p) => (to_canvas(sample(params)), to_canvas(p.points().to_vec()), None),
        };

        Self {
            kind: params.kind(),
            observer,
            path,
            control_polygon,
            guide,
            handles: handle_canvas_positions(params, camera),
            scale: camera.scale,
        }
    }
}
