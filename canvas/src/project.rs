//! Autoscaling preview projection.
//!
//! Fits a sampled trajectory, together with the observer at the world origin,
//! into a canvas with a fixed pixel padding. The fitted box is centered on the
//! canvas and the zoom is capped so short paths are not blown up.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use serde::Serialize;

use crate::camera::{Camera, Point, Viewport};
use crate::consts::{MIN_BOX_EXTENT, PREVIEW_MAX_SCALE, PREVIEW_PADDING_PX};

/// World-space bounding box accumulator. Always contains the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// A box holding only the origin.
    #[must_use]
    pub fn new() -> Self {
        Self { min_x: 0.0, max_x: 0.0, min_y: 0.0, max_y: 0.0 }
    }

    /// Box over `points` and the origin.
    #[must_use]
    pub fn around(points: &[Point]) -> Self {
        let mut bounds = Self::new();
        for p in points {
            bounds.update(*p);
        }
        bounds
    }

    pub fn update(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Box width, floored at [`MIN_BOX_EXTENT`].
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(MIN_BOX_EXTENT)
    }

    /// Box height, floored at [`MIN_BOX_EXTENT`].
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(MIN_BOX_EXTENT)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// A trajectory fitted into a preview canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Samples in canvas pixels, same order as the input.
    pub canvas_points: Vec<Point>,
    /// The observer (world origin) in canvas pixels.
    pub observer: Point,
    /// Pixels per meter.
    pub scale: f64,
}

impl Projection {
    /// Index of the sample nearest the observer.
    #[must_use]
    pub fn closest_index(&self) -> Option<usize> {
        closest_approach_index(&self.canvas_points, self.observer)
    }
}

/// Camera that fits `bounds` into `viewport` with the preview padding.
///
/// The usable area is floored at one pixel per axis so a canvas smaller than
/// the padding still yields a positive scale. An unbounded box falls back to
/// the maximum scale around the origin.
#[must_use]
pub fn fit_camera(bounds: &Bounds, viewport: Viewport) -> Camera {
    let usable_w = (viewport.width - 2.0 * PREVIEW_PADDING_PX).max(1.0);
    let usable_h = (viewport.height - 2.0 * PREVIEW_PADDING_PX).max(1.0);
    let fitted = (usable_w / bounds.width()).min(usable_h / bounds.height()).min(PREVIEW_MAX_SCALE);
    let scale = if fitted.is_finite() && fitted > 0.0 { fitted } else { PREVIEW_MAX_SCALE };

    let mid = bounds.center();
    let mid = if mid.x.is_finite() && mid.y.is_finite() { mid } else { Point::default() };
    let screen_mid = viewport.center();
    let center = Point::new(mid.x.mul_add(-scale, screen_mid.x), mid.y.mul_add(scale, screen_mid.y));
    Camera::new(center, scale)
}

/// Fit world-space `points` and the observer into `viewport`.
#[must_use]
pub fn project(points: &[Point], viewport: Viewport) -> Projection {
    let camera = fit_camera(&Bounds::around(points), viewport);
    Projection {
        canvas_points: points.iter().map(|p| camera.to_canvas(*p)).collect(),
        observer: camera.to_canvas(Point::default()),
        scale: camera.scale,
    }
}

/// Index of the point nearest `observer`. The first of equally near points
/// wins; `None` for no points.
#[must_use]
pub fn closest_approach_index(points: &[Point], observer: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance_to(observer);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}
