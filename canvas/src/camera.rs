#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::cell::Cell;
use std::ops::{Add, Sub};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A point (or vector) in either canvas or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product, treating both points as vectors.
    #[must_use]
    pub fn dot(self, other: Point) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Canvas size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel position of the canvas center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// World/canvas transform for one frame.
///
/// World space is meters with Y up and the observer at the origin. Canvas space
/// is CSS pixels with Y down. `scale` is pixels per meter and must be non-zero;
/// the transform itself never clamps it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Point,
    pub scale: f64,
}

impl Camera {
    #[must_use]
    pub fn new(center: Point, scale: f64) -> Self {
        Self { center, scale }
    }

    /// Camera centered on `viewport` at the given zoom.
    #[must_use]
    pub fn for_viewport(viewport: Viewport, scale: f64) -> Self {
        Self { center: viewport.center(), scale }
    }

    /// Convert a world-space point (meters) to canvas coordinates (pixels).
    #[must_use]
    pub fn to_canvas(&self, world: Point) -> Point {
        Point {
            x: self.center.x + world.x * self.scale,
            y: self.center.y - world.y * self.scale,
        }
    }

    /// Convert a canvas-space point (pixels) to world coordinates (meters).
    #[must_use]
    pub fn to_world(&self, canvas: Point) -> Point {
        Point {
            x: (canvas.x - self.center.x) / self.scale,
            y: (self.center.y - canvas.y) / self.scale,
        }
    }

    /// Convert a screen-space drag delta (pixels, Y down) to a world delta (meters, Y up).
    #[must_use]
    pub fn screen_delta_to_world(&self, delta: Point) -> Point {
        Point { x: delta.x / self.scale, y: -delta.y / self.scale }
    }
}

/// Where the editor zoom lives.
///
/// A standalone editor owns its zoom; an editor embedded in a parent screen can
/// share a cell with the parent so the zoom survives switching path families.
/// Either way the value is read once per event into a [`Camera`].
#[derive(Debug, Clone)]
pub enum ZoomHandle {
    Local(f64),
    Shared(Rc<Cell<f64>>),
}

impl ZoomHandle {
    #[must_use]
    pub fn get(&self) -> f64 {
        match self {
            Self::Local(scale) => *scale,
            Self::Shared(cell) => cell.get(),
        }
    }

    pub fn set(&mut self, scale: f64) {
        match self {
            Self::Local(current) => *current = scale,
            Self::Shared(cell) => cell.set(scale),
        }
    }
}

impl Default for ZoomHandle {
    fn default() -> Self {
        Self::Local(crate::consts::DEFAULT_ZOOM)
    }
}
