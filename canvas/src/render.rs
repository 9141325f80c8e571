//! Rendering: draws the editor and preview scenes to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only scene values already in canvas pixels and produces
//! pixels; it does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Point, Viewport};
use crate::consts::{HANDLE_DOT_PX, HANDLE_RADIUS_PX};
use crate::drag::Handle;
use crate::params::ControlPoint;
use crate::playback::{Marker, Preview};
use crate::scene::EditorScene;

const AXIS_COLOR: &str = "#e0e0e0";
const PATH_COLOR: &str = "#2196F3";
const OBSERVER_COLOR: &str = "#FF5722";
const START_COLOR: &str = "#4CAF50";
const END_COLOR: &str = "#F44336";
const POLYGON_COLOR: &str = "#BDBDBD";
const LABEL_COLOR: &str = "#999";

/// Dash segment length for axes and guides, in pixels.
const DASH_PX: f64 = 5.0;

const OBSERVER_RADIUS_PX: f64 = 12.0;
const ENDPOINT_RADIUS_PX: f64 = 7.0;
const MARKER_RADIUS_PX: f64 = 10.0;

/// Draw the zoomable editor: axes, path, guide, handles and observer.
///
/// `viewport` is in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw_editor(
    ctx: &CanvasRenderingContext2d,
    scene: &EditorScene,
    viewport: Viewport,
    dpr: f64,
) -> Result<(), JsValue> {
    clear(ctx, viewport, dpr)?;
    draw_axes(ctx, scene.observer, viewport)?;

    if !scene.control_polygon.is_empty() {
        ctx.save();
        ctx.set_stroke_style_str(POLYGON_COLOR);
        ctx.set_line_width(1.0);
        stroke_polyline(ctx, &scene.control_polygon);
        ctx.restore();
    }

    ctx.save();
    ctx.set_stroke_style_str(PATH_COLOR);
    ctx.set_line_width(4.0);
    stroke_polyline(ctx, &scene.path);
    ctx.restore();

    if let Some((from, to)) = scene.guide {
        draw_dashed_line(ctx, from, to, START_COLOR)?;
    }

    fill_circle(ctx, scene.observer, OBSERVER_RADIUS_PX, OBSERVER_COLOR, 1.0)?;

    for &(handle, pos) in &scene.handles {
        let color = handle_color(handle);
        fill_circle(ctx, pos, HANDLE_RADIUS_PX, color, 0.25)?;
        fill_circle(ctx, pos, HANDLE_DOT_PX, color, 1.0)?;
    }

    Ok(())
}

/// Draw the autoscaled preview: axes, path, start/end markers, observer and
/// the moving marker with its guide line and heading.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw_preview(
    ctx: &CanvasRenderingContext2d,
    preview: &Preview,
    viewport: Viewport,
    dpr: f64,
) -> Result<(), JsValue> {
    let projection = &preview.projection;
    let observer = projection.observer;

    clear(ctx, viewport, dpr)?;
    draw_axes(ctx, observer, viewport)?;

    ctx.save();
    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.set_font("bold 12px sans-serif");
    ctx.fill_text("Y", observer.x + 10.0, 20.0)?;
    ctx.fill_text("X", viewport.width - 20.0, observer.y - 10.0)?;
    ctx.restore();

    ctx.save();
    ctx.set_stroke_style_str(PATH_COLOR);
    ctx.set_line_width(3.0);
    stroke_polyline(ctx, &projection.canvas_points);
    ctx.restore();

    let points = &projection.canvas_points;
    if let Some(&start) = points.first() {
        draw_labeled_dot(ctx, start, START_COLOR, "START")?;
    }
    if points.len() > 1 {
        if let Some(&end) = points.last() {
            draw_labeled_dot(ctx, end, END_COLOR, "END")?;
        }
    }

    if let Some(marker) = &preview.marker {
        draw_marker(ctx, marker, observer)?;
    }

    fill_circle(ctx, observer, OBSERVER_RADIUS_PX, OBSERVER_COLOR, 1.0)?;
    Ok(())
}

// =============================================================
// Pieces
// =============================================================

fn draw_marker(ctx: &CanvasRenderingContext2d, marker: &Marker, observer: Point) -> Result<(), JsValue> {
    let pos = marker.canvas_position;
    draw_dashed_line(ctx, observer, pos, OBSERVER_COLOR)?;

    if let Some(heading) = marker.heading {
        let tip = pos + heading;
        ctx.save();
        ctx.set_stroke_style_str(OBSERVER_COLOR);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(pos.x, pos.y);
        ctx.line_to(tip.x, tip.y);
        ctx.stroke();
        ctx.restore();
    }

    fill_circle(ctx, pos, MARKER_RADIUS_PX, PATH_COLOR, 1.0)?;

    ctx.save();
    ctx.set_fill_style_str(PATH_COLOR);
    ctx.set_font("11px sans-serif");
    ctx.fill_text(&format!("{:.1} m", marker.distance_m), pos.x + 14.0, pos.y - 14.0)?;
    ctx.restore();
    Ok(())
}

fn draw_labeled_dot(ctx: &CanvasRenderingContext2d, at: Point, color: &str, label: &str) -> Result<(), JsValue> {
    fill_circle(ctx, at, ENDPOINT_RADIUS_PX, color, 1.0)?;
    ctx.save();
    ctx.set_fill_style_str(color);
    ctx.set_font("bold 12px sans-serif");
    ctx.set_text_align("center");
    ctx.fill_text(label, at.x, at.y - 18.0)?;
    ctx.restore();
    Ok(())
}

fn handle_color(handle: Handle) -> &'static str {
    match handle {
        Handle::Distance | Handle::Control(ControlPoint::P0) => "#4CAF50",
        Handle::Angle | Handle::Control(ControlPoint::P1) => "#FF9800",
        Handle::Vertex | Handle::Control(ControlPoint::P2) => "#9C27B0",
        Handle::Control(ControlPoint::P3) => "#F44336",
    }
}

// =============================================================
// Helpers
// =============================================================

fn clear(ctx: &CanvasRenderingContext2d, viewport: Viewport, dpr: f64) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
    Ok(())
}

/// Dashed horizontal and vertical lines through the observer.
fn draw_axes(ctx: &CanvasRenderingContext2d, observer: Point, viewport: Viewport) -> Result<(), JsValue> {
    draw_dashed_line(ctx, Point::new(0.0, observer.y), Point::new(viewport.width, observer.y), AXIS_COLOR)?;
    draw_dashed_line(ctx, Point::new(observer.x, 0.0), Point::new(observer.x, viewport.height), AXIS_COLOR)
}

fn draw_dashed_line(ctx: &CanvasRenderingContext2d, from: Point, to: Point, color: &str) -> Result<(), JsValue> {
    ctx.save();
    let dash_array = js_sys::Array::new();
    dash_array.push(&DASH_PX.into());
    dash_array.push(&DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

fn stroke_polyline(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
}

fn fill_circle(
    ctx: &CanvasRenderingContext2d,
    at: Point,
    radius: f64,
    color: &str,
    alpha: f64,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(alpha);
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.restore();
    Ok(())
}
