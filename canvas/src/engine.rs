use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Viewport, ZoomHandle};
use crate::consts::{CURVATURE_DECIMALS, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::drag::DragSession;
use crate::hit;
use crate::input::{EditorMode, InputState, Pointer};
use crate::params::{ParamPatch, PathKind, PathParameters, clamp_curvature, round_to};
use crate::playback::{PlaybackState, Preview};
use crate::render;
use crate::scene::EditorScene;
use crate::submit::SimulationRequest;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Parameters changed; the host merges the patch into its form record.
    ParamsChanged(ParamPatch),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub params: PathParameters,
    pub zoom: ZoomHandle,
    pub input: InputState,
    pub viewport: Viewport,
    pub mode: EditorMode,
    pub playback: PlaybackState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the parameters wholesale. Any drag in progress is dropped.
    pub fn set_params(&mut self, params: PathParameters) {
        self.cancel_gesture();
        self.params = params.clamped();
    }

    /// Switch path family, resetting to that family's defaults.
    pub fn set_path_kind(&mut self, kind: PathKind) {
        if self.params.kind() != kind {
            self.set_params(PathParameters::default_for(kind));
        }
    }

    /// Load parameters from the host's loosely typed form record.
    pub fn load_fields(&mut self, kind: PathKind, record: &serde_json::Value) {
        self.set_params(PathParameters::from_fields(kind, record));
    }

    /// Merge a patch from a slider or the form.
    pub fn apply_patch(&mut self, patch: &ParamPatch) -> Vec<Action> {
        if self.params.apply_patch(patch) {
            vec![Action::ParamsChanged(*patch), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Curvature slider. Only meaningful on a parabola.
    pub fn set_curvature(&mut self, a: f64) -> Vec<Action> {
        if self.params.kind() != PathKind::Parabola || !a.is_finite() {
            return Vec::new();
        }
        let patch = ParamPatch { a: Some(round_to(clamp_curvature(a), CURVATURE_DECIMALS)), ..ParamPatch::default() };
        self.apply_patch(&patch)
    }

    /// Zoom slider: clamped into the zoom range and snapped to its step.
    pub fn set_zoom(&mut self, scale: f64) -> Vec<Action> {
        if !scale.is_finite() {
            return Vec::new();
        }
        let snapped = round_to((scale / ZOOM_STEP).round() * ZOOM_STEP, 1).clamp(ZOOM_MIN, ZOOM_MAX);
        self.zoom.set(snapped);
        vec![Action::RenderNeeded]
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
        vec![Action::RenderNeeded]
    }

    pub fn set_mode(&mut self, mode: EditorMode) -> Vec<Action> {
        if self.mode == mode {
            return Vec::new();
        }
        self.cancel_gesture();
        self.mode = mode;
        vec![Action::RenderNeeded]
    }

    // --- Playback ---

    /// Apply an audio status tick from the host's player.
    pub fn on_playback_status(
        &mut self,
        position_ms: f64,
        duration_ms: f64,
        is_playing: bool,
        just_finished: bool,
    ) -> Vec<Action> {
        self.playback.on_status(position_ms, duration_ms, is_playing, just_finished);
        vec![Action::RenderNeeded]
    }

    pub fn stop_playback(&mut self) -> Vec<Action> {
        self.playback.stop();
        vec![Action::RenderNeeded]
    }

    pub fn rewind_playback(&mut self) -> Vec<Action> {
        self.playback.rewind();
        vec![Action::RenderNeeded]
    }

    // --- Pointer input ---

    /// Start a drag if the pointer lands on a handle.
    pub fn on_pointer_down(&mut self, pointer: Pointer) -> Vec<Action> {
        if !self.mode.accepts_pointer() || !pointer.is_single() {
            return Vec::new();
        }
        let Some(hit) = hit::hit_test(pointer.screen, &self.params, &self.camera()) else {
            return Vec::new();
        };
        let Some(session) = DragSession::grant(hit.handle, &self.params) else {
            return Vec::new();
        };
        self.input = InputState::Dragging { session, grant_screen: pointer.screen };
        vec![Action::SetCursor("grabbing".into()), Action::RenderNeeded]
    }

    /// Update the active drag, or the hover cursor when idle.
    pub fn on_pointer_move(&mut self, pointer: Pointer) -> Vec<Action> {
        if !self.mode.accepts_pointer() {
            return Vec::new();
        }
        let camera = self.camera();
        match &self.input {
            InputState::Idle => {
                let over_handle = hit::hit_test(pointer.screen, &self.params, &camera).is_some();
                vec![Action::SetCursor(if over_handle { "grab" } else { "default" }.into())]
            }
            InputState::Dragging { session, grant_screen } => {
                if !pointer.is_single() {
                    return Vec::new();
                }
                let delta = camera.screen_delta_to_world(pointer.screen - *grant_screen);
                let patch = session.update(delta);
                self.apply_patch(&patch)
            }
        }
    }

    /// End the active drag.
    pub fn on_pointer_up(&mut self, pointer: Pointer) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        let cursor = if hit::hit_test(pointer.screen, &self.params, &self.camera()).is_some() { "grab" } else { "default" };
        self.cancel_gesture();
        vec![Action::SetCursor(cursor.into()), Action::RenderNeeded]
    }

    /// The host lost the pointer (touch cancelled, window blurred).
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        self.cancel_gesture();
        vec![Action::SetCursor("default".into()), Action::RenderNeeded]
    }

    fn cancel_gesture(&mut self) {
        if let Some(handle) = self.input.active_handle() {
            tracing::debug!(?handle, "drag released");
        }
        self.input = InputState::Idle;
    }

    // --- Queries ---

    /// Camera for the zoomable editor, reading the zoom once.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::for_viewport(self.viewport, self.zoom.get())
    }

    #[must_use]
    pub fn editor_scene(&self) -> EditorScene {
        EditorScene::build(&self.params, &self.camera())
    }

    #[must_use]
    pub fn preview(&self) -> Preview {
        Preview::build(&self.params, self.viewport, &self.playback)
    }

    /// Form record for the current parameters.
    #[must_use]
    pub fn fields(&self) -> serde_json::Value {
        self.params.to_fields()
    }

    /// Request record for submitting the current parameters.
    #[must_use]
    pub fn submission(&self, vehicle_type: &str) -> SimulationRequest {
        SimulationRequest::new(vehicle_type, &self.params)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    /// Share the editor zoom with a parent screen.
    pub fn share_zoom(&mut self, zoom: ZoomHandle) {
        self.core.zoom = zoom;
    }

    // --- Delegated data inputs ---

    pub fn set_params(&mut self, params: PathParameters) {
        self.core.set_params(params);
    }

    pub fn set_path_kind(&mut self, kind: PathKind) {
        self.core.set_path_kind(kind);
    }

    pub fn load_fields(&mut self, kind: PathKind, record: &serde_json::Value) {
        self.core.load_fields(kind, record);
    }

    pub fn apply_patch(&mut self, patch: &ParamPatch) -> Vec<Action> {
        self.core.apply_patch(patch)
    }

    pub fn set_curvature(&mut self, a: f64) -> Vec<Action> {
        self.core.set_curvature(a)
    }

    pub fn set_zoom(&mut self, scale: f64) -> Vec<Action> {
        self.core.set_zoom(scale)
    }

    pub fn set_mode(&mut self, mode: EditorMode) -> Vec<Action> {
        self.core.set_mode(mode)
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and size the backing store for `dpr`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((width_css.max(0.0) * dpr).round() as u32);
        self.canvas.set_height((height_css.max(0.0) * dpr).round() as u32);
        self.core.set_viewport(width_css, height_css)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pointer: Pointer) -> Vec<Action> {
        self.core.on_pointer_down(pointer)
    }

    pub fn on_pointer_move(&mut self, pointer: Pointer) -> Vec<Action> {
        self.core.on_pointer_move(pointer)
    }

    pub fn on_pointer_up(&mut self, pointer: Pointer) -> Vec<Action> {
        self.core.on_pointer_up(pointer)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    pub fn on_playback_status(
        &mut self,
        position_ms: f64,
        duration_ms: f64,
        is_playing: bool,
        just_finished: bool,
    ) -> Vec<Action> {
        self.core.on_playback_status(position_ms, duration_ms, is_playing, just_finished)
    }

    // --- Render ---

    /// Draw the current state to the canvas: the zoomable editor in drag mode,
    /// the autoscaled preview in manual mode.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let viewport = self.core.viewport;
        let dpr = if viewport.width > 0.0 { f64::from(self.canvas.width()) / viewport.width } else { 1.0 };
        match self.core.mode {
            EditorMode::Drag => render::draw_editor(&ctx, &self.core.editor_scene(), viewport, dpr),
            EditorMode::Manual => render::draw_preview(&ctx, &self.core.preview(), viewport, dpr),
        }
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn params(&self) -> PathParameters {
        self.core.params
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn submission(&self, vehicle_type: &str) -> SimulationRequest {
        self.core.submission(vehicle_type)
    }
}
