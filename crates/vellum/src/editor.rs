//! The editor controller: the surface a front end drives.
//!
//! An [`Editor`] owns the scene, the window (camera), the viewport, and
//! the configuration, and exposes navigation, transformation sessions,
//! and per-frame rendering. Every operation is synchronous and mutates
//! state in place; `render` is pure over the current state.

use std::path::Path;

use glam::Vec3;

use vellum_core::{Options, Result, Transform3D, VellumError};
use vellum_pipeline::{
    render_frame, LineClipMethod, PipelineOptions, Primitive, Projection, Viewport, Window,
};

use crate::scene::Scene;

/// An in-progress transformation session over one scene object.
///
/// Elementary operations accumulate into one matrix and are applied as a
/// single matrix-point multiply per point, so the object's curve and
/// surface caches re-evaluate exactly once per session.
#[derive(Debug, Clone)]
struct PendingTransform {
    index: usize,
    pivot: Vec3,
    transform: Transform3D,
}

/// The top-level controller: scene, camera, viewport, and options.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    scene: Scene,
    window: Window,
    viewport: Viewport,
    options: Options,
    pipeline: PipelineOptions,
    pending: Option<PendingTransform>,
}

impl Editor {
    /// Creates an editor over an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an editor over an existing scene.
    #[must_use]
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The window (camera).
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Mutable access to the window.
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The editor options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable access to the editor options.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// The pipeline options.
    #[must_use]
    pub fn pipeline(&self) -> &PipelineOptions {
        &self.pipeline
    }

    /// Mutable access to the pipeline options.
    pub fn pipeline_mut(&mut self) -> &mut PipelineOptions {
        &mut self.pipeline
    }

    /// Resizes the device viewport.
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    // --- Navigation -----------------------------------------------------

    pub fn move_up(&mut self) {
        self.window.pan_up(self.options.pan_step);
    }

    pub fn move_down(&mut self) {
        self.window.pan_down(self.options.pan_step);
    }

    pub fn move_left(&mut self) {
        self.window.pan_left(self.options.pan_step);
    }

    pub fn move_right(&mut self) {
        self.window.pan_right(self.options.pan_step);
    }

    pub fn move_forward(&mut self) {
        self.window.pan_forward(self.options.pan_step);
    }

    pub fn move_backward(&mut self) {
        self.window.pan_backward(self.options.pan_step);
    }

    pub fn zoom_in(&mut self) {
        self.window.zoom_in(self.options.zoom_step_pct);
    }

    pub fn zoom_out(&mut self) {
        self.window.zoom_out(self.options.zoom_step_pct);
    }

    pub fn rotate_left(&mut self) {
        self.window.yaw(self.options.rotate_step);
    }

    pub fn rotate_right(&mut self) {
        self.window.yaw(-self.options.rotate_step);
    }

    pub fn rotate_up(&mut self) {
        self.window.pitch(self.options.rotate_step);
    }

    pub fn rotate_down(&mut self) {
        self.window.pitch(-self.options.rotate_step);
    }

    pub fn rotate_clockwise(&mut self) {
        self.window.roll(-self.options.rotate_step);
    }

    pub fn rotate_counterclockwise(&mut self) {
        self.window.roll(self.options.rotate_step);
    }

    /// Restores the default window.
    pub fn reset_window(&mut self) {
        self.window.reset();
    }

    /// Selects the line-clipping algorithm for subsequent frames.
    pub fn set_line_clip_method(&mut self, method: LineClipMethod) {
        self.pipeline.line_clip = method;
    }

    /// Selects the projection mode for subsequent frames.
    pub fn set_projection(&mut self, projection: Projection) {
        self.pipeline.projection = projection;
    }

    // --- Transformation sessions ----------------------------------------

    /// Starts a transformation session over the object at `index`.
    ///
    /// The object's centroid at this moment becomes the default pivot for
    /// the session's rotations and scalings.
    pub fn begin_transform(&mut self, index: usize) -> Result<()> {
        let drawable = self
            .scene
            .get(index)
            .ok_or(VellumError::IndexOutOfBounds {
                index,
                len: self.scene.len(),
            })?;
        log::info!("transform: begin on '{}'", drawable.name());
        self.pending = Some(PendingTransform {
            index,
            pivot: drawable.centroid(),
            transform: Transform3D::new(),
        });
        Ok(())
    }

    /// Appends a translation to the pending session.
    pub fn translate(&mut self, delta: Vec3) -> Result<()> {
        let pending = self.pending.as_mut().ok_or(VellumError::NoPendingTransform)?;
        pending.transform = pending.transform.translate(delta);
        Ok(())
    }

    /// Appends a rotation about an arbitrary axis through the session
    /// pivot.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) -> Result<()> {
        let pending = self.pending.as_mut().ok_or(VellumError::NoPendingTransform)?;
        pending.transform = pending.transform.rotate_axis(angle, axis, pending.pivot);
        Ok(())
    }

    /// Appends a rotation about an arbitrary axis through an explicit
    /// pivot.
    pub fn rotate_about(&mut self, angle: f32, axis: Vec3, pivot: Vec3) -> Result<()> {
        let pending = self.pending.as_mut().ok_or(VellumError::NoPendingTransform)?;
        pending.transform = pending.transform.rotate_axis(angle, axis, pivot);
        Ok(())
    }

    /// Appends a scale about the session pivot.
    pub fn scale(&mut self, factor: Vec3) -> Result<()> {
        let pending = self.pending.as_mut().ok_or(VellumError::NoPendingTransform)?;
        pending.transform = pending.transform.scale(factor, pending.pivot);
        Ok(())
    }

    /// Applies the accumulated session transform to its object and ends
    /// the session. Curve and surface sample caches re-evaluate here.
    pub fn apply_transform(&mut self) -> Result<()> {
        let pending = self.pending.take().ok_or(VellumError::NoPendingTransform)?;
        let drawable = self
            .scene
            .get(pending.index)
            .ok_or(VellumError::IndexOutOfBounds {
                index: pending.index,
                len: self.scene.len(),
            })?;
        log::info!("transform: apply to '{}'", drawable.name());
        let moved = drawable.with_points(pending.transform.apply(drawable.points()));
        self.scene.replace(pending.index, moved)
    }

    /// Discards the pending session, if any.
    pub fn cancel_transform(&mut self) {
        self.pending = None;
    }

    // --- Rendering and persistence --------------------------------------

    /// Runs the pipeline over the current state.
    #[must_use]
    pub fn render(&self) -> Vec<Primitive> {
        render_frame(self.scene.drawables(), &self.window, &self.viewport, &self.pipeline)
    }

    /// Persists the editor options as JSON.
    pub fn save_options(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.options)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads editor options from a JSON file.
    pub fn load_options(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        self.options = serde_json::from_str(&json)?;
        Ok(())
    }
}
