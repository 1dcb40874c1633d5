//! vellum-rs: A Rust-native 2D/3D vector-graphics editor core.
//!
//! Vellum is the geometric heart of an interactive vector editor: a
//! scene of named drawables, a movable camera window, and a fixed
//! per-frame pipeline that clips and maps world geometry into paintable
//! device primitives. There is no GUI here; a front end drives the
//! [`Editor`] and paints the [`Primitive`]s it returns.
//!
//! # Quick Start
//!
//! ```
//! use vellum::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = Editor::with_scene(Scene::demo());
//!
//!     // Navigate the window and re-render.
//!     editor.zoom_in();
//!     editor.move_right();
//!     let primitives = editor.render();
//!     assert!(!primitives.is_empty());
//!
//!     // Transform one object: accumulate, then apply once.
//!     let idx = editor.scene().find("square").unwrap();
//!     editor.begin_transform(idx)?;
//!     editor.translate(Vec3::new(10.0, 0.0, 0.0))?;
//!     editor.rotate(0.5, Vec3::Z)?;
//!     editor.apply_transform()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Scene`] - insertion-ordered, name-unique drawables
//! - [`Editor`] - the controller: navigation, transformation sessions,
//!   rendering
//! - [`obj`] - the persisted OBJ/MTL world format
//!
//! The geometry itself lives in `vellum-core` (drawables, transforms,
//! curve and surface evaluators) and `vellum-pipeline` (window,
//! viewport, clipping, projection), both re-exported below.

pub mod editor;
pub mod obj;
pub mod scene;

pub use editor::Editor;
pub use obj::{export_scene, import_scene, load_scene, save_scene, ObjDocument};
pub use scene::Scene;

// Re-export core types
pub use vellum_core::{
    Color, CurveBasis, Drawable, DrawableKind, Options, Result, SampleGrid, Transform2D,
    Transform3D, VellumError,
};

// Re-export pipeline types
pub use vellum_pipeline::{
    render_frame, ClipRegion, LineClipMethod, PipelineOptions, Primitive, Projection, Viewport,
    Window, MAX_ZOOM, MIN_ZOOM,
};

// Re-export glam types for convenience
pub use vellum_core::{Mat3, Mat4, Vec2, Vec3, Vec4};
