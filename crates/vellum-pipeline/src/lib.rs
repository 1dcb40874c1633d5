//! The vellum world-to-device pipeline.
//!
//! This crate turns world-space [`Drawable`]s into paintable
//! device-space [`Primitive`]s:
//! - [`Window`] — the camera: center, orientation basis, zoomed extent
//! - [`Viewport`] — device extent and the normalized-to-device map
//! - [`ClipRegion`] — point, line (Liang-Barsky / Cohen-Sutherland), and
//!   polygon (Sutherland-Hodgman) clipping
//! - [`render_frame`] — the fixed per-frame stage order
//!
//! [`Drawable`]: vellum_core::Drawable

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod clip;
pub mod primitive;
pub mod render;
pub mod viewport;
pub mod window;

pub use clip::{ClipRegion, LineClipMethod};
pub use primitive::Primitive;
pub use render::{render_frame, PipelineOptions, Projection};
pub use viewport::Viewport;
pub use window::{Window, MAX_ZOOM, MIN_ZOOM};
