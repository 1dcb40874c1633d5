//! Core geometry for vellum.
//!
//! This crate provides the fundamental types used throughout vellum:
//! - [`Drawable`] — the closed set of geometric variants (points, lines,
//!   wireframes, parametric curves and surfaces)
//! - [`Transform2D`] / [`Transform3D`] — homogeneous transform
//!   accumulators built by chaining translate/rotate/scale
//! - Curve and surface evaluators (De Casteljau, B-spline forward
//!   differences)
//! - [`Color`] and the hex material convention
//! - The shared error type and editor [`Options`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod color;
pub mod curve;
pub mod drawable;
pub mod error;
pub mod math;
pub mod options;
pub mod surface;

pub use color::Color;
pub use curve::{de_casteljau, sample_bezier, sample_bspline, DEFAULT_CURVE_STEPS};
pub use drawable::{CurveBasis, Drawable, DrawableKind};
pub use error::{Result, VellumError};
pub use math::{centroid, rodrigues, Transform2D, Transform3D};
pub use options::Options;
pub use surface::{
    sample_bezier_surface, sample_bspline_surface, SampleGrid, DEFAULT_SURFACE_STEPS,
};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
