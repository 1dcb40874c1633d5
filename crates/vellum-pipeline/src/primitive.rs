//! Device-space primitives: the output vocabulary of the pipeline.
//!
//! A front end paints these with no further geometry work. All
//! coordinates are device pixels with Y growing downward.

use glam::Vec2;

use vellum_core::Color;

/// A paintable device-space primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A single dot.
    Dot { position: Vec2, color: Color },
    /// A straight segment.
    Segment { start: Vec2, end: Vec2, color: Color },
    /// An open chain of connected segments.
    Polyline { points: Vec<Vec2>, color: Color },
    /// A filled polygon given by its boundary.
    FilledPolygon { points: Vec<Vec2>, color: Color },
}

impl Primitive {
    /// The primitive's paint color.
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Primitive::Dot { color, .. }
            | Primitive::Segment { color, .. }
            | Primitive::Polyline { color, .. }
            | Primitive::FilledPolygon { color, .. } => *color,
        }
    }
}
