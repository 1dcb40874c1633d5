//! The drawable model: a closed set of geometric variants over an
//! ordered point sequence.
//!
//! A [`Drawable`] is value data. Pipeline stages never mutate one in
//! place; they derive a new drawable via [`Drawable::with_points`] so
//! each frame re-transforms from the authoritative world-space copy and
//! floating error never accumulates across redraws.

use glam::Vec3;

use crate::color::Color;
use crate::curve;
use crate::error::{Result, VellumError};
use crate::math::centroid;
use crate::surface::{self, SampleGrid};

/// Which cubic basis a curve or surface is evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveBasis {
    /// Piecewise cubic Bézier with C1 smooth joins.
    Bezier,
    /// Uniform cubic B-spline.
    BSpline,
}

/// The geometric variant of a drawable.
///
/// Curve and surface variants carry their evaluated sample cache; the
/// cache is rebuilt whenever the control points change (after a
/// transform), never on draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableKind {
    /// A single point.
    Point,
    /// A segment between exactly two points.
    Line,
    /// A closed polygon of at least three vertices.
    Wireframe {
        /// Painted as a filled polygon rather than an outline.
        filled: bool,
    },
    /// A parametric curve over its control points.
    Curve {
        basis: CurveBasis,
        steps: usize,
        samples: Vec<Vec3>,
    },
    /// A bicubic tensor-product surface over a `rows x cols` control net.
    Surface {
        basis: CurveBasis,
        rows: usize,
        cols: usize,
        steps: usize,
        filled: bool,
        samples: SampleGrid,
    },
}

/// A named, colored geometric entity owning an ordered point sequence.
///
/// For curves and surfaces the owned points are the control points; the
/// renderable samples live in the kind's cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    name: String,
    color: Color,
    points: Vec<Vec3>,
    kind: DrawableKind,
}

impl Drawable {
    /// Creates a point drawable.
    #[must_use]
    pub fn point(name: impl Into<String>, position: Vec3, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            points: vec![position],
            kind: DrawableKind::Point,
        }
    }

    /// Creates a line drawable.
    #[must_use]
    pub fn line(name: impl Into<String>, start: Vec3, end: Vec3, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            points: vec![start, end],
            kind: DrawableKind::Line,
        }
    }

    /// Creates a wireframe (closed polygon) drawable.
    ///
    /// Fails with [`VellumError::InvalidPointCount`] for fewer than three
    /// vertices.
    pub fn wireframe(
        name: impl Into<String>,
        points: Vec<Vec3>,
        color: Color,
        filled: bool,
    ) -> Result<Self> {
        if points.len() < 3 {
            return Err(VellumError::InvalidPointCount {
                kind: "wireframe",
                expected: ">= 3",
                actual: points.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            color,
            points,
            kind: DrawableKind::Wireframe { filled },
        })
    }

    /// Creates a curve drawable and evaluates its sample cache.
    ///
    /// Bézier chains require `4 + 2k` control points; B-splines require
    /// at least 4.
    pub fn curve(
        name: impl Into<String>,
        basis: CurveBasis,
        control: Vec<Vec3>,
        color: Color,
        steps: usize,
    ) -> Result<Self> {
        let valid = match basis {
            CurveBasis::Bezier => curve::valid_bezier_count(control.len()),
            CurveBasis::BSpline => control.len() >= 4,
        };
        if !valid {
            return Err(VellumError::InvalidPointCount {
                kind: "curve",
                expected: match basis {
                    CurveBasis::Bezier => "4 + 2k",
                    CurveBasis::BSpline => ">= 4",
                },
                actual: control.len(),
            });
        }
        let samples = evaluate_curve(basis, &control, steps);
        Ok(Self {
            name: name.into(),
            color,
            points: control,
            kind: DrawableKind::Curve {
                basis,
                steps,
                samples,
            },
        })
    }

    /// Creates a surface drawable and evaluates its sample grid.
    ///
    /// The control net is row-major `rows x cols`. Bézier nets tile 4x4
    /// patches sharing boundary lines (dimensions `4 + 3k`); B-spline
    /// nets need at least 4 points per direction.
    #[allow(clippy::too_many_arguments)]
    pub fn surface(
        name: impl Into<String>,
        basis: CurveBasis,
        control: Vec<Vec3>,
        rows: usize,
        cols: usize,
        color: Color,
        steps: usize,
        filled: bool,
    ) -> Result<Self> {
        if rows * cols != control.len() {
            return Err(VellumError::InvalidControlNet(format!(
                "{rows}x{cols} net needs {} points, got {}",
                rows * cols,
                control.len()
            )));
        }
        let valid_dim = match basis {
            CurveBasis::Bezier => surface::valid_bezier_grid_dim,
            CurveBasis::BSpline => surface::valid_bspline_grid_dim,
        };
        if !valid_dim(rows) || !valid_dim(cols) {
            return Err(VellumError::InvalidControlNet(format!(
                "{rows}x{cols} is not a valid {basis:?} net"
            )));
        }
        let samples = evaluate_surface(basis, &control, rows, cols, steps);
        Ok(Self {
            name: name.into(),
            color,
            points: control,
            kind: DrawableKind::Surface {
                basis,
                rows,
                cols,
                steps,
                filled,
                samples,
            },
        })
    }

    /// The drawable's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The paint color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the paint color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The defining points (control points for curves and surfaces).
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// The geometric variant.
    #[must_use]
    pub fn kind(&self) -> &DrawableKind {
        &self.kind
    }

    /// Mean of the defining points; the default transform pivot.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        centroid(&self.points)
    }

    /// Derives a new drawable with replaced defining points.
    ///
    /// Curve and surface caches are re-evaluated here, the single place
    /// control-point changes flow through.
    #[must_use]
    pub fn with_points(&self, points: Vec<Vec3>) -> Self {
        debug_assert_eq!(points.len(), self.points.len());
        let kind = match &self.kind {
            DrawableKind::Curve { basis, steps, .. } => DrawableKind::Curve {
                basis: *basis,
                steps: *steps,
                samples: evaluate_curve(*basis, &points, *steps),
            },
            DrawableKind::Surface {
                basis,
                rows,
                cols,
                steps,
                filled,
                ..
            } => DrawableKind::Surface {
                basis: *basis,
                rows: *rows,
                cols: *cols,
                steps: *steps,
                filled: *filled,
                samples: evaluate_surface(*basis, &points, *rows, *cols, *steps),
            },
            other => other.clone(),
        };
        Self {
            name: self.name.clone(),
            color: self.color,
            points,
            kind,
        }
    }
}

fn evaluate_curve(basis: CurveBasis, control: &[Vec3], steps: usize) -> Vec<Vec3> {
    match basis {
        CurveBasis::Bezier => curve::sample_bezier(control, steps),
        CurveBasis::BSpline => curve::sample_bspline(control, steps),
    }
}

fn evaluate_surface(
    basis: CurveBasis,
    control: &[Vec3],
    rows: usize,
    cols: usize,
    steps: usize,
) -> SampleGrid {
    match basis {
        CurveBasis::Bezier => surface::sample_bezier_surface(control, rows, cols, steps),
        CurveBasis::BSpline => surface::sample_bspline_surface(control, rows, cols, steps),
    }
}
