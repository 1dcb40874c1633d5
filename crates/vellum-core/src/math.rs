//! Homogeneous transform accumulators and axis-angle rotation.
//!
//! A transform is built by chaining elementary operations and applied once
//! with a single matrix-point multiply per point, so composed operations
//! associate in the intended order (translate-to-pivot, operate,
//! translate-back). Builder methods consume and return `Self`; there is no
//! hidden in-place mutation.

use glam::{Mat3, Mat4, Vec2, Vec3};

/// Rodrigues' rotation matrix for an arbitrary axis.
///
/// The axis is normalized here; a zero axis would produce NaNs, callers
/// pass a direction with nonzero length.
#[must_use]
pub fn rodrigues(axis: Vec3, angle: f32) -> Mat3 {
    let u = axis.normalize();
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    Mat3::from_cols(
        Vec3::new(
            c + u.x * u.x * t,
            u.y * u.x * t + u.z * s,
            u.z * u.x * t - u.y * s,
        ),
        Vec3::new(
            u.x * u.y * t - u.z * s,
            c + u.y * u.y * t,
            u.z * u.y * t + u.x * s,
        ),
        Vec3::new(
            u.x * u.z * t + u.y * s,
            u.y * u.z * t - u.x * s,
            c + u.z * u.z * t,
        ),
    )
}

/// Mean of a point set; the default pivot for rotations and scaling.
#[must_use]
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// A 2D affine transform accumulator over a homogeneous 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    matrix: Mat3,
}

impl Transform2D {
    /// Creates the identity accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
        }
    }

    /// Returns the accumulated matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }

    /// Appends a translation.
    #[must_use]
    pub fn translate(self, delta: Vec2) -> Self {
        self.compose(Mat3::from_translation(delta))
    }

    /// Appends a rotation about `pivot`.
    #[must_use]
    pub fn rotate(self, angle: f32, pivot: Vec2) -> Self {
        self.compose(
            Mat3::from_translation(pivot)
                * Mat3::from_angle(angle)
                * Mat3::from_translation(-pivot),
        )
    }

    /// Appends a non-uniform scale about `pivot`.
    #[must_use]
    pub fn scale(self, factor: Vec2, pivot: Vec2) -> Self {
        self.compose(
            Mat3::from_translation(pivot)
                * Mat3::from_scale(factor)
                * Mat3::from_translation(-pivot),
        )
    }

    /// Composes another elementary matrix after the accumulated ones,
    /// returning a new value.
    #[must_use]
    pub fn compose(self, op: Mat3) -> Self {
        Self {
            matrix: op * self.matrix,
        }
    }

    /// Transforms a single point.
    #[must_use]
    pub fn apply_point(&self, p: Vec2) -> Vec2 {
        self.matrix.transform_point2(p)
    }

    /// Transforms a point set, treating each point as (x, y).
    ///
    /// The identity accumulator is an exact no-op: the input is returned
    /// unchanged, bit for bit.
    #[must_use]
    pub fn apply(&self, points: &[Vec3]) -> Vec<Vec3> {
        if self.matrix == Mat3::IDENTITY {
            return points.to_vec();
        }
        points
            .iter()
            .map(|p| {
                let q = self.matrix.transform_point2(Vec2::new(p.x, p.y));
                Vec3::new(q.x, q.y, p.z)
            })
            .collect()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::new()
    }
}

/// A 3D affine transform accumulator over a homogeneous 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Mat4,
}

impl Transform3D {
    /// Creates the identity accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// Returns the accumulated matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Appends a translation.
    #[must_use]
    pub fn translate(self, delta: Vec3) -> Self {
        self.compose(Mat4::from_translation(delta))
    }

    /// Appends a non-uniform scale about `pivot`.
    #[must_use]
    pub fn scale(self, factor: Vec3, pivot: Vec3) -> Self {
        self.compose(
            Mat4::from_translation(pivot)
                * Mat4::from_scale(factor)
                * Mat4::from_translation(-pivot),
        )
    }

    /// Appends a rotation of `angle` about the arbitrary `axis` through
    /// `pivot`, via Rodrigues' formula.
    ///
    /// Needed because the camera basis is not aligned to the world axes
    /// after free rotation.
    #[must_use]
    pub fn rotate_axis(self, angle: f32, axis: Vec3, pivot: Vec3) -> Self {
        self.compose(
            Mat4::from_translation(pivot)
                * Mat4::from_mat3(rodrigues(axis, angle))
                * Mat4::from_translation(-pivot),
        )
    }

    /// Appends a rotation about the world X axis through `pivot`.
    #[must_use]
    pub fn rotate_x(self, angle: f32, pivot: Vec3) -> Self {
        self.rotate_axis(angle, Vec3::X, pivot)
    }

    /// Appends a rotation about the world Y axis through `pivot`.
    #[must_use]
    pub fn rotate_y(self, angle: f32, pivot: Vec3) -> Self {
        self.rotate_axis(angle, Vec3::Y, pivot)
    }

    /// Appends a rotation about the world Z axis through `pivot`.
    #[must_use]
    pub fn rotate_z(self, angle: f32, pivot: Vec3) -> Self {
        self.rotate_axis(angle, Vec3::Z, pivot)
    }

    /// Appends a rotation about the origin given as a 3x3 matrix.
    #[must_use]
    pub fn rotate_mat3(self, rotation: Mat3) -> Self {
        self.compose(Mat4::from_mat3(rotation))
    }

    /// Composes another elementary matrix after the accumulated ones,
    /// returning a new value.
    #[must_use]
    pub fn compose(self, op: Mat4) -> Self {
        Self {
            matrix: op * self.matrix,
        }
    }

    /// Transforms a single point.
    #[must_use]
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        self.matrix.transform_point3(p)
    }

    /// Transforms a point set.
    ///
    /// The identity accumulator is an exact no-op: the input is returned
    /// unchanged, bit for bit.
    #[must_use]
    pub fn apply(&self, points: &[Vec3]) -> Vec<Vec3> {
        if self.matrix == Mat4::IDENTITY {
            return points.to_vec();
        }
        points.iter().map(|p| self.matrix.transform_point3(*p)).collect()
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::new()
    }
}
