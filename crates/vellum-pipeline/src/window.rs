//! The window: the camera/view-volume in world space.
//!
//! A window owns a center offset, an orthonormal orientation basis
//! (view right / view up / view-plane normal), and a zoomed extent. One
//! window lives per session; navigation operations mutate it in place
//! synchronously and a reset restores the defaults.

use glam::{Mat3, Vec2, Vec3};

use vellum_core::math::rodrigues;
use vellum_core::Transform3D;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 4.0;

const DEFAULT_EXTENT: f32 = 200.0;

/// The camera: position, orientation, and visible extent in world space.
#[derive(Debug, Clone)]
pub struct Window {
    center: Vec3,
    right: Vec3,
    up: Vec3,
    normal: Vec3,
    base_width: f32,
    base_height: f32,
    zoom: f32,
}

impl Window {
    /// Creates a window with the default extent, axis-aligned basis, and
    /// unit zoom.
    #[must_use]
    pub fn new() -> Self {
        Self {
            center: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            normal: Vec3::Z,
            base_width: DEFAULT_EXTENT,
            base_height: DEFAULT_EXTENT,
            zoom: 1.0,
        }
    }

    /// Restores all defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The world-space center offset.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// The view-right basis vector.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// The view-up basis vector.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The view-plane normal.
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// The current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Visible width at the current zoom.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.base_width * self.zoom
    }

    /// Visible height at the current zoom.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.base_height * self.zoom
    }

    /// Half-extents used to normalize view coordinates. Never zero:
    /// zoom clamping keeps the extent strictly positive.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width() / 2.0, self.height() / 2.0)
    }

    /// Sets the unzoomed extent, e.g. to match the viewport aspect ratio.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.base_width = width;
        self.base_height = height;
    }

    /// Sets the zoom factor, silently clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    /// Out-of-range requests are never an error.
    pub fn set_zoom(&mut self, factor: f32) {
        self.zoom = factor.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zooms in by `pct` percent (shrinks the visible extent).
    pub fn zoom_in(&mut self, pct: f32) {
        self.set_zoom(self.zoom - pct / 100.0);
    }

    /// Zooms out by `pct` percent (grows the visible extent).
    pub fn zoom_out(&mut self, pct: f32) {
        self.set_zoom(self.zoom + pct / 100.0);
    }

    /// Pans along the view-up vector.
    pub fn pan_up(&mut self, step: f32) {
        self.center += self.up * step;
    }

    /// Pans against the view-up vector.
    pub fn pan_down(&mut self, step: f32) {
        self.center -= self.up * step;
    }

    /// Pans against the view-right vector.
    pub fn pan_left(&mut self, step: f32) {
        self.center -= self.right * step;
    }

    /// Pans along the view-right vector.
    pub fn pan_right(&mut self, step: f32) {
        self.center += self.right * step;
    }

    /// Pans into the scene, against the view-plane normal.
    pub fn pan_forward(&mut self, step: f32) {
        self.center -= self.normal * step;
    }

    /// Pans out of the scene, along the view-plane normal.
    pub fn pan_backward(&mut self, step: f32) {
        self.center += self.normal * step;
    }

    /// Rotates the view left/right about the view-up vector.
    pub fn yaw(&mut self, angle: f32) {
        let r = rodrigues(self.up, angle);
        self.normal = r * self.normal;
        self.right = r * self.right;
        self.orthonormalize();
    }

    /// Rotates the view up/down about the view-right vector.
    pub fn pitch(&mut self, angle: f32) {
        let r = rodrigues(self.right, angle);
        self.normal = r * self.normal;
        self.up = r * self.up;
        self.orthonormalize();
    }

    /// Rolls the view about the view-plane normal.
    pub fn roll(&mut self, angle: f32) {
        let r = rodrigues(self.normal, angle);
        self.right = r * self.right;
        self.up = r * self.up;
        self.orthonormalize();
    }

    /// Re-derives a mutually orthogonal, unit-length basis from the
    /// rotated vectors. Invariant after every rotation.
    fn orthonormalize(&mut self) {
        self.normal = self.normal.normalize();
        self.right = self.up.cross(self.normal).normalize();
        self.up = self.normal.cross(self.right).normalize();
    }

    /// The roll angle of the view-right vector in the world XY plane,
    /// used by the 2D transform stage.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.right.y.atan2(self.right.x)
    }

    /// Orientation of the view-plane normal against the canonical axes:
    /// rotation about X (from `atan2(n_y, n_z)`) and about Y.
    #[must_use]
    pub fn vpn_angles(&self) -> (f32, f32) {
        let n = self.normal.normalize();
        let theta_x = n.y.atan2(n.z);
        let theta_y = n.x.atan2((n.y * n.y + n.z * n.z).sqrt());
        (theta_x, theta_y)
    }

    /// The world-to-view transform: translate the center to the origin,
    /// then rotate the basis onto the canonical axes.
    #[must_use]
    pub fn view_transform(&self) -> Transform3D {
        // Rows of the rotation are the basis vectors, so right/up/normal
        // map onto X/Y/Z.
        let basis = Mat3::from_cols(self.right, self.up, self.normal).transpose();
        Transform3D::new().translate(-self.center).rotate_mat3(basis)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}
