//! The viewport: device-space extent and the normalized-to-device map.

use glam::Vec2;

use vellum_core::Transform2D;

use crate::clip::ClipRegion;

/// A device viewport in pixels. Y grows downward, origin at the top
/// left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport of the given pixel extent. Both dimensions must
    /// be strictly positive.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self { width, height }
    }

    /// Device width in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Device height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Resizes the viewport.
    pub fn resize(&mut self, width: f32, height: f32) {
        debug_assert!(width > 0.0 && height > 0.0);
        self.width = width;
        self.height = height;
    }

    /// The transform from a normalized clip region onto device pixels.
    ///
    /// Maps `region` to `[0, width] x [0, height]` with the Y axis
    /// flipped, so normalized up becomes device down. Geometry clipped
    /// against `region` therefore always lands inside the viewport.
    #[must_use]
    pub fn device_transform(&self, region: &ClipRegion) -> Transform2D {
        let sx = self.width / (region.x_max - region.x_min);
        let sy = self.height / (region.y_max - region.y_min);
        Transform2D::new()
            .translate(Vec2::new(-region.x_min, -region.y_min))
            .scale(Vec2::new(sx, -sy), Vec2::ZERO)
            .translate(Vec2::new(0.0, self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_aspect() {
        assert_relative_eq!(Viewport::new(800.0, 600.0).aspect(), 4.0 / 3.0);
    }

    #[test]
    fn test_device_transform_corners() {
        let vp = Viewport::new(800.0, 600.0);
        let region = ClipRegion::new(-1.0, -1.0, 1.0, 1.0);
        let t = vp.device_transform(&region);

        // Normalized bottom-left maps to device bottom-left (Y flipped).
        let bl = t.apply_point(Vec2::new(-1.0, -1.0));
        assert_relative_eq!(bl.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(bl.y, 600.0, epsilon = 1e-4);

        let tr = t.apply_point(Vec2::new(1.0, 1.0));
        assert_relative_eq!(tr.x, 800.0, epsilon = 1e-4);
        assert_relative_eq!(tr.y, 0.0, epsilon = 1e-4);

        let c = t.apply_point(Vec2::ZERO);
        assert_relative_eq!(c.x, 400.0, epsilon = 1e-4);
        assert_relative_eq!(c.y, 300.0, epsilon = 1e-4);
    }

    #[test]
    fn test_device_transform_respects_margin_region() {
        let vp = Viewport::new(100.0, 100.0);
        let region = ClipRegion::normalized(0.1);
        let t = vp.device_transform(&region);
        // The inset region still spans the full device extent.
        let tl = t.apply_point(Vec2::new(region.x_min, region.y_max));
        assert_relative_eq!(tl.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(tl.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_resize() {
        let mut vp = Viewport::new(100.0, 100.0);
        vp.resize(200.0, 50.0);
        assert_relative_eq!(vp.aspect(), 4.0);
    }
}
