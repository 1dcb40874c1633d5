//! Clipping against a rectangular region: point test, two line clippers
//! (Liang-Barsky and Cohen-Sutherland outcodes), and Sutherland-Hodgman
//! polygon clipping.
//!
//! # Y-axis convention
//!
//! The region lives in the same space the device mapping consumes, where
//! Y grows downward. The TOP boundary is therefore the *minimum* Y and
//! BOTTOM the maximum. Every clipper in this module shares that one
//! convention; the outcode constants below pin it by name, and the tests
//! pin it by value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Outcode bit: point is left of the region (`x < x_min`).
pub const OUT_LEFT: u8 = 0b0001;
/// Outcode bit: point is right of the region (`x > x_max`).
pub const OUT_RIGHT: u8 = 0b0010;
/// Outcode bit: point is below the region (`y > y_max`; device Y grows
/// downward).
pub const OUT_BOTTOM: u8 = 0b0100;
/// Outcode bit: point is above the region (`y < y_min`).
pub const OUT_TOP: u8 = 0b1000;

/// Which line-clipping algorithm to run. The two are interchangeable and
/// must agree on every segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineClipMethod {
    /// Parametric half-plane clipping.
    #[default]
    LiangBarsky,
    /// Outcode-based iterative clipping.
    CohenSutherland,
}

/// A rectangular clipping region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRegion {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl ClipRegion {
    /// Creates a region from its corner bounds.
    #[must_use]
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        debug_assert!(x_min <= x_max && y_min <= y_max);
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// The symmetric normalized-space region `[-(1 - margin), 1 - margin]`
    /// in both axes, inset so geometry never touches the viewport edge.
    #[must_use]
    pub fn normalized(margin: f32) -> Self {
        let extent = 1.0 - margin;
        Self::new(-extent, -extent, extent, extent)
    }

    /// Inclusive point-in-region test.
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        self.x_min <= p.x && p.x <= self.x_max && self.y_min <= p.y && p.y <= self.y_max
    }

    /// Computes the 4-bit outcode of a point relative to this region.
    #[must_use]
    pub fn outcode(&self, p: Vec2) -> u8 {
        let mut code = 0;
        if p.x < self.x_min {
            code |= OUT_LEFT;
        } else if p.x > self.x_max {
            code |= OUT_RIGHT;
        }
        if p.y < self.y_min {
            code |= OUT_TOP;
        } else if p.y > self.y_max {
            code |= OUT_BOTTOM;
        }
        code
    }

    /// Clips a segment with the selected method.
    ///
    /// Returns the surviving sub-segment, or `None` when the segment lies
    /// entirely outside. A zero-length segment returns the shared point
    /// if it is inside.
    #[must_use]
    pub fn clip_line(&self, p0: Vec2, p1: Vec2, method: LineClipMethod) -> Option<(Vec2, Vec2)> {
        if p0 == p1 {
            return self.contains(p0).then_some((p0, p1));
        }
        match method {
            LineClipMethod::LiangBarsky => self.liang_barsky(p0, p1),
            LineClipMethod::CohenSutherland => self.cohen_sutherland(p0, p1),
        }
    }

    /// Liang-Barsky parametric clipping: narrow the surviving parameter
    /// interval `[u1, u2]` against each of the four half-planes.
    fn liang_barsky(&self, p0: Vec2, p1: Vec2) -> Option<(Vec2, Vec2)> {
        let d = p1 - p0;
        let p = [-d.x, d.x, -d.y, d.y];
        let q = [
            p0.x - self.x_min,
            self.x_max - p0.x,
            p0.y - self.y_min,
            self.y_max - p0.y,
        ];

        let mut u1 = 0.0f32;
        let mut u2 = 1.0f32;
        for i in 0..4 {
            if p[i] == 0.0 {
                // Parallel to this boundary: inside iff q >= 0. A segment
                // lying exactly on the boundary stays.
                if q[i] < 0.0 {
                    return None;
                }
            } else {
                let u = q[i] / p[i];
                if p[i] < 0.0 {
                    u1 = u1.max(u);
                } else {
                    u2 = u2.min(u);
                }
            }
        }
        if u1 > u2 {
            return None;
        }
        Some((p0 + d * u1, p0 + d * u2))
    }

    /// Cohen-Sutherland outcode clipping: trivially accept/reject, else
    /// replace the outside endpoint with its boundary intersection and
    /// loop. Terminates because each replacement strictly reduces the
    /// violated boundaries.
    fn cohen_sutherland(&self, mut p0: Vec2, mut p1: Vec2) -> Option<(Vec2, Vec2)> {
        let mut code0 = self.outcode(p0);
        let mut code1 = self.outcode(p1);

        loop {
            if code0 | code1 == 0 {
                return Some((p0, p1));
            }
            if code0 & code1 != 0 {
                return None;
            }

            let out = if code0 != 0 { code0 } else { code1 };
            let d = p1 - p0;
            // Division guard: an edge parallel to the violated boundary
            // has no intersection with it. Unreachable when both
            // endpoints share the violation (trivial reject above), kept
            // as a guard against NaN propagation.
            let q = if out & OUT_TOP != 0 {
                if d.y == 0.0 {
                    return None;
                }
                Vec2::new(p0.x + d.x * (self.y_min - p0.y) / d.y, self.y_min)
            } else if out & OUT_BOTTOM != 0 {
                if d.y == 0.0 {
                    return None;
                }
                Vec2::new(p0.x + d.x * (self.y_max - p0.y) / d.y, self.y_max)
            } else if out & OUT_RIGHT != 0 {
                if d.x == 0.0 {
                    return None;
                }
                Vec2::new(self.x_max, p0.y + d.y * (self.x_max - p0.x) / d.x)
            } else {
                if d.x == 0.0 {
                    return None;
                }
                Vec2::new(self.x_min, p0.y + d.y * (self.x_min - p0.x) / d.x)
            };

            if out == code0 {
                p0 = q;
                code0 = self.outcode(p0);
            } else {
                p1 = q;
                code1 = self.outcode(p1);
            }
        }
    }

    /// Sutherland-Hodgman polygon clipping.
    ///
    /// Streams the vertex list through the four boundaries in fixed
    /// order (left, right, bottom, top), emitting crossings and inside
    /// vertices. Returns the empty vec when the polygon is entirely
    /// clipped away. Re-clipping the output against the same region is a
    /// fixed point.
    #[must_use]
    pub fn clip_polygon(&self, vertices: &[Vec2]) -> Vec<Vec2> {
        let boundaries = [
            Boundary::Left(self.x_min),
            Boundary::Right(self.x_max),
            Boundary::Bottom(self.y_max),
            Boundary::Top(self.y_min),
        ];

        let mut output = vertices.to_vec();
        for boundary in boundaries {
            if output.is_empty() {
                break;
            }
            let input = std::mem::take(&mut output);
            let mut prev = input[input.len() - 1];
            for curr in input {
                match (boundary.inside(curr), boundary.inside(prev)) {
                    (true, false) => {
                        output.push(boundary.intersect(prev, curr));
                        output.push(curr);
                    }
                    (true, true) => output.push(curr),
                    (false, true) => output.push(boundary.intersect(prev, curr)),
                    (false, false) => {}
                }
                prev = curr;
            }
        }
        output
    }
}

/// One Sutherland-Hodgman boundary. Bottom carries the *maximum* Y and
/// Top the minimum, per the module's Y convention.
#[derive(Debug, Clone, Copy)]
enum Boundary {
    Left(f32),
    Right(f32),
    Bottom(f32),
    Top(f32),
}

impl Boundary {
    fn inside(self, p: Vec2) -> bool {
        match self {
            Boundary::Left(x) => p.x >= x,
            Boundary::Right(x) => p.x <= x,
            Boundary::Bottom(y) => p.y <= y,
            Boundary::Top(y) => p.y >= y,
        }
    }

    /// Intersection of edge `p1 -> p2` with this boundary. Degenerate
    /// edges (zero length, or parallel to the boundary) return the shared
    /// known-good point instead of dividing by zero.
    fn intersect(self, p1: Vec2, p2: Vec2) -> Vec2 {
        let d = p2 - p1;
        match self {
            Boundary::Left(x) | Boundary::Right(x) => {
                if d.x == 0.0 {
                    p1
                } else {
                    Vec2::new(x, p1.y + d.y * (x - p1.x) / d.x)
                }
            }
            Boundary::Bottom(y) | Boundary::Top(y) => {
                if d.y == 0.0 {
                    p1
                } else {
                    Vec2::new(p1.x + d.x * (y - p1.y) / d.y, y)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn region() -> ClipRegion {
        ClipRegion::new(0.0, 0.0, 10.0, 10.0)
    }

    const METHODS: [LineClipMethod; 2] =
        [LineClipMethod::LiangBarsky, LineClipMethod::CohenSutherland];

    #[test]
    fn test_contains_is_inclusive() {
        let r = region();
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(5.0, 5.0)));
        assert!(!r.contains(Vec2::new(-0.001, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.001)));
    }

    #[test]
    fn test_outcode_y_convention() {
        // Device Y grows downward: y below y_min is TOP.
        let r = region();
        assert_eq!(r.outcode(Vec2::new(5.0, -1.0)), OUT_TOP);
        assert_eq!(r.outcode(Vec2::new(5.0, 11.0)), OUT_BOTTOM);
        assert_eq!(r.outcode(Vec2::new(-1.0, -1.0)), OUT_LEFT | OUT_TOP);
        assert_eq!(r.outcode(Vec2::new(11.0, 11.0)), OUT_RIGHT | OUT_BOTTOM);
        assert_eq!(r.outcode(Vec2::new(5.0, 5.0)), 0);
    }

    #[test]
    fn test_horizontal_crossing_segment_both_methods() {
        // The canonical case: (-5,5)-(15,5) against (0,0,10,10) -> (0,5)-(10,5).
        let r = region();
        for method in METHODS {
            let (a, b) = r
                .clip_line(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0), method)
                .unwrap();
            assert_relative_eq!(a.x, 0.0, epsilon = 1e-5);
            assert_relative_eq!(a.y, 5.0, epsilon = 1e-5);
            assert_relative_eq!(b.x, 10.0, epsilon = 1e-5);
            assert_relative_eq!(b.y, 5.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_fully_inside_segment_is_unchanged() {
        let r = region();
        let p0 = Vec2::new(1.0, 2.0);
        let p1 = Vec2::new(8.0, 9.0);
        for method in METHODS {
            let (a, b) = r.clip_line(p0, p1, method).unwrap();
            assert_relative_eq!(a.x, p0.x, epsilon = 1e-6);
            assert_relative_eq!(a.y, p0.y, epsilon = 1e-6);
            assert_relative_eq!(b.x, p1.x, epsilon = 1e-6);
            assert_relative_eq!(b.y, p1.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_fully_outside_segment_is_rejected() {
        let r = region();
        for method in METHODS {
            // Both x < x_min.
            assert!(r
                .clip_line(Vec2::new(-5.0, 2.0), Vec2::new(-1.0, 8.0), method)
                .is_none());
            // Both y > y_max.
            assert!(r
                .clip_line(Vec2::new(2.0, 15.0), Vec2::new(8.0, 12.0), method)
                .is_none());
        }
    }

    #[test]
    fn test_diagonal_corner_cut() {
        let r = region();
        for method in METHODS {
            let (a, b) = r
                .clip_line(Vec2::new(-2.0, 2.0), Vec2::new(2.0, -2.0), method)
                .unwrap();
            // Survives only the tiny corner triangle near (0, 0).
            assert!(r.contains(a) && r.contains(b));
            assert_relative_eq!(a.x + a.y, 0.0, epsilon = 1e-5);
            assert_relative_eq!(b.x + b.y, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_boundary_parallel_segment_on_edge_is_inside() {
        // Lying exactly on y = 0 (the TOP edge): kept, not rejected.
        let r = region();
        for method in METHODS {
            let (a, b) = r
                .clip_line(Vec2::new(2.0, 0.0), Vec2::new(8.0, 0.0), method)
                .unwrap();
            assert_relative_eq!(a.y, 0.0, epsilon = 1e-6);
            assert_relative_eq!(b.y, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_zero_length_segment() {
        let r = region();
        for method in METHODS {
            let inside = r.clip_line(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), method);
            assert_eq!(inside, Some((Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0))));
            let outside = r.clip_line(Vec2::new(-5.0, 5.0), Vec2::new(-5.0, 5.0), method);
            assert!(outside.is_none());
        }
    }

    #[test]
    fn test_polygon_fully_inside_is_unchanged() {
        let r = region();
        let poly = vec![
            Vec2::new(2.0, 2.0),
            Vec2::new(8.0, 2.0),
            Vec2::new(8.0, 8.0),
            Vec2::new(2.0, 8.0),
        ];
        assert_eq!(r.clip_polygon(&poly), poly);
    }

    #[test]
    fn test_polygon_fully_outside_is_empty() {
        let r = region();
        let poly = vec![
            Vec2::new(20.0, 20.0),
            Vec2::new(30.0, 20.0),
            Vec2::new(25.0, 30.0),
        ];
        assert!(r.clip_polygon(&poly).is_empty());
    }

    #[test]
    fn test_polygon_straddling_is_truncated() {
        let r = region();
        // A square straddling the right edge.
        let poly = vec![
            Vec2::new(5.0, 2.0),
            Vec2::new(15.0, 2.0),
            Vec2::new(15.0, 8.0),
            Vec2::new(5.0, 8.0),
        ];
        let clipped = r.clip_polygon(&poly);
        assert!(!clipped.is_empty());
        for p in &clipped {
            assert!(r.contains(*p), "vertex {p} escaped the region");
        }
        let max_x = clipped.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert_relative_eq!(max_x, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_polygon_clip_is_idempotent() {
        let r = region();
        let poly = vec![
            Vec2::new(-3.0, 5.0),
            Vec2::new(5.0, -3.0),
            Vec2::new(13.0, 5.0),
            Vec2::new(5.0, 13.0),
        ];
        let once = r.clip_polygon(&poly);
        let twice = r.clip_polygon(&once);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_polygon_y_convention() {
        // A triangle poking above the region (y < y_min) is cut at the
        // TOP boundary, and the cut lands on y = y_min.
        let r = region();
        let poly = vec![
            Vec2::new(2.0, 5.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(8.0, 5.0),
        ];
        let clipped = r.clip_polygon(&poly);
        let min_y = clipped.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_polygon_edge_returns_shared_point() {
        let r = region();
        // Repeated vertex straddling the left edge; must not divide by zero.
        let poly = vec![
            Vec2::new(-5.0, 2.0),
            Vec2::new(-5.0, 2.0),
            Vec2::new(5.0, 2.0),
            Vec2::new(5.0, 8.0),
        ];
        let clipped = r.clip_polygon(&poly);
        for p in &clipped {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    proptest! {
        #[test]
        fn prop_line_clip_methods_agree(
            x0 in -20f32..30.0, y0 in -20f32..30.0,
            x1 in -20f32..30.0, y1 in -20f32..30.0,
        ) {
            let r = region();
            let p0 = Vec2::new(x0, y0);
            let p1 = Vec2::new(x1, y1);
            let lb = r.clip_line(p0, p1, LineClipMethod::LiangBarsky);
            let cs = r.clip_line(p0, p1, LineClipMethod::CohenSutherland);
            match (lb, cs) {
                (None, None) => {}
                (Some((a0, a1)), Some((b0, b1))) => {
                    prop_assert!((a0 - b0).length() < 1e-2, "{a0} vs {b0}");
                    prop_assert!((a1 - b1).length() < 1e-2, "{a1} vs {b1}");
                }
                other => prop_assert!(false, "methods disagree: {other:?}"),
            }
        }

        #[test]
        fn prop_clipped_output_is_inside(
            x0 in -20f32..30.0, y0 in -20f32..30.0,
            x1 in -20f32..30.0, y1 in -20f32..30.0,
        ) {
            let r = region();
            if let Some((a, b)) =
                r.clip_line(Vec2::new(x0, y0), Vec2::new(x1, y1), LineClipMethod::LiangBarsky)
            {
                let slack = 1e-3;
                prop_assert!(a.x >= r.x_min - slack && a.x <= r.x_max + slack);
                prop_assert!(a.y >= r.y_min - slack && a.y <= r.y_max + slack);
                prop_assert!(b.x >= r.x_min - slack && b.x <= r.x_max + slack);
                prop_assert!(b.y >= r.y_min - slack && b.y <= r.y_max + slack);
            }
        }
    }
}
