//! Bicubic surface evaluators: tensor-product Bézier patches (De
//! Casteljau in u then v) and B-spline patches (coefficient matrices plus
//! forward differences in both parametric directions).

use glam::{Mat4, Vec3, Vec4};

use crate::curve::{cubic_forward_samples, de_casteljau, BSPLINE_BASIS_6};

/// Default number of sample steps per patch, in each direction.
pub const DEFAULT_SURFACE_STEPS: usize = 10;

/// A rectangular grid of evaluated surface samples, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    rows: usize,
    cols: usize,
    points: Vec<Vec3>,
}

impl SampleGrid {
    /// Builds a grid from row-major points; `points.len()` must equal
    /// `rows * cols`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, points: Vec<Vec3>) -> Self {
        debug_assert_eq!(points.len(), rows * cols);
        Self { rows, cols, points }
    }

    /// Number of sample rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of sample columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The sample at grid position (`row`, `col`).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Vec3 {
        self.points[row * self.cols + col]
    }

    /// All samples, row-major.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Rebuilds the grid with the same shape over new points.
    #[must_use]
    pub fn with_points(&self, points: Vec<Vec3>) -> Self {
        Self::new(self.rows, self.cols, points)
    }
}

/// Returns true if `dim` control points per direction tile into complete
/// 4x4 Bézier patches (patches share a boundary column, so valid
/// dimensions are `4 + 3k`).
#[must_use]
pub fn valid_bezier_grid_dim(dim: usize) -> bool {
    dim >= 4 && (dim - 4) % 3 == 0
}

/// Returns true if `dim` control points per direction admit at least one
/// 4x4 B-spline patch.
#[must_use]
pub fn valid_bspline_grid_dim(dim: usize) -> bool {
    dim >= 4
}

fn control_at(control: &[Vec3], cols: usize, row: usize, col: usize) -> Vec3 {
    control[row * cols + col]
}

/// Evaluates one 4x4 Bézier patch at (`u`, `v`): De Casteljau along each
/// control row at `v`, then once more across the results at `u`.
fn eval_bezier_patch(
    control: &[Vec3],
    cols: usize,
    row0: usize,
    col0: usize,
    u: f32,
    v: f32,
) -> Vec3 {
    let mut spine = [Vec3::ZERO; 4];
    for (a, out) in spine.iter_mut().enumerate() {
        let row: Vec<Vec3> = (0..4)
            .map(|b| control_at(control, cols, row0 + a, col0 + b))
            .collect();
        *out = de_casteljau(&row, v);
    }
    de_casteljau(&spine, u)
}

/// Samples a tiled bicubic Bézier surface.
///
/// The control net is row-major `rows x cols` with both dimensions of the
/// form `4 + 3k`; adjacent patches share their boundary control line, so
/// the output grid is continuous across patch seams.
#[must_use]
pub fn sample_bezier_surface(
    control: &[Vec3],
    rows: usize,
    cols: usize,
    steps: usize,
) -> SampleGrid {
    debug_assert!(valid_bezier_grid_dim(rows) && valid_bezier_grid_dim(cols));
    debug_assert_eq!(control.len(), rows * cols);

    let patches_u = 1 + (rows - 4) / 3;
    let patches_v = 1 + (cols - 4) / 3;
    let grid_rows = patches_u * steps + 1;
    let grid_cols = patches_v * steps + 1;

    let mut points = Vec::with_capacity(grid_rows * grid_cols);
    for gi in 0..grid_rows {
        let (pi, u) = split_param(gi, steps, patches_u);
        for gj in 0..grid_cols {
            let (pj, v) = split_param(gj, steps, patches_v);
            points.push(eval_bezier_patch(control, cols, 3 * pi, 3 * pj, u, v));
        }
    }
    SampleGrid::new(grid_rows, grid_cols, points)
}

/// Maps a global grid index to (patch index, local parameter in [0, 1]).
/// The final boundary sample belongs to the last patch at parameter 1.
fn split_param(global: usize, steps: usize, patches: usize) -> (usize, f32) {
    let patch = (global / steps).min(patches - 1);
    let local = global - patch * steps;
    (patch, local as f32 / steps as f32)
}

/// The B-spline basis as a `Mat4` (already divided by 6).
fn bspline_basis_mat4() -> Mat4 {
    Mat4::from_cols_array_2d(&BSPLINE_BASIS_6).transpose() * (1.0 / 6.0)
}

/// Per-coordinate coefficient matrices `C = M * G * M^T` for the 4x4
/// patch whose top-left control point is (`row0`, `col0`).
fn bspline_patch_coefficients(
    control: &[Vec3],
    cols: usize,
    row0: usize,
    col0: usize,
) -> [Mat4; 3] {
    let m = bspline_basis_mat4();
    let mut geometry = [[[0.0f32; 4]; 4]; 3];
    for a in 0..4 {
        for b in 0..4 {
            let p = control_at(control, cols, row0 + a, col0 + b);
            geometry[0][a][b] = p.x;
            geometry[1][a][b] = p.y;
            geometry[2][a][b] = p.z;
        }
    }
    geometry.map(|g| {
        let g = Mat4::from_cols_array_2d(&g).transpose();
        m * g * m.transpose()
    })
}

/// Evaluates one B-spline patch over a `(steps + 1)^2` local grid using
/// forward differences in both directions: for each fixed `u` the row
/// collapses to a cubic in `v`, whose coefficients feed the same
/// difference recurrence the curve sampler uses.
fn eval_bspline_patch(coeff: &[Mat4; 3], steps: usize) -> Vec<Vec3> {
    let mut local = Vec::with_capacity((steps + 1) * (steps + 1));
    for a in 0..=steps {
        let u = a as f32 / steps as f32;
        let u4 = Vec4::new(u * u * u, u * u, u, 1.0);
        // Row-vector product U * C per coordinate; component k is the
        // v^(3-k) coefficient of the row cubic.
        let row_coeff: [Vec4; 3] = [
            Vec4::new(
                u4.dot(coeff[0].col(0)),
                u4.dot(coeff[0].col(1)),
                u4.dot(coeff[0].col(2)),
                u4.dot(coeff[0].col(3)),
            ),
            Vec4::new(
                u4.dot(coeff[1].col(0)),
                u4.dot(coeff[1].col(1)),
                u4.dot(coeff[1].col(2)),
                u4.dot(coeff[1].col(3)),
            ),
            Vec4::new(
                u4.dot(coeff[2].col(0)),
                u4.dot(coeff[2].col(1)),
                u4.dot(coeff[2].col(2)),
                u4.dot(coeff[2].col(3)),
            ),
        ];
        let cubic = [
            Vec3::new(row_coeff[0].x, row_coeff[1].x, row_coeff[2].x),
            Vec3::new(row_coeff[0].y, row_coeff[1].y, row_coeff[2].y),
            Vec3::new(row_coeff[0].z, row_coeff[1].z, row_coeff[2].z),
            Vec3::new(row_coeff[0].w, row_coeff[1].w, row_coeff[2].w),
        ];
        local.extend(cubic_forward_samples(cubic, steps));
    }
    local
}

/// Samples a bicubic B-spline surface.
///
/// Overlapping 4x4 patches step by one control point in each direction;
/// patch (i, j) and its neighbors agree along shared boundaries, so the
/// stitched global grid is continuous.
#[must_use]
pub fn sample_bspline_surface(
    control: &[Vec3],
    rows: usize,
    cols: usize,
    steps: usize,
) -> SampleGrid {
    debug_assert!(valid_bspline_grid_dim(rows) && valid_bspline_grid_dim(cols));
    debug_assert_eq!(control.len(), rows * cols);

    let patches_u = rows - 3;
    let patches_v = cols - 3;
    let grid_rows = patches_u * steps + 1;
    let grid_cols = patches_v * steps + 1;

    let mut points = vec![Vec3::ZERO; grid_rows * grid_cols];
    for pi in 0..patches_u {
        for pj in 0..patches_v {
            let coeff = bspline_patch_coefficients(control, cols, pi, pj);
            let local = eval_bspline_patch(&coeff, steps);
            for a in 0..=steps {
                for b in 0..=steps {
                    let gi = pi * steps + a;
                    let gj = pj * steps + b;
                    points[gi * grid_cols + gj] = local[a * (steps + 1) + b];
                }
            }
        }
    }
    SampleGrid::new(grid_rows, grid_cols, points)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// A 4x4 net over [0,3]^2 with a raised interior.
    fn bump_net() -> Vec<Vec3> {
        let mut control = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                let z = if (1..3).contains(&i) && (1..3).contains(&j) {
                    2.0
                } else {
                    0.0
                };
                control.push(Vec3::new(i as f32, j as f32, z));
            }
        }
        control
    }

    #[test]
    fn test_bezier_surface_corners_interpolate_control_net() {
        let control = bump_net();
        let grid = sample_bezier_surface(&control, 4, 4, 8);
        assert_eq!(grid.rows(), 9);
        assert_eq!(grid.cols(), 9);
        // Bezier patches interpolate their corner control points exactly.
        assert_eq!(grid.get(0, 0), control[0]);
        assert_eq!(grid.get(0, 8), control[3]);
        assert_eq!(grid.get(8, 0), control[12]);
        assert_eq!(grid.get(8, 8), control[15]);
    }

    #[test]
    fn test_bezier_surface_center_is_symmetric_bump() {
        let grid = sample_bezier_surface(&bump_net(), 4, 4, 8);
        let center = grid.get(4, 4);
        assert_relative_eq!(center.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(center.y, 1.5, epsilon = 1e-5);
        assert!(center.z > 0.5, "interior bump should lift the center");
    }

    #[test]
    fn test_bezier_grid_dims() {
        assert!(valid_bezier_grid_dim(4));
        assert!(valid_bezier_grid_dim(7));
        assert!(valid_bezier_grid_dim(10));
        assert!(!valid_bezier_grid_dim(3));
        assert!(!valid_bezier_grid_dim(5));
        assert!(!valid_bezier_grid_dim(6));
    }

    #[test]
    fn test_tiled_bezier_surface_is_continuous_across_seams() {
        // 7x4 net = two patches in u; the seam column is shared.
        let mut control = Vec::new();
        for i in 0..7 {
            for j in 0..4 {
                control.push(Vec3::new(i as f32, j as f32, ((i * j) % 3) as f32));
            }
        }
        let steps = 6;
        let grid = sample_bezier_surface(&control, 7, 4, steps);
        assert_eq!(grid.rows(), 2 * steps + 1);

        // Walk across the seam row; consecutive samples must stay close.
        for j in 0..grid.cols() {
            let before = grid.get(steps - 1, j);
            let seam = grid.get(steps, j);
            let after = grid.get(steps + 1, j);
            assert!((seam - before).length() < 1.0);
            assert!((after - seam).length() < 1.0);
        }
    }

    #[test]
    fn test_bspline_surface_matches_direct_evaluation() {
        let control = bump_net();
        let steps = 5;
        let grid = sample_bspline_surface(&control, 4, 4, steps);
        assert_eq!(grid.rows(), steps + 1);
        assert_eq!(grid.cols(), steps + 1);

        let coeff = bspline_patch_coefficients(&control, 4, 0, 0);
        for a in 0..=steps {
            let u = a as f32 / steps as f32;
            let u4 = Vec4::new(u * u * u, u * u, u, 1.0);
            for b in 0..=steps {
                let v = b as f32 / steps as f32;
                let v4 = Vec4::new(v * v * v, v * v, v, 1.0);
                let direct = Vec3::new(
                    u4.dot(coeff[0] * v4),
                    u4.dot(coeff[1] * v4),
                    u4.dot(coeff[2] * v4),
                );
                let fd = grid.get(a, b);
                assert_relative_eq!(fd.x, direct.x, epsilon = 1e-3);
                assert_relative_eq!(fd.y, direct.y, epsilon = 1e-3);
                assert_relative_eq!(fd.z, direct.z, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_bspline_surface_overlapping_patches_stitch() {
        // 5x5 net = 2x2 overlapping patches.
        let mut control = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                control.push(Vec3::new(i as f32, j as f32, (i + j) as f32 * 0.25));
            }
        }
        let steps = 4;
        let grid = sample_bspline_surface(&control, 5, 5, steps);
        assert_eq!(grid.rows(), 2 * steps + 1);
        assert_eq!(grid.cols(), 2 * steps + 1);

        // The stitched grid must be monotone in x along u for this net.
        for j in 0..grid.cols() {
            for i in 1..grid.rows() {
                assert!(grid.get(i, j).x >= grid.get(i - 1, j).x - 1e-4);
            }
        }
    }

    #[test]
    fn test_flat_net_stays_flat() {
        // A planar control net must evaluate to the same plane.
        let mut control = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                control.push(Vec3::new(i as f32, j as f32, 1.5));
            }
        }
        let bez = sample_bezier_surface(&control, 4, 4, 6);
        let bsp = sample_bspline_surface(&control, 4, 4, 6);
        for p in bez.points() {
            assert_relative_eq!(p.z, 1.5, epsilon = 1e-4);
        }
        for p in bsp.points() {
            assert_relative_eq!(p.z, 1.5, epsilon = 1e-4);
        }
    }
}
