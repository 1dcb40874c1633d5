//! Curve evaluators: cubic Bézier (De Casteljau) and uniform cubic
//! B-spline (basis matrix + forward differences).
//!
//! Evaluators turn sparse control points into dense polylines. Sampling
//! loop bounds are fixed by `steps`; every function here is a bounded,
//! deterministic computation.

use glam::Vec3;

/// Default number of sample steps per curve.
pub const DEFAULT_CURVE_STEPS: usize = 100;

/// Evaluates a Bézier curve of arbitrary degree by De Casteljau's
/// repeated linear interpolation.
///
/// `t = 0` and `t = 1` return the first and last control points exactly,
/// not merely within floating tolerance.
#[must_use]
pub fn de_casteljau(control: &[Vec3], t: f32) -> Vec3 {
    let n = control.len();
    if t == 0.0 {
        return control[0];
    }
    if t == 1.0 {
        return control[n - 1];
    }
    let mut pts = control.to_vec();
    for r in 1..n {
        for i in 0..n - r {
            pts[i] = pts[i].lerp(pts[i + 1], t);
        }
    }
    pts[0]
}

/// Returns true if `count` control points form a valid piecewise cubic
/// Bézier chain (4 points plus 2 per additional segment).
#[must_use]
pub fn valid_bezier_count(count: usize) -> bool {
    count >= 4 && (count - 4) % 2 == 0
}

/// Samples a piecewise cubic Bézier chain.
///
/// Control counts of `4 + 2k` describe `k + 1` segments. Each segment
/// after the first supplies only its last two control points; the first
/// two are synthesized as `q0 = prev p3` and `q1 = 2*prev p3 - prev p2`,
/// which makes consecutive segments share a point and a tangent (C1
/// continuity across the join). This smooth-join rule is a deliberate
/// design choice, pinned by `test_smooth_join_tangent_continuity`.
#[must_use]
pub fn sample_bezier(control: &[Vec3], steps: usize) -> Vec<Vec3> {
    debug_assert!(valid_bezier_count(control.len()));
    debug_assert!(steps > 0);

    let segments = 1 + (control.len() - 4) / 2;
    let mut samples = Vec::with_capacity(segments * steps + 1);

    let mut seg = [control[0], control[1], control[2], control[3]];
    let mut next = 4;
    let mut first_segment = true;
    loop {
        // Joint samples are shared between segments; emit t = 0 only once.
        let start = usize::from(!first_segment);
        for s in start..=steps {
            let t = s as f32 / steps as f32;
            samples.push(de_casteljau(&seg, t));
        }
        if next >= control.len() {
            break;
        }
        seg = [
            seg[3],
            2.0 * seg[3] - seg[2],
            control[next],
            control[next + 1],
        ];
        next += 2;
        first_segment = false;
    }
    samples
}

/// The uniform cubic B-spline basis matrix rows, times 6.
///
/// Coefficient vectors come out as `[a, b, c, d]` with
/// `C(t) = a t^3 + b t^2 + c t + d`.
pub(crate) const BSPLINE_BASIS_6: [[f32; 4]; 4] = [
    [-1.0, 3.0, -3.0, 1.0],
    [3.0, -6.0, 3.0, 0.0],
    [-3.0, 0.0, 3.0, 0.0],
    [1.0, 4.0, 1.0, 0.0],
];

/// Blends a window of 4 control points into cubic polynomial
/// coefficients `[a, b, c, d]`.
#[must_use]
pub fn bspline_coefficients(window: [Vec3; 4]) -> [Vec3; 4] {
    let mut coeff = [Vec3::ZERO; 4];
    for (row, out) in BSPLINE_BASIS_6.iter().zip(coeff.iter_mut()) {
        *out = (row[0] * window[0]
            + row[1] * window[1]
            + row[2] * window[2]
            + row[3] * window[3])
            / 6.0;
    }
    coeff
}

/// Samples the cubic `a t^3 + b t^2 + c t + d` at `steps + 1` uniform
/// parameters in `[0, 1]` by the forward-difference recurrence: the
/// running value is advanced by iteratively adding first, second and
/// third differences instead of re-evaluating the polynomial.
///
/// Shared by the B-spline curve sampler and the surface patch evaluator.
#[must_use]
pub(crate) fn cubic_forward_samples(coeff: [Vec3; 4], steps: usize) -> Vec<Vec3> {
    let [a, b, c, d] = coeff;
    let d1 = 1.0 / steps as f32;
    let d2 = d1 * d1;
    let d3 = d2 * d1;

    let mut f = d;
    let mut df = a * d3 + b * d2 + c * d1;
    let mut df2 = 6.0 * a * d3 + 2.0 * b * d2;
    let df3 = 6.0 * a * d3;

    let mut samples = Vec::with_capacity(steps + 1);
    samples.push(f);
    for _ in 0..steps {
        f += df;
        df += df2;
        df2 += df3;
        samples.push(f);
    }
    samples
}

/// Direct polynomial evaluation of one B-spline segment at `t`.
///
/// Kept alongside the forward-difference sampler as its reference; the
/// two must agree to within a small epsilon.
#[must_use]
pub fn eval_bspline_segment(window: [Vec3; 4], t: f32) -> Vec3 {
    let [a, b, c, d] = bspline_coefficients(window);
    ((a * t + b) * t + c) * t + d
}

/// Samples a uniform cubic B-spline over every window of 4 consecutive
/// control points.
///
/// Evaluation uses the forward-difference recurrence (iteratively adding
/// first/second/third differences) instead of re-evaluating the
/// polynomial per sample. Consecutive windows share their joint point, so
/// the output holds `steps * (n - 3) + 1` samples with no duplicates.
#[must_use]
pub fn sample_bspline(control: &[Vec3], steps: usize) -> Vec<Vec3> {
    debug_assert!(control.len() >= 4);
    debug_assert!(steps > 0);

    let mut samples = Vec::with_capacity(steps * (control.len() - 3) + 1);
    for (w, window) in control.windows(4).enumerate() {
        let coeff = bspline_coefficients([window[0], window[1], window[2], window[3]]);
        let segment = cubic_forward_samples(coeff, steps);
        // Consecutive windows share their joint sample.
        let skip = usize::from(w > 0);
        samples.extend_from_slice(&segment[skip..]);
    }
    samples
}
