//! The frame pipeline: world drawables in, device primitives out.
//!
//! Each frame runs the same fixed stages over every drawable's
//! renderable points (sample caches for curves and surfaces, defining
//! points otherwise):
//!
//! 1. world -> view (translate the window center to the origin, rotate
//!    the window basis onto the canonical axes)
//! 2. projection (parallel drop-Z, or perspective divide)
//! 3. normalization by the window half-extents
//! 4. clipping against the inset normalized region
//! 5. normalized -> device pixels
//!
//! Drawables clipped entirely away simply produce no primitives; the
//! pipeline itself never fails.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use vellum_core::drawable::{Drawable, DrawableKind};
use vellum_core::{Color, SampleGrid, Transform2D, Transform3D};

use crate::clip::{ClipRegion, LineClipMethod};
use crate::primitive::Primitive;
use crate::viewport::Viewport;
use crate::window::Window;

/// How view-space points are flattened onto the view plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Orthographic: drop the view Z coordinate.
    #[default]
    Parallel,
    /// Single-point perspective with the center of projection `distance`
    /// behind the view plane. Points at or behind the center of
    /// projection are invisible.
    Perspective { distance: f32 },
}

/// Per-frame pipeline configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Projection mode.
    pub projection: Projection,
    /// Fraction of the normalized extent kept clear of geometry, so
    /// clipping is visible inside the viewport edge.
    pub clip_margin: f32,
    /// Which line-clipping algorithm to run.
    pub line_clip: LineClipMethod,
    /// Sort drawables far-to-near under perspective so nearer geometry
    /// paints last.
    pub depth_sort: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            projection: Projection::Parallel,
            clip_margin: 1.0 / 15.0,
            line_clip: LineClipMethod::LiangBarsky,
            depth_sort: true,
        }
    }
}

/// Runs the full pipeline over a frame's drawables.
#[must_use]
pub fn render_frame(
    drawables: &[Drawable],
    window: &Window,
    viewport: &Viewport,
    options: &PipelineOptions,
) -> Vec<Primitive> {
    let view = window.view_transform();
    let region = ClipRegion::normalized(options.clip_margin);
    let device = viewport.device_transform(&region);
    let half = window.half_extents();

    let mut batches: Vec<(f32, Vec<Primitive>)> = Vec::with_capacity(drawables.len());
    for drawable in drawables {
        let (depth, prims) =
            render_drawable(drawable, &view, &region, &device, half, options);
        if !prims.is_empty() {
            batches.push((depth, prims));
        }
    }

    if options.depth_sort && matches!(options.projection, Projection::Perspective { .. }) {
        // Far to near; NaN depths (empty batches never get here) sort last.
        batches.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    }

    let out: Vec<Primitive> = batches.into_iter().flat_map(|(_, p)| p).collect();
    log::debug!(
        "rendered {} drawables into {} primitives",
        drawables.len(),
        out.len()
    );
    out
}

/// Pipeline for one drawable: returns its mean view depth and its
/// primitives (possibly empty when fully clipped or culled).
fn render_drawable(
    drawable: &Drawable,
    view: &Transform3D,
    region: &ClipRegion,
    device: &Transform2D,
    half: Vec2,
    options: &PipelineOptions,
) -> (f32, Vec<Primitive>) {
    let color = drawable.color();
    match drawable.kind() {
        DrawableKind::Point => {
            let v = view.apply(drawable.points());
            let projected = project_all(&v, options.projection, half);
            let prims = match projected[0] {
                Some(p) if region.contains(p) => vec![Primitive::Dot {
                    position: device.apply_point(p),
                    color,
                }],
                _ => Vec::new(),
            };
            (mean_depth(&v), prims)
        }
        DrawableKind::Line => {
            let v = view.apply(drawable.points());
            let projected = project_all(&v, options.projection, half);
            let prims = match (projected[0], projected[1]) {
                (Some(a), Some(b)) => region
                    .clip_line(a, b, options.line_clip)
                    .map(|(ca, cb)| {
                        vec![Primitive::Segment {
                            start: device.apply_point(ca),
                            end: device.apply_point(cb),
                            color,
                        }]
                    })
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
            (mean_depth(&v), prims)
        }
        DrawableKind::Wireframe { filled } => {
            let v = view.apply(drawable.points());
            let projected = project_all(&v, options.projection, half);
            // A polygon with any vertex behind the center of projection
            // is dropped whole rather than partially re-topologized.
            let Some(flat) = projected.into_iter().collect::<Option<Vec<Vec2>>>() else {
                return (mean_depth(&v), Vec::new());
            };
            let clipped = region.clip_polygon(&flat);
            let prims = polygon_primitive(&clipped, device, color, *filled);
            (mean_depth(&v), prims)
        }
        DrawableKind::Curve { samples, .. } => {
            let v = view.apply(samples);
            let projected = project_all(&v, options.projection, half);
            let prims = chain_primitives(&projected, region, device, color, options.line_clip);
            (mean_depth(&v), prims)
        }
        DrawableKind::Surface {
            samples, filled, ..
        } => {
            let v = samples.with_points(view.apply(samples.points()));
            let prims = if *filled {
                surface_cells(&v, region, device, half, color, options)
            } else {
                surface_wires(&v, region, device, half, color, options)
            };
            (mean_depth(v.points()), prims)
        }
    }
}

/// Mean view-space depth along the view-plane normal.
fn mean_depth(view_points: &[Vec3]) -> f32 {
    if view_points.is_empty() {
        return 0.0;
    }
    view_points.iter().map(|p| p.z).sum::<f32>() / view_points.len() as f32
}

/// Projects view-space points into the normalized square. `None` marks a
/// point invisible under perspective (at or behind the center of
/// projection).
fn project_all(view_points: &[Vec3], projection: Projection, half: Vec2) -> Vec<Option<Vec2>> {
    view_points
        .iter()
        .map(|p| project_point(*p, projection, half))
        .collect()
}

fn project_point(p: Vec3, projection: Projection, half: Vec2) -> Option<Vec2> {
    let flat = match projection {
        Projection::Parallel => Vec2::new(p.x, p.y),
        Projection::Perspective { distance } => {
            if p.z <= -distance {
                return None;
            }
            let factor = distance / (distance + p.z);
            Vec2::new(p.x * factor, p.y * factor)
        }
    };
    Some(Vec2::new(flat.x / half.x, flat.y / half.y))
}

/// Clips a projected sample chain segment by segment and merges the
/// survivors into device-space polylines. Invisible samples and
/// clipped-away segments break the chain.
fn chain_primitives(
    projected: &[Option<Vec2>],
    region: &ClipRegion,
    device: &Transform2D,
    color: Color,
    method: LineClipMethod,
) -> Vec<Primitive> {
    let mut prims = Vec::new();
    let mut run: Vec<Vec2> = Vec::new();

    let flush = |run: &mut Vec<Vec2>, prims: &mut Vec<Primitive>| {
        if run.len() >= 2 {
            prims.push(Primitive::Polyline {
                points: run.iter().map(|p| device.apply_point(*p)).collect(),
                color,
            });
        }
        run.clear();
    };

    for pair in projected.windows(2) {
        let (Some(a), Some(b)) = (pair[0], pair[1]) else {
            flush(&mut run, &mut prims);
            continue;
        };
        match region.clip_line(a, b, method) {
            Some((ca, cb)) => {
                match run.last() {
                    Some(last) if (*last - ca).length() < 1e-5 => {}
                    Some(_) => {
                        flush(&mut run, &mut prims);
                        run.push(ca);
                    }
                    None => run.push(ca),
                }
                run.push(cb);
            }
            None => flush(&mut run, &mut prims),
        }
    }
    flush(&mut run, &mut prims);
    prims
}

/// Maps a clipped polygon into device space, filled or as a closed
/// outline. Degenerate results (fewer than three vertices) are dropped.
fn polygon_primitive(
    clipped: &[Vec2],
    device: &Transform2D,
    color: Color,
    filled: bool,
) -> Vec<Primitive> {
    if clipped.len() < 3 {
        return Vec::new();
    }
    let mut points: Vec<Vec2> = clipped.iter().map(|p| device.apply_point(*p)).collect();
    if filled {
        vec![Primitive::FilledPolygon { points, color }]
    } else {
        points.push(points[0]);
        vec![Primitive::Polyline { points, color }]
    }
}

/// Wireframe surface rendering: one clipped polyline per sample row and
/// per sample column.
fn surface_wires(
    grid: &SampleGrid,
    region: &ClipRegion,
    device: &Transform2D,
    half: Vec2,
    color: Color,
    options: &PipelineOptions,
) -> Vec<Primitive> {
    let mut prims = Vec::new();
    for r in 0..grid.rows() {
        let row: Vec<Option<Vec2>> = (0..grid.cols())
            .map(|c| project_point(grid.get(r, c), options.projection, half))
            .collect();
        prims.extend(chain_primitives(&row, region, device, color, options.line_clip));
    }
    for c in 0..grid.cols() {
        let col: Vec<Option<Vec2>> = (0..grid.rows())
            .map(|r| project_point(grid.get(r, c), options.projection, half))
            .collect();
        prims.extend(chain_primitives(&col, region, device, color, options.line_clip));
    }
    prims
}

/// Filled surface rendering: each quad cell of the sample grid is
/// polygon-clipped and emitted on its own. Cells with an invisible
/// corner are skipped.
fn surface_cells(
    grid: &SampleGrid,
    region: &ClipRegion,
    device: &Transform2D,
    half: Vec2,
    color: Color,
    options: &PipelineOptions,
) -> Vec<Primitive> {
    let mut prims = Vec::new();
    for r in 0..grid.rows().saturating_sub(1) {
        for c in 0..grid.cols().saturating_sub(1) {
            let corners = [
                grid.get(r, c),
                grid.get(r, c + 1),
                grid.get(r + 1, c + 1),
                grid.get(r + 1, c),
            ];
            let mut quad = Vec::with_capacity(4);
            for corner in corners {
                match project_point(corner, options.projection, half) {
                    Some(p) => quad.push(p),
                    None => {
                        quad.clear();
                        break;
                    }
                }
            }
            if quad.is_empty() {
                continue;
            }
            let clipped = region.clip_polygon(&quad);
            prims.extend(polygon_primitive(&clipped, device, color, true));
        }
    }
    prims
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use vellum_core::CurveBasis;

    use super::*;

    fn setup() -> (Window, Viewport, PipelineOptions) {
        (Window::new(), Viewport::new(800.0, 600.0), PipelineOptions::default())
    }

    fn dot_position(prims: &[Primitive]) -> Vec2 {
        match prims {
            [Primitive::Dot { position, .. }] => *position,
            other => panic!("expected one dot, got {other:?}"),
        }
    }

    #[test]
    fn test_origin_point_lands_at_device_center() {
        let (w, vp, opts) = setup();
        let d = Drawable::point("p", Vec3::ZERO, Color::BLACK);
        let prims = render_frame(&[d], &w, &vp, &opts);
        let p = dot_position(&prims);
        assert_relative_eq!(p.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_y_up_world_is_y_down_device() {
        let (w, vp, opts) = setup();
        let d = Drawable::point("p", Vec3::new(0.0, 50.0, 0.0), Color::BLACK);
        let prims = render_frame(&[d], &w, &vp, &opts);
        // World +Y is above center; device Y grows downward.
        assert!(dot_position(&prims).y < 300.0);
    }

    #[test]
    fn test_out_of_window_point_produces_nothing() {
        let (w, vp, opts) = setup();
        let d = Drawable::point("p", Vec3::new(1000.0, 0.0, 0.0), Color::BLACK);
        assert!(render_frame(&[d], &w, &vp, &opts).is_empty());
    }

    #[test]
    fn test_crossing_line_is_clipped_to_viewport() {
        let (w, vp, opts) = setup();
        let d = Drawable::line(
            "l",
            Vec3::ZERO,
            Vec3::new(1000.0, 0.0, 0.0),
            Color::BLACK,
        );
        let prims = render_frame(&[d], &w, &vp, &opts);
        match &prims[..] {
            [Primitive::Segment { start, end, .. }] => {
                assert_relative_eq!(start.x, 400.0, epsilon = 1e-2);
                assert_relative_eq!(start.y, 300.0, epsilon = 1e-2);
                // Clipped at the region edge, which maps to the device edge.
                assert_relative_eq!(end.x, 800.0, epsilon = 1e-2);
                assert_relative_eq!(end.y, 300.0, epsilon = 1e-2);
            }
            other => panic!("expected one segment, got {other:?}"),
        }
    }

    #[test]
    fn test_both_clip_methods_give_same_frame() {
        let (w, vp, mut opts) = setup();
        let d = Drawable::line(
            "l",
            Vec3::new(-500.0, 30.0, 0.0),
            Vec3::new(500.0, -30.0, 0.0),
            Color::BLACK,
        );
        let lb = render_frame(std::slice::from_ref(&d), &w, &vp, &opts);
        opts.line_clip = LineClipMethod::CohenSutherland;
        let cs = render_frame(&[d], &w, &vp, &opts);
        match (&lb[..], &cs[..]) {
            (
                [Primitive::Segment { start: s0, end: e0, .. }],
                [Primitive::Segment { start: s1, end: e1, .. }],
            ) => {
                assert!((*s0 - *s1).length() < 1e-2);
                assert!((*e0 - *e1).length() < 1e-2);
            }
            other => panic!("frames disagree: {other:?}"),
        }
    }

    #[test]
    fn test_filled_wireframe_stays_in_device_bounds() {
        let (w, vp, opts) = setup();
        let d = Drawable::wireframe(
            "tri",
            vec![
                Vec3::new(-500.0, -500.0, 0.0),
                Vec3::new(500.0, -500.0, 0.0),
                Vec3::new(0.0, 500.0, 0.0),
            ],
            Color::BLACK,
            true,
        )
        .unwrap();
        let prims = render_frame(&[d], &w, &vp, &opts);
        match &prims[..] {
            [Primitive::FilledPolygon { points, .. }] => {
                for p in points {
                    assert!(p.x >= -1e-2 && p.x <= 800.01, "x escaped: {p}");
                    assert!(p.y >= -1e-2 && p.y <= 600.01, "y escaped: {p}");
                }
            }
            other => panic!("expected one filled polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_unfilled_wireframe_outline_is_closed() {
        let (w, vp, opts) = setup();
        let d = Drawable::wireframe(
            "tri",
            vec![
                Vec3::new(-20.0, -20.0, 0.0),
                Vec3::new(20.0, -20.0, 0.0),
                Vec3::new(0.0, 20.0, 0.0),
            ],
            Color::BLACK,
            false,
        )
        .unwrap();
        let prims = render_frame(&[d], &w, &vp, &opts);
        match &prims[..] {
            [Primitive::Polyline { points, .. }] => {
                assert_eq!(points.first(), points.last());
                assert_eq!(points.len(), 4);
            }
            other => panic!("expected one closed polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_perspective_matches_manual_divide() {
        let (w, vp, mut opts) = setup();
        opts.projection = Projection::Perspective { distance: 50.0 };
        // z = 50 at d = 50 halves the apparent offset.
        let far = Drawable::point("far", Vec3::new(50.0, 0.0, 50.0), Color::BLACK);
        let reference = Drawable::point("ref", Vec3::new(25.0, 0.0, 0.0), Color::BLACK);

        let a = dot_position(&render_frame(&[far], &w, &vp, &opts));
        let b = dot_position(&render_frame(&[reference], &w, &vp, &opts));
        assert!((a - b).length() < 1e-2, "{a} vs {b}");
    }

    #[test]
    fn test_point_behind_projection_center_is_culled() {
        let (w, vp, mut opts) = setup();
        opts.projection = Projection::Perspective { distance: 50.0 };
        let d = Drawable::point("p", Vec3::new(0.0, 0.0, -100.0), Color::BLACK);
        assert!(render_frame(&[d], &w, &vp, &opts).is_empty());
    }

    #[test]
    fn test_depth_sort_paints_far_first() {
        let (w, vp, mut opts) = setup();
        opts.projection = Projection::Perspective { distance: 100.0 };
        let near = Drawable::point("near", Vec3::new(5.0, 0.0, 0.0), Color::WHITE);
        let far = Drawable::point("far", Vec3::new(5.0, 0.0, 80.0), Color::BLACK);
        let prims = render_frame(&[near, far], &w, &vp, &opts);
        assert_eq!(prims.len(), 2);
        // The far (black) point paints first, the near (white) one last.
        assert_eq!(prims[0].color(), Color::BLACK);
        assert_eq!(prims[1].color(), Color::WHITE);
    }

    #[test]
    fn test_curve_inside_is_one_polyline() {
        let (w, vp, opts) = setup();
        let d = Drawable::curve(
            "c",
            CurveBasis::Bezier,
            vec![
                Vec3::new(-40.0, 0.0, 0.0),
                Vec3::new(-10.0, 40.0, 0.0),
                Vec3::new(10.0, -40.0, 0.0),
                Vec3::new(40.0, 0.0, 0.0),
            ],
            Color::BLACK,
            20,
        )
        .unwrap();
        let prims = render_frame(&[d], &w, &vp, &opts);
        match &prims[..] {
            [Primitive::Polyline { points, .. }] => assert_eq!(points.len(), 21),
            other => panic!("expected one polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_curve_exiting_window_splits_into_runs() {
        let (w, vp, opts) = setup();
        // A wide flat Bézier poking out both sides: the visible middle
        // survives as a single clipped polyline.
        let d = Drawable::curve(
            "c",
            CurveBasis::Bezier,
            vec![
                Vec3::new(-400.0, 0.0, 0.0),
                Vec3::new(-100.0, 0.0, 0.0),
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(400.0, 0.0, 0.0),
            ],
            Color::BLACK,
            50,
        )
        .unwrap();
        let prims = render_frame(&[d], &w, &vp, &opts);
        assert_eq!(prims.len(), 1);
        match &prims[0] {
            Primitive::Polyline { points, .. } => {
                for p in points {
                    assert!(p.x >= -1e-2 && p.x <= 800.01);
                }
            }
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_surface_wireframe_emits_row_and_column_lines() {
        let (w, vp, opts) = setup();
        let control: Vec<Vec3> = (0..16)
            .map(|i| {
                let r = (i / 4) as f32;
                let c = (i % 4) as f32;
                Vec3::new(c * 20.0 - 30.0, r * 20.0 - 30.0, 0.0)
            })
            .collect();
        let d = Drawable::surface(
            "s",
            CurveBasis::Bezier,
            control,
            4,
            4,
            Color::BLACK,
            5,
            false,
        )
        .unwrap();
        let prims = render_frame(&[d], &w, &vp, &opts);
        // 6 sample rows + 6 sample columns, all fully visible.
        assert_eq!(prims.len(), 12);
        assert!(prims
            .iter()
            .all(|p| matches!(p, Primitive::Polyline { .. })));
    }

    #[test]
    fn test_filled_surface_emits_quads() {
        let (w, vp, opts) = setup();
        let control: Vec<Vec3> = (0..16)
            .map(|i| {
                let r = (i / 4) as f32;
                let c = (i % 4) as f32;
                Vec3::new(c * 20.0 - 30.0, r * 20.0 - 30.0, 0.0)
            })
            .collect();
        let d = Drawable::surface(
            "s",
            CurveBasis::Bezier,
            control,
            4,
            4,
            Color::BLACK,
            5,
            true,
        )
        .unwrap();
        let prims = render_frame(&[d], &w, &vp, &opts);
        // A 6x6 sample grid has 5x5 cells.
        assert_eq!(prims.len(), 25);
        assert!(prims
            .iter()
            .all(|p| matches!(p, Primitive::FilledPolygon { .. })));
    }

    #[test]
    fn test_pipeline_options_json_round_trip() {
        let opts = PipelineOptions {
            projection: Projection::Perspective { distance: 123.0 },
            line_clip: LineClipMethod::CohenSutherland,
            ..PipelineOptions::default()
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: PipelineOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.line_clip, LineClipMethod::CohenSutherland);
        assert!(matches!(
            back.projection,
            Projection::Perspective { distance } if (distance - 123.0).abs() < 1e-6
        ));
    }
}
