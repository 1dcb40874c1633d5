//! The persisted world format: a minimal OBJ/MTL dialect.
//!
//! Geometry goes into a Wavefront-style `.obj`: a global `v x y z`
//! vertex list plus named objects (`o name`) whose elements reference
//! 1-based vertex indices — `p` for points, `l` for polylines (two
//! indices make a line, more a closed outline), `f` for filled faces.
//! Colors travel in a companion `.mtl` as `newmtl <name>` / `Kd r g b`
//! diffuse triples, linked by `usemtl`.
//!
//! Curves and surfaces have no element form here; they are skipped on
//! export.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use vellum_core::{Color, Drawable, DrawableKind, Result, VellumError};

use crate::scene::Scene;

/// An exported scene: the `.obj` body and its companion `.mtl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjDocument {
    pub obj: String,
    pub mtl: String,
}

/// Serializes a scene into the OBJ/MTL pair.
///
/// `mtl_name` is the library file name written into the `mtllib` line.
#[must_use]
pub fn export_scene(scene: &Scene, mtl_name: &str) -> ObjDocument {
    let mut obj = String::new();
    let mut mtl = String::new();
    let mut offset = 0usize;

    obj.push_str(&format!("mtllib {mtl_name}\n"));
    for drawable in scene {
        let marker = match drawable.kind() {
            DrawableKind::Point => "p",
            DrawableKind::Line => "l",
            DrawableKind::Wireframe { filled } => {
                if *filled {
                    "f"
                } else {
                    "l"
                }
            }
            DrawableKind::Curve { .. } | DrawableKind::Surface { .. } => {
                log::warn!(
                    "obj export: skipping '{}' (no element form for curves/surfaces)",
                    drawable.name()
                );
                continue;
            }
        };

        obj.push_str(&format!("o {}\n", drawable.name()));
        for p in drawable.points() {
            obj.push_str(&format!("v {} {} {}\n", p.x, p.y, p.z));
        }
        obj.push_str(&format!("usemtl {}\n", drawable.name()));
        obj.push_str(marker);
        for i in 0..drawable.points().len() {
            obj.push_str(&format!(" {}", offset + i + 1));
        }
        obj.push('\n');
        offset += drawable.points().len();

        let c = drawable.color();
        mtl.push_str(&format!("newmtl {}\n", drawable.name()));
        mtl.push_str(&format!("Kd {} {} {}\n", c.r, c.g, c.b));
    }

    ObjDocument { obj, mtl }
}

/// Parses an OBJ/MTL pair back into a scene.
///
/// Malformed coordinates, indices, or color triples fail with
/// [`VellumError::ObjParse`] carrying the offending line number.
pub fn import_scene(obj: &str, mtl: &str) -> Result<Scene> {
    let materials = parse_mtl(mtl)?;

    let mut scene = Scene::new();
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut name: Option<String> = None;
    let mut material: Option<String> = None;
    let mut anonymous = 0usize;

    for (idx, raw) in obj.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let Some(key) = fields.next() else { continue };
        let rest: Vec<&str> = fields.collect();

        match key {
            "v" => vertices.push(parse_vertex(&rest, line)?),
            "o" => {
                name = Some(rest.join(" "));
                material = None;
            }
            "usemtl" => material = Some(rest.join(" ")),
            "p" | "l" | "f" => {
                let points = resolve_indices(&rest, &vertices, line)?;
                let object_name = name.take().unwrap_or_else(|| {
                    anonymous += 1;
                    format!("object{anonymous}")
                });
                let color = material
                    .take()
                    .and_then(|m| materials.get(&m).copied())
                    .unwrap_or_default();
                let drawable = build_drawable(key, object_name, points, color, line)?;
                scene.add(drawable)?;
            }
            // mtllib and anything else this dialect doesn't model.
            _ => {}
        }
    }
    Ok(scene)
}

/// Writes a scene to `path` and its materials next to it, swapping the
/// extension for `.mtl`.
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mtl_path = path.with_extension("mtl");
    let mtl_name = mtl_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene.mtl".to_string());

    let doc = export_scene(scene, &mtl_name);
    std::fs::write(path, doc.obj)?;
    std::fs::write(mtl_path, doc.mtl)?;
    log::info!("obj: saved {} object(s) to {}", scene.len(), path.display());
    Ok(())
}

/// Reads a scene from `path`, with materials from the sibling `.mtl`
/// when one exists.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let obj = std::fs::read_to_string(path)?;
    let mtl_path = path.with_extension("mtl");
    let mtl = if mtl_path.exists() {
        std::fs::read_to_string(mtl_path)?
    } else {
        String::new()
    };
    let scene = import_scene(&obj, &mtl)?;
    log::info!("obj: loaded {} object(s) from {}", scene.len(), path.display());
    Ok(scene)
}

fn parse_mtl(mtl: &str) -> Result<HashMap<String, Color>> {
    let mut materials = HashMap::new();
    let mut current: Option<String> = None;

    for (idx, raw) in mtl.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let Some(key) = fields.next() else { continue };
        let rest: Vec<&str> = fields.collect();

        match key {
            "newmtl" => current = Some(rest.join(" ")),
            "Kd" => {
                let name = current.clone().ok_or_else(|| VellumError::ObjParse {
                    line,
                    message: "Kd before any newmtl".to_string(),
                })?;
                if rest.len() != 3 {
                    return Err(VellumError::ObjParse {
                        line,
                        message: format!("Kd needs 3 components, got {}", rest.len()),
                    });
                }
                let mut rgb = [0f32; 3];
                for (slot, field) in rgb.iter_mut().zip(rest.iter().copied()) {
                    *slot = parse_float(field, line)?;
                }
                materials.insert(name, Color::new(rgb[0], rgb[1], rgb[2]));
            }
            _ => {}
        }
    }
    Ok(materials)
}

fn parse_float(field: &str, line: usize) -> Result<f32> {
    field.parse().map_err(|_| VellumError::ObjParse {
        line,
        message: format!("'{field}' is not a number"),
    })
}

fn parse_vertex(fields: &[&str], line: usize) -> Result<Vec3> {
    if fields.len() < 2 || fields.len() > 3 {
        return Err(VellumError::ObjParse {
            line,
            message: format!("vertex needs 2 or 3 coordinates, got {}", fields.len()),
        });
    }
    let x = parse_float(fields[0], line)?;
    let y = parse_float(fields[1], line)?;
    let z = if fields.len() == 3 {
        parse_float(fields[2], line)?
    } else {
        0.0
    };
    Ok(Vec3::new(x, y, z))
}

fn resolve_indices(fields: &[&str], vertices: &[Vec3], line: usize) -> Result<Vec<Vec3>> {
    if fields.is_empty() {
        return Err(VellumError::ObjParse {
            line,
            message: "element with no vertex indices".to_string(),
        });
    }
    let mut points = Vec::with_capacity(fields.len());
    for field in fields {
        // Tolerate v/vt/vn triples; only the vertex index matters here.
        let index_part = field.split('/').next().unwrap_or(field);
        let index: usize = index_part.parse().map_err(|_| VellumError::ObjParse {
            line,
            message: format!("'{field}' is not a vertex index"),
        })?;
        if index == 0 || index > vertices.len() {
            return Err(VellumError::ObjParse {
                line,
                message: format!(
                    "vertex index {index} out of range (1..={})",
                    vertices.len()
                ),
            });
        }
        points.push(vertices[index - 1]);
    }
    Ok(points)
}

fn build_drawable(
    marker: &str,
    name: String,
    points: Vec<Vec3>,
    color: Color,
    line: usize,
) -> Result<Drawable> {
    match (marker, points.len()) {
        ("p", 1) => Ok(Drawable::point(name, points[0], color)),
        ("p", n) => Err(VellumError::ObjParse {
            line,
            message: format!("point element needs 1 index, got {n}"),
        }),
        ("l", 2) => Ok(Drawable::line(name, points[0], points[1], color)),
        ("l", _) => Drawable::wireframe(name, points, color, false),
        ("f", _) => Drawable::wireframe(name, points, color, true),
        _ => unreachable!("caller dispatches only p/l/f"),
    }
}
