//! OBJ scene loading
//!
//! Reads a Wavefront OBJ file into a [`Scene`]: one object per `o`/`g`
//! statement, polygons fan-triangulated, smoothing groups mapped to the
//! per-face smoothing flag. The `v x y z r g b` vertex-color extension is
//! honoured.

use glam::Vec3;
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ExportError, Result};
use crate::scene::{Scene, SceneObject, SourceCorner, SourceTriangle};

/// Name given to geometry that appears before any `o`/`g` statement
const DEFAULT_OBJECT_NAME: &str = "default";

/// Resolved `v/vt/vn` reference (0-based)
#[derive(Debug, Clone, Copy)]
struct FaceRef {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

#[derive(Debug)]
struct PendingTriangle {
    refs: [FaceRef; 3],
    /// Normal of the whole source polygon, shared by all its triangles
    face_normal: Vec3,
    smooth: bool,
}

#[derive(Debug, Default)]
struct ObjData {
    positions: Vec<[f32; 3]>,
    colors: Vec<Option<[f32; 3]>>,
    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
}

/// Load an OBJ file from disk
pub fn load_obj(path: &Path) -> Result<Scene> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Parse OBJ text into a scene
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Scene> {
    let mut data = ObjData::default();
    let mut scene = Scene::new();

    let mut name = DEFAULT_OBJECT_NAME.to_string();
    let mut pending: Vec<PendingTriangle> = Vec::new();
    let mut smooth = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let args = &parts[1..];

        match parts[0] {
            "v" => {
                let [x, y, z] = parse_floats(args, line_no, "v")?;
                data.positions.push([x, y, z]);
                let color = if args.len() >= 6 {
                    Some(parse_floats(&args[3..], line_no, "v color")?)
                } else {
                    None
                };
                data.colors.push(color);
            }
            "vt" => {
                let [u, v] = parse_floats(args, line_no, "vt")?;
                data.texcoords.push([u, v]);
            }
            "vn" => {
                let normal = parse_floats(args, line_no, "vn")?;
                data.normals.push(normal);
            }
            "s" => {
                smooth = !matches!(args.first(), None | Some(&"off") | Some(&"0"));
            }
            "o" | "g" => {
                finish_object(&mut scene, &data, &name, std::mem::take(&mut pending));
                name = if args.is_empty() {
                    DEFAULT_OBJECT_NAME.to_string()
                } else {
                    args.join(" ")
                };
            }
            "f" => {
                let refs = args
                    .iter()
                    .map(|r| parse_face_ref(r, &data, line_no))
                    .collect::<Result<Vec<_>>>()?;
                if refs.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least 3 vertices"));
                }
                let face_normal = polygon_normal(&refs, &data);
                // Fan triangulation
                for i in 1..refs.len() - 1 {
                    pending.push(PendingTriangle {
                        refs: [refs[0], refs[i], refs[i + 1]],
                        face_normal,
                        smooth,
                    });
                }
            }
            _ => {}
        }
    }

    finish_object(&mut scene, &data, &name, pending);
    Ok(scene)
}

/// Turn pending triangles into source triangles and append the object
fn finish_object(scene: &mut Scene, data: &ObjData, name: &str, pending: Vec<PendingTriangle>) {
    if pending.is_empty() {
        return;
    }

    // Area-weighted face normals accumulated per position, for smooth faces
    // that carry no explicit `vn`
    let mut vertex_normals: HashMap<usize, Vec3> = HashMap::new();
    for tri in &pending {
        let [p0, p1, p2] = tri.refs.map(|r| Vec3::from(data.positions[r.v]));
        let cross = (p1 - p0).cross(p2 - p0);
        for r in &tri.refs {
            *vertex_normals.entry(r.v).or_insert(Vec3::ZERO) += cross;
        }
    }

    let triangles = pending
        .iter()
        .map(|tri| SourceTriangle {
            corners: tri.refs.map(|r| SourceCorner {
                position: data.positions[r.v],
                texcoord: r.vt.map(|i| data.texcoords[i]),
                vertex_normal: match r.vn {
                    Some(i) => data.normals[i],
                    None => vertex_normals
                        .get(&r.v)
                        .and_then(|n| n.try_normalize())
                        .map(positive_zero)
                        .unwrap_or(tri.face_normal)
                        .to_array(),
                },
                color: data.colors[r.v],
            }),
            face_normal: tri.face_normal.to_array(),
            smooth: tri.smooth,
        })
        .collect();

    scene.objects.push(SceneObject {
        name: name.to_string(),
        selected: false,
        triangles,
    });
}

/// Unit normal of a polygon from the sum of its fan triangle normals
fn polygon_normal(refs: &[FaceRef], data: &ObjData) -> Vec3 {
    let p0 = Vec3::from(data.positions[refs[0].v]);
    let sum = refs[1..]
        .windows(2)
        .map(|w| {
            let p1 = Vec3::from(data.positions[w[0].v]);
            let p2 = Vec3::from(data.positions[w[1].v]);
            (p1 - p0).cross(p2 - p0)
        })
        .fold(Vec3::ZERO, |acc, n| acc + n);
    positive_zero(sum.normalize_or_zero())
}

/// Map `-0.0` components to `+0.0` so equal directions compare bitwise equal
fn positive_zero(v: Vec3) -> Vec3 {
    v + Vec3::ZERO
}

fn parse_error(line: usize, message: impl Into<String>) -> ExportError {
    ExportError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(args: &[&str], line: usize, what: &str) -> Result<[f32; N]> {
    if args.len() < N {
        return Err(parse_error(
            line,
            format!("'{}' expects {} values, found {}", what, N, args.len()),
        ));
    }
    let mut out = [0.0f32; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| parse_error(line, format!("invalid number '{}' in '{}'", arg, what)))?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index
fn resolve_index(raw: &str, count: usize, line: usize) -> Result<usize> {
    let index: i64 = raw
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{}'", raw)))?;
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(parse_error(
            line,
            format!("index {} out of range (have {})", index, count),
        ));
    }
    Ok(resolved as usize)
}

/// Parse a face vertex: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_face_ref(s: &str, data: &ObjData, line: usize) -> Result<FaceRef> {
    let mut parts = s.split('/');
    let v = resolve_index(parts.next().unwrap_or_default(), data.positions.len(), line)?;
    let vt = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, data.texcoords.len(), line)?),
        _ => None,
    };
    let vn = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, data.normals.len(), line)?),
        _ => None,
    };
    Ok(FaceRef { v, vt, vn })
}
