//! Per-vertex tangent generation
//!
//! Tangents are derived after collection, so they never affect which corners
//! deduplicate. Each triangle contributes its UV-space tangent to its three
//! vertices; the sum is orthogonalized against the vertex normal.

use glam::{Vec2, Vec3};

use super::types::CollectedMesh;

/// Compute one unit tangent per collected vertex
pub fn compute_tangents(mesh: &CollectedMesh) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; mesh.num_vertices];

    for [i0, i1, i2] in mesh.triangles() {
        let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
        let p0 = Vec3::from(mesh.positions[i0]);
        let e1 = Vec3::from(mesh.positions[i1]) - p0;
        let e2 = Vec3::from(mesh.positions[i2]) - p0;

        let uv0 = Vec2::from(mesh.texcoords[i0]);
        let d1 = Vec2::from(mesh.texcoords[i1]) - uv0;
        let d2 = Vec2::from(mesh.texcoords[i2]) - uv0;

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let tangent = (e1 * d2.y - e2 * d1.y) / det;
        if !tangent.is_finite() {
            continue;
        }

        accum[i0] += tangent;
        accum[i1] += tangent;
        accum[i2] += tangent;
    }

    accum
        .into_iter()
        .zip(&mesh.normals)
        .map(|(t, n)| orthonormal_tangent(t, Vec3::from(*n)).to_array())
        .collect()
}

/// Gram-Schmidt against `normal`, falling back to any perpendicular axis
fn orthonormal_tangent(tangent: Vec3, normal: Vec3) -> Vec3 {
    let normal = normal.normalize_or_zero();
    let projected = tangent - normal * normal.dot(tangent);
    if let Some(t) = projected.try_normalize() {
        return t;
    }
    if normal == Vec3::ZERO {
        return Vec3::X;
    }
    normal.any_orthonormal_vector()
}
