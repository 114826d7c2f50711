//! Vertex collection and deduplication

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use super::types::{
    CollectedMesh, ExportOptions, NormalPolicy, VertexCorner, VertexKey, DEFAULT_COLOR,
    DEFAULT_TEXCOORD,
};
use crate::error::{ExportError, Result};
use crate::scene::{GeometrySource, SourceTriangle};

/// Resolve the three corners of a source triangle
///
/// Missing texcoords and colors become the fixed defaults, and the normal is
/// picked here, so both already take part in deduplication.
pub fn resolve_triangle(triangle: &SourceTriangle, policy: NormalPolicy) -> [VertexCorner; 3] {
    let smooth = match policy {
        NormalPolicy::Face => triangle.smooth,
        NormalPolicy::Smooth => true,
        NormalPolicy::Flat => false,
    };

    triangle.corners.map(|c| VertexCorner {
        position: c.position,
        texcoord: c.texcoord.unwrap_or(DEFAULT_TEXCOORD),
        normal: if smooth {
            c.vertex_normal
        } else {
            triangle.face_normal
        },
        color: c.color.unwrap_or(DEFAULT_COLOR),
    })
}

/// Collect every corner of `source` within the configured scope
pub fn collect<G>(source: &G, options: &ExportOptions) -> Result<CollectedMesh>
where
    G: GeometrySource + ?Sized,
{
    let corners = source
        .triangles(options.scope)
        .flat_map(|t| resolve_triangle(&t, options.normals));
    collect_corners(corners, options.index)
}

/// Collect resolved corners, optionally deduplicating them
///
/// Without dedup every corner becomes its own vertex. With dedup, corners
/// are looked up by exact bit pattern; the first occurrence gets the next
/// sequential index and later occurrences reuse it.
pub fn collect_corners<I>(corners: I, dedup: bool) -> Result<CollectedMesh>
where
    I: IntoIterator<Item = VertexCorner>,
{
    let mut mesh = CollectedMesh::default();

    if !dedup {
        for corner in corners {
            push_vertex(&mut mesh, &corner);
        }
        if mesh.num_vertices > u32::MAX as usize {
            return Err(ExportError::TooManyVertices(mesh.num_vertices));
        }
        return Ok(mesh);
    }

    let mut table: HashMap<VertexKey, u32> = HashMap::new();
    let mut indices = Vec::new();

    for corner in corners {
        let index = match table.entry(corner.key()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = u32::try_from(mesh.num_vertices)
                    .map_err(|_| ExportError::TooManyVertices(mesh.num_vertices))?;
                push_vertex(&mut mesh, &corner);
                *entry.insert(index)
            }
        };
        indices.push(index);
    }

    tracing::debug!(
        "Deduplicated {} corners into {} vertices",
        indices.len(),
        mesh.num_vertices
    );

    mesh.indices = Some(indices);
    Ok(mesh)
}

fn push_vertex(mesh: &mut CollectedMesh, corner: &VertexCorner) {
    mesh.positions.push(corner.position);
    mesh.texcoords.push(corner.texcoord);
    mesh.normals.push(corner.normal);
    mesh.colors.push(corner.color);
    mesh.num_vertices += 1;
}
