//! Types and options for mesh export

use cmf_common::{ArrayType, Compression, ElementFormat};
use serde::Deserialize;

use crate::scene::ExportScope;

/// Texture coordinate used when the source has none
pub(crate) const DEFAULT_TEXCOORD: [f32; 2] = [0.0, 0.0];

/// Vertex color used when the source has none
pub(crate) const DEFAULT_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// Which normal each corner receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalPolicy {
    /// Smoothed vertex normal on smooth faces, face normal otherwise
    #[default]
    Face,
    /// Always the smoothed vertex normal
    Smooth,
    /// Always the face normal
    Flat,
}

/// Attribute arrays written to the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSet {
    pub positions: bool,
    pub texcoords: bool,
    pub normals: bool,
    pub tangents: bool,
    pub colors: bool,
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self {
            positions: true,
            texcoords: true,
            normals: true,
            tangents: false,
            colors: true,
        }
    }
}

impl AttributeSet {
    pub fn contains(&self, ty: ArrayType) -> bool {
        match ty {
            ArrayType::Positions => self.positions,
            ArrayType::Texcoords => self.texcoords,
            ArrayType::Normals => self.normals,
            ArrayType::Tangents => self.tangents,
            ArrayType::Colors => self.colors,
            ArrayType::Indices => false,
        }
    }
}

/// Export settings shared by the collector and the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub attributes: AttributeSet,
    /// Deduplicate corners and write an index array
    pub index: bool,
    pub scope: ExportScope,
    pub normals: NormalPolicy,
    /// Element format for float attribute arrays
    pub float_format: ElementFormat,
    pub compression: Compression,
}

impl ExportOptions {
    /// Default switches with indexing turned on
    pub fn indexed() -> Self {
        Self {
            index: true,
            ..Self::default()
        }
    }
}

/// One fully resolved corner: defaults substituted, normal selected
///
/// Equality is bitwise on every component, so `0.0` and `-0.0` differ and
/// identical NaN payloads compare equal.
#[derive(Debug, Clone, Copy)]
pub struct VertexCorner {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Structural dedup key: bit patterns of all 11 components
pub(crate) type VertexKey = [u32; 11];

impl VertexCorner {
    pub(crate) fn key(&self) -> VertexKey {
        let mut key = [0u32; 11];
        let values = self
            .position
            .iter()
            .chain(&self.texcoord)
            .chain(&self.normal)
            .chain(&self.color);
        for (slot, value) in key.iter_mut().zip(values) {
            *slot = value.to_bits();
        }
        key
    }
}

impl PartialEq for VertexCorner {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VertexCorner {}

/// Output of the vertex collector
///
/// Every attribute stream holds `num_vertices` entries regardless of which
/// arrays end up in the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedMesh {
    pub num_vertices: usize,
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    /// One entry per source corner; present only when indexing
    pub indices: Option<Vec<u32>>,
}

impl CollectedMesh {
    /// Number of source corners that went into the mesh
    pub fn corner_count(&self) -> usize {
        self.indices
            .as_ref()
            .map(Vec::len)
            .unwrap_or(self.num_vertices)
    }

    /// Triangles as vertex index triples
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => (0..self.num_vertices as u32 / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }
}
