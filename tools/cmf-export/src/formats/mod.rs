//! CMF container encoding
//!
//! Re-exports the binary layout from cmf-common and assembles collected
//! meshes into complete containers.

pub use cmf_common::formats::*;

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ExportError, Result};
use crate::mesh::{compute_tangents, CollectedMesh, ExportOptions};

/// Element storage before packing
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float(Vec<f32>),
    Index(Vec<u32>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float(v) => v.len(),
            ArrayData::Index(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that `format` has an encoder for this kind of data
    fn supports(&self, format: ElementFormat) -> bool {
        match self {
            ArrayData::Float(_) => matches!(format, ElementFormat::Float | ElementFormat::Double),
            ArrayData::Index(_) => matches!(
                format,
                ElementFormat::UByte | ElementFormat::UShort | ElementFormat::UInt
            ),
        }
    }
}

/// One attribute sub-block
///
/// Only constructed through [`CmfArray::new`], so the format always has an
/// encoder for the data.
#[derive(Debug, Clone, PartialEq)]
pub struct CmfArray {
    array_type: ArrayType,
    format: ElementFormat,
    data: ArrayData,
}

impl CmfArray {
    /// Validated array; fails if `format` cannot encode `data`
    pub fn new(array_type: ArrayType, format: ElementFormat, data: ArrayData) -> Result<Self> {
        if !data.supports(format) {
            return Err(ExportError::UnsupportedFormat {
                array: array_type,
                format,
            });
        }
        if let (ArrayData::Index(values), Some(max)) = (&data, format.max_index()) {
            if let Some(&index) = values.iter().find(|&&v| v > max) {
                return Err(ExportError::InconsistentMesh(format!(
                    "index {} does not fit {}",
                    index, format
                )));
            }
        }
        Ok(Self {
            array_type,
            format,
            data,
        })
    }

    pub fn array_type(&self) -> ArrayType {
        self.array_type
    }

    pub fn format(&self) -> ElementFormat {
        self.format
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn byte_length(&self) -> usize {
        self.data.len() * self.format.size()
    }

    /// Pack elements without padding or reordering
    fn write_elements<W: Write>(&self, w: &mut W) -> Result<()> {
        match (&self.data, self.format) {
            (ArrayData::Float(values), ElementFormat::Float) => {
                for v in values {
                    w.write_all(&v.to_le_bytes())?;
                }
            }
            (ArrayData::Float(values), ElementFormat::Double) => {
                for v in values {
                    w.write_all(&(*v as f64).to_le_bytes())?;
                }
            }
            // CmfArray::new rejects indices wider than the format
            (ArrayData::Index(values), ElementFormat::UByte) => {
                for v in values {
                    w.write_all(&[*v as u8])?;
                }
            }
            (ArrayData::Index(values), ElementFormat::UShort) => {
                for v in values {
                    w.write_all(&(*v as u16).to_le_bytes())?;
                }
            }
            (ArrayData::Index(values), ElementFormat::UInt) => {
                for v in values {
                    w.write_all(&v.to_le_bytes())?;
                }
            }
            (_, format) => {
                return Err(ExportError::UnsupportedFormat {
                    array: self.array_type,
                    format,
                })
            }
        }
        Ok(())
    }
}

/// A complete container, ready to write
#[derive(Debug, Clone, PartialEq)]
pub struct CmfContainer {
    compression: Compression,
    num_vertices: u32,
    /// Sub-blocks in [`ArrayType`] order
    arrays: Vec<CmfArray>,
}

fn flatten<const N: usize>(values: &[[f32; N]]) -> ArrayData {
    ArrayData::Float(values.iter().flatten().copied().collect())
}

/// Every stream must hold `num_vertices` entries and every index must
/// point at one of them
fn check_consistency(mesh: &CollectedMesh) -> Result<()> {
    let streams = [
        ("positions", mesh.positions.len()),
        ("texcoords", mesh.texcoords.len()),
        ("normals", mesh.normals.len()),
        ("colors", mesh.colors.len()),
    ];
    for (name, len) in streams {
        if len != mesh.num_vertices {
            return Err(ExportError::InconsistentMesh(format!(
                "{} {} for {} vertices",
                len, name, mesh.num_vertices
            )));
        }
    }

    if let Some(indices) = &mesh.indices {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= mesh.num_vertices) {
            return Err(ExportError::InconsistentMesh(format!(
                "index {} out of range for {} vertices",
                index, mesh.num_vertices
            )));
        }
    }
    Ok(())
}

impl CmfContainer {
    /// Assemble the enabled arrays of a collected mesh
    ///
    /// The mesh, every array format and the compression mode are validated
    /// here, so a successfully built container always writes completely.
    pub fn build(mesh: &CollectedMesh, options: &ExportOptions) -> Result<Self> {
        if options.compression != Compression::None {
            return Err(ExportError::UnsupportedCompression(options.compression));
        }
        check_consistency(mesh)?;
        let num_vertices = u32::try_from(mesh.num_vertices)
            .map_err(|_| ExportError::TooManyVertices(mesh.num_vertices))?;

        let attributes = &options.attributes;
        let float_format = options.float_format;
        let mut arrays = Vec::new();

        for array_type in ArrayType::ALL {
            let data = match array_type {
                ArrayType::Indices => match &mesh.indices {
                    Some(indices) => ArrayData::Index(indices.clone()),
                    None => continue,
                },
                ty if !attributes.contains(ty) => continue,
                ArrayType::Positions => flatten(&mesh.positions),
                ArrayType::Texcoords => flatten(&mesh.texcoords),
                ArrayType::Normals => flatten(&mesh.normals),
                ArrayType::Tangents => flatten(&compute_tangents(mesh)),
                ArrayType::Colors => flatten(&mesh.colors),
            };
            let format = match array_type {
                ArrayType::Indices => ElementFormat::narrowest_index(mesh.num_vertices),
                _ => float_format,
            };
            arrays.push(CmfArray::new(array_type, format, data)?);
        }

        let container = Self {
            compression: options.compression,
            num_vertices,
            arrays,
        };
        if container.filesize() > u32::MAX as usize {
            return Err(ExportError::TooManyVertices(mesh.num_vertices));
        }
        Ok(container)
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn num_vertices(&self) -> u32 {
        self.num_vertices
    }

    /// Sub-blocks in [`ArrayType`] order
    pub fn arrays(&self) -> &[CmfArray] {
        &self.arrays
    }

    /// Total file length in bytes, magic included
    pub fn filesize(&self) -> usize {
        CmfHeader::SIZE
            + self
                .arrays
                .iter()
                .map(|a| ArrayHeader::SIZE + a.byte_length())
                .sum::<usize>()
    }

    pub fn header(&self) -> CmfHeader {
        CmfHeader::new(
            self.filesize() as u32,
            self.compression,
            self.num_vertices,
            self.arrays.len() as u32,
        )
    }

    /// Element format chosen for the index array, if any
    pub fn index_format(&self) -> Option<ElementFormat> {
        self.arrays
            .iter()
            .find(|a| a.array_type == ArrayType::Indices)
            .map(|a| a.format)
    }

    /// Serialize header and every sub-block
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_header(w, &self.header())?;
        for array in &self.arrays {
            let header = ArrayHeader::new(array.array_type, array.format, array.byte_length() as u32);
            write_header(w, &header)?;
            array.write_elements(w)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.filesize());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn write_header<W: Write, H: BinarySerializable>(w: &mut W, header: &H) -> std::io::Result<()> {
    w.write_all(&header.serialize())
}

/// Write a container to `path` atomically
///
/// Data goes to a uniquely named temporary file in the destination directory
/// that is renamed over `path` once it is synced. On failure the temporary
/// file is removed and `path` is untouched.
pub fn write_cmf_file(path: &Path, container: &CmfContainer) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut prefix = std::ffi::OsString::from(".");
    prefix.push(path.file_name().unwrap_or_default());
    prefix.push(".");

    // Dropping the temp file on any early return deletes it
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;

    let mut writer = BufWriter::new(&mut tmp);
    container.write_to(&mut writer)?;
    writer.into_inner().map_err(|e| e.into_error())?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
