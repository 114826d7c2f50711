//! CMF container header and array sub-header (.cmf)
//!
//! # Layout
//! ```text
//! 0x00: magic "CMF\0" (4 bytes)
//! 0x04: version u32
//! 0x08: filesize u32 (total file length, magic included)
//! 0x0C: flags u32 (reserved, 0)
//! 0x10: compression u32 (1 = none, 2 = zstd, reserved)
//! 0x14: num_vertices u32
//! 0x18: num_arrays u32
//! 0x1C: num_arrays sub-blocks:
//!       type u32, format u32, byte_length u32, byte_length bytes of elements
//! ```
//!
//! Sub-blocks appear in [`ArrayType`] order and only for arrays that were
//! exported. Earlier revisions of the format opened with the 19-byte
//! `COLUMBUS MODEL FILE` or 21-byte `COLUMBUS MODEL FORMAT` magic; neither
//! begins with `CMF\0`, so four bytes are enough to tell them apart.

use super::types::{ArrayType, Compression, ElementFormat};

/// Magic bytes at offset 0
pub const CMF_MAGIC: [u8; 4] = *b"CMF\0";

/// Format revision written by this crate
pub const CMF_VERSION: u32 = 3;

/// File extension for CMF files
pub const CMF_EXT: &str = "cmf";

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// CMF file header (28 bytes, magic included)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmfHeader {
    pub version: u32,
    pub filesize: u32,
    pub flags: u32,
    pub compression: Compression,
    pub num_vertices: u32,
    pub num_arrays: u32,
}

impl CmfHeader {
    pub const SIZE: usize = CMF_MAGIC.len() + 6 * 4;

    pub fn new(filesize: u32, compression: Compression, num_vertices: u32, num_arrays: u32) -> Self {
        Self {
            version: CMF_VERSION,
            filesize,
            flags: 0,
            compression,
            num_vertices,
            num_arrays,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&CMF_MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.filesize.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.flags.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.compression.tag().to_le_bytes());
        bytes[20..24].copy_from_slice(&self.num_vertices.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.num_arrays.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    ///
    /// Returns `None` on short input, foreign magic or an unknown compression tag.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != CMF_MAGIC {
            return None;
        }
        Some(Self {
            version: read_u32(bytes, 4),
            filesize: read_u32(bytes, 8),
            flags: read_u32(bytes, 12),
            compression: Compression::from_tag(read_u32(bytes, 16))?,
            num_vertices: read_u32(bytes, 20),
            num_arrays: read_u32(bytes, 24),
        })
    }
}

/// Sub-header preceding every array block (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHeader {
    pub array_type: ArrayType,
    pub format: ElementFormat,
    pub byte_length: u32,
}

impl ArrayHeader {
    pub const SIZE: usize = 12;

    pub fn new(array_type: ArrayType, format: ElementFormat, byte_length: u32) -> Self {
        Self {
            array_type,
            format,
            byte_length,
        }
    }

    /// Number of elements described by this header
    pub fn element_count(&self) -> usize {
        self.byte_length as usize / self.format.size()
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.array_type.tag().to_le_bytes());
        bytes[4..8].copy_from_slice(&self.format.tag().to_le_bytes());
        bytes[8..12].copy_from_slice(&self.byte_length.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            array_type: ArrayType::from_tag(read_u32(bytes, 0))?,
            format: ElementFormat::from_tag(read_u32(bytes, 4))?,
            byte_length: read_u32(bytes, 8),
        })
    }
}
