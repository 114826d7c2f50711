//! Array tags, element formats and compression modes
//!
//! Every enum carries its fixed wire tag as the discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of attribute stored in an array sub-block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ArrayType {
    Positions = 0,
    Texcoords = 1,
    Normals = 2,
    Tangents = 3,
    Colors = 4,
    Indices = 5,
}

impl ArrayType {
    /// All array types in the order they appear in a file
    pub const ALL: [ArrayType; 6] = [
        ArrayType::Positions,
        ArrayType::Texcoords,
        ArrayType::Normals,
        ArrayType::Tangents,
        ArrayType::Colors,
        ArrayType::Indices,
    ];

    /// Scalar values per vertex (per corner for indices)
    pub const fn components(self) -> usize {
        match self {
            ArrayType::Positions => 3,
            ArrayType::Texcoords => 2,
            ArrayType::Normals => 3,
            ArrayType::Tangents => 3,
            ArrayType::Colors => 3,
            ArrayType::Indices => 1,
        }
    }

    pub const fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayType::Positions => "positions",
            ArrayType::Texcoords => "texcoords",
            ArrayType::Normals => "normals",
            ArrayType::Tangents => "tangents",
            ArrayType::Colors => "colors",
            ArrayType::Indices => "indices",
        };
        f.write_str(name)
    }
}

/// Numeric format of the elements in an array sub-block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum ElementFormat {
    Byte = 0,
    UByte = 1,
    Short = 2,
    UShort = 3,
    Int = 4,
    UInt = 5,
    /// Reserved; no encoder exists for it yet
    Half = 6,
    #[default]
    Float = 7,
    Double = 8,
}

impl ElementFormat {
    const ALL: [ElementFormat; 9] = [
        ElementFormat::Byte,
        ElementFormat::UByte,
        ElementFormat::Short,
        ElementFormat::UShort,
        ElementFormat::Int,
        ElementFormat::UInt,
        ElementFormat::Half,
        ElementFormat::Float,
        ElementFormat::Double,
    ];

    /// Size of one element in bytes
    pub const fn size(self) -> usize {
        match self {
            ElementFormat::Byte | ElementFormat::UByte => 1,
            ElementFormat::Short | ElementFormat::UShort | ElementFormat::Half => 2,
            ElementFormat::Int | ElementFormat::UInt | ElementFormat::Float => 4,
            ElementFormat::Double => 8,
        }
    }

    pub const fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Largest index value an unsigned integer format can hold
    pub const fn max_index(self) -> Option<u32> {
        match self {
            ElementFormat::UByte => Some(u8::MAX as u32),
            ElementFormat::UShort => Some(u16::MAX as u32),
            ElementFormat::UInt => Some(u32::MAX),
            _ => None,
        }
    }

    /// Narrowest unsigned format able to index `num_vertices` vertices
    ///
    /// The thresholds are inclusive on the vertex count: 255 vertices still
    /// fit in UByte, 256 need UShort, 65536 need UInt.
    pub const fn narrowest_index(num_vertices: usize) -> Self {
        if num_vertices <= u8::MAX as usize {
            ElementFormat::UByte
        } else if num_vertices <= u16::MAX as usize {
            ElementFormat::UShort
        } else {
            ElementFormat::UInt
        }
    }
}

impl fmt::Display for ElementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementFormat::Byte => "byte",
            ElementFormat::UByte => "ubyte",
            ElementFormat::Short => "short",
            ElementFormat::UShort => "ushort",
            ElementFormat::Int => "int",
            ElementFormat::UInt => "uint",
            ElementFormat::Half => "half",
            ElementFormat::Float => "float",
            ElementFormat::Double => "double",
        };
        f.write_str(name)
    }
}

/// Payload compression declared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Compression {
    #[default]
    None = 1,
    /// Reserved for a zstd-compressed payload
    Zstd = 2,
}

impl Compression {
    pub const fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Compression::None),
            2 => Some(Compression::Zstd),
            _ => None,
        }
    }
}
