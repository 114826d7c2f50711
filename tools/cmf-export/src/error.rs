//! Error type for mesh export

use cmf_common::{ArrayType, Compression, ElementFormat};

/// Errors raised while collecting, encoding or writing a CMF container
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The requested element format has no encoder for this array
    #[error("unsupported element format {format} for {array} array")]
    UnsupportedFormat {
        array: ArrayType,
        format: ElementFormat,
    },

    /// The requested payload compression is reserved but not implemented
    #[error("unsupported compression {0:?}")]
    UnsupportedCompression(Compression),

    /// Vertex or byte count does not fit the u32 header fields
    #[error("mesh too large: {0} exceeds the u32 limit of the CMF header")]
    TooManyVertices(usize),

    /// Collected mesh whose streams disagree with its vertex count
    #[error("inconsistent mesh: {0}")]
    InconsistentMesh(String),

    /// Malformed geometry source
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Destination could not be opened or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
