//! Shared types for the Columbus Model Format (CMF)
//!
//! This crate provides the binary layout used by:
//! - `cmf-export` (mesh exporter)
//! - anything that needs to recognise or size a `.cmf` file
//!
//! # Modules
//!
//! - [`formats`] - header layout, array tags and element formats

pub mod formats;

// Re-export commonly used format items
pub use formats::{
    ArrayHeader, ArrayType, BinarySerializable, CmfHeader, Compression, ElementFormat, CMF_EXT,
    CMF_MAGIC, CMF_VERSION,
};
