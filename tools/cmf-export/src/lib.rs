//! cmf-export library
//!
//! Converts triangulated geometry into Columbus Model Format containers.
//! The pipeline is: [`scene::GeometrySource`] -> [`mesh::collect`] ->
//! [`formats::CmfContainer`] -> bytes on disk.

pub mod error;
pub mod formats;
pub mod manifest;
pub mod mesh;
pub mod scene;

pub use error::ExportError;

// Re-export the binary layout from cmf-common
pub use cmf_common::{ArrayType, Compression, ElementFormat, CMF_EXT, CMF_MAGIC, CMF_VERSION};

// Re-export key types for mesh conversion
pub use formats::{write_cmf_file, CmfContainer};
pub use mesh::{convert_obj, convert_to_memory, CollectedMesh, ExportOptions};
pub use scene::{ExportScope, GeometrySource, Scene};
